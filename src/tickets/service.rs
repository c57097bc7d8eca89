//! Ticket Service
//! Mission: Role-gated registration and one-way validation of ticket codes
//!
//! Per-code lifecycle:
//!
//! ```text
//! Unregistered --register--> Registered(false) --validate--> Registered(true)
//! ```
//!
//! Duplicate registrations, unknown codes and repeat validations are ordinary
//! outcomes, not errors.

use crate::auth::models::{User, UserRole};
use crate::store::{CredentialStore, StoreError};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Added,
    Duplicate,
}

impl RegisterOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RegisterOutcome::Added => "Code added successfully",
            RegisterOutcome::Duplicate => "Duplicate code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateOutcome {
    Validated,
    AlreadyValidated,
    InvalidCode,
}

impl ValidateOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ValidateOutcome::Validated => "Code validated successfully",
            ValidateOutcome::AlreadyValidated => "Code already validated before",
            ValidateOutcome::InvalidCode => "Invalid code",
        }
    }
}

pub struct TicketService {
    store: Arc<dyn CredentialStore>,
}

impl TicketService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Register a new code. Requires the validator role.
    pub fn register(&self, code: &str, requester: &User) -> Result<RegisterOutcome, TicketError> {
        require_role(requester, UserRole::Validator)?;

        if self.store.find_ticket_by_code(code)?.is_some() {
            debug!("{} tried to register duplicate code {}", requester.name, code);
            return Ok(RegisterOutcome::Duplicate);
        }

        // The store reports a concurrent insert of the same code as None.
        match self.store.insert_ticket(code)? {
            Some(id) => {
                info!(ticket_id = %id, "Code {} registered by {}", code, requester.name);
                Ok(RegisterOutcome::Added)
            }
            None => Ok(RegisterOutcome::Duplicate),
        }
    }

    /// Mark a code validated. Requires the authenticator role.
    pub fn validate(&self, code: &str, requester: &User) -> Result<ValidateOutcome, TicketError> {
        require_role(requester, UserRole::Authenticator)?;

        let ticket = match self.store.find_ticket_by_code(code)? {
            Some(ticket) => ticket,
            None => {
                info!("{} presented unknown code {}", requester.name, code);
                return Ok(ValidateOutcome::InvalidCode);
            }
        };

        if ticket.validated_status {
            info!("{} presented already validated code {}", requester.name, code);
            return Ok(ValidateOutcome::AlreadyValidated);
        }

        // Conditional update: only one of several concurrent callers wins.
        if self.store.mark_validated(ticket.id)? {
            info!(ticket_id = %ticket.id, "Code {} validated by {}", code, requester.name);
            Ok(ValidateOutcome::Validated)
        } else {
            Ok(ValidateOutcome::AlreadyValidated)
        }
    }
}

fn require_role(requester: &User, role: UserRole) -> Result<(), TicketError> {
    if requester.has_role(role) {
        Ok(())
    } else {
        info!(
            "Denied {} (role {:?}): {} role required",
            requester.name, requester.role, role
        );
        Err(TicketError::Forbidden)
    }
}

#[derive(Debug)]
pub enum TicketError {
    /// Authenticated, but lacking the role the operation requires
    Forbidden,
    Store(StoreError),
}

impl fmt::Display for TicketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketError::Forbidden => f.write_str("Unauthorized access"),
            TicketError::Store(e) => write!(f, "Ticket store failure: {}", e),
        }
    }
}

impl std::error::Error for TicketError {}

impl From<StoreError> for TicketError {
    fn from(e: StoreError) -> Self {
        TicketError::Store(e)
    }
}
