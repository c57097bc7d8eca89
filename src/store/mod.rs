//! Credential Store
//! Mission: Persist users and tickets behind a substitutable interface
//!
//! Handlers never touch a database directly. They hold an
//! `Arc<dyn CredentialStore>` opened once at startup, so tests can swap in
//! [`MemoryStore`] while the service runs on [`SqliteStore`].

pub mod memory;
pub mod sqlite;

use crate::auth::models::User;
use crate::models::Ticket;
use std::fmt;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence operations the service depends on.
///
/// Every method is a single independent store call; there are no
/// transactions spanning calls.
pub trait CredentialStore: Send + Sync {
    fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if the name is taken.
    fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    fn find_ticket_by_code(&self, code: &str) -> Result<Option<Ticket>, StoreError>;

    /// Insert an unvalidated ticket. Returns `None` if the code already exists.
    fn insert_ticket(&self, code: &str) -> Result<Option<Uuid>, StoreError>;

    /// Set `validated_status` to true only where it is currently false.
    /// Returns whether a row changed.
    fn mark_validated(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Errors from the credential store.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    InvalidUrl(String),
    AlreadyExists(String),
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "SQLite error: {}", e),
            Self::InvalidUrl(url) => write!(f, "Unsupported store URL: {}", url),
            Self::AlreadyExists(key) => write!(f, "Record already exists: {}", key),
            Self::Corrupt(detail) => write!(f, "Corrupt record: {}", detail),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behavior every store implementation must share.

    use super::*;
    use crate::auth::models::UserRole;

    pub fn user(name: &str, role: Option<UserRole>) -> User {
        User {
            name: name.to_string(),
            password_hash: "$2b$04$placeholder".to_string(),
            role,
        }
    }

    pub fn users_round_trip(store: &dyn CredentialStore) {
        assert!(store.find_user_by_name("v1").unwrap().is_none());

        store
            .insert_user(&user("v1", Some(UserRole::Validator)))
            .unwrap();
        let found = store.find_user_by_name("v1").unwrap().unwrap();
        assert_eq!(found.name, "v1");
        assert_eq!(found.role, Some(UserRole::Validator));
        assert_eq!(found.password_hash, "$2b$04$placeholder");

        let dup = store.insert_user(&user("v1", Some(UserRole::Authenticator)));
        assert!(matches!(dup, Err(StoreError::AlreadyExists(_))));
    }

    pub fn ticket_codes_unique(store: &dyn CredentialStore) {
        let id = store.insert_ticket("TICKET123").unwrap();
        assert!(id.is_some());
        assert_eq!(store.insert_ticket("TICKET123").unwrap(), None);

        let ticket = store.find_ticket_by_code("TICKET123").unwrap().unwrap();
        assert_eq!(Some(ticket.id), id);
        assert!(!ticket.validated_status);
        assert!(store.find_ticket_by_code("NOPE").unwrap().is_none());
    }

    pub fn mark_validated_is_conditional(store: &dyn CredentialStore) {
        let id = store.insert_ticket("ONCE").unwrap().unwrap();

        assert!(store.mark_validated(id).unwrap());
        assert!(!store.mark_validated(id).unwrap());
        assert!(!store.mark_validated(Uuid::new_v4()).unwrap());

        let ticket = store.find_ticket_by_code("ONCE").unwrap().unwrap();
        assert!(ticket.validated_status);
    }
}
