//! In-memory credential store used by tests and local demos.

use crate::auth::models::User;
use crate::models::Ticket;
use crate::store::{CredentialStore, StoreError};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    tickets: RwLock<HashMap<String, Ticket>>, // keyed by code
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.read().len()
    }
}

impl CredentialStore for MemoryStore {
    fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(name).cloned())
    }

    fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write();
        if users.contains_key(&user.name) {
            return Err(StoreError::AlreadyExists(user.name.clone()));
        }
        users.insert(user.name.clone(), user.clone());
        Ok(())
    }

    fn find_ticket_by_code(&self, code: &str) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.read().get(code).cloned())
    }

    fn insert_ticket(&self, code: &str) -> Result<Option<Uuid>, StoreError> {
        let mut tickets = self.tickets.write();
        if tickets.contains_key(code) {
            return Ok(None);
        }
        let id = Uuid::new_v4();
        tickets.insert(
            code.to_string(),
            Ticket {
                id,
                code: code.to_string(),
                validated_status: false,
            },
        );
        Ok(Some(id))
    }

    fn mark_validated(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tickets = self.tickets.write();
        match tickets
            .values_mut()
            .find(|t| t.id == id && !t.validated_status)
        {
            Some(ticket) => {
                ticket.validated_status = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
