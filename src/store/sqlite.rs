//! SQLite Credential Store
//! Mission: Durable user and ticket storage with SQLite
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     name TEXT PRIMARY KEY,
//!     password_hash TEXT NOT NULL,
//!     role TEXT NOT NULL
//! );
//! CREATE TABLE tickets (
//!     id TEXT PRIMARY KEY,
//!     code TEXT UNIQUE NOT NULL,
//!     validated_status INTEGER NOT NULL DEFAULT 0
//! );
//! ```

use crate::auth::models::{User, UserRole};
use crate::models::Ticket;
use crate::store::{CredentialStore, StoreError};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Credential store with SQLite backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store from a connection URL.
    ///
    /// Accepts `sqlite://<path>`, `sqlite::memory:`, `:memory:` or a bare path.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        match parse_url(url)? {
            None => Self::in_memory(),
            Some(path) => Self::new(path),
        }
    }

    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_db()?;
        info!("Credential store opened at {}", path.as_ref().display());
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_db()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();

        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("SQLite journal mode: {}", journal_mode);

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                name TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                code TEXT UNIQUE NOT NULL,
                validated_status INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )?;

        debug!("Credential store schema ready");
        Ok(())
    }
}

/// `Ok(None)` means an in-memory database.
fn parse_url(url: &str) -> Result<Option<&str>, StoreError> {
    let url = url.trim();
    let rest = match url.strip_prefix("sqlite:") {
        Some(rest) => rest.strip_prefix("//").unwrap_or(rest),
        None if url.contains("://") => return Err(StoreError::InvalidUrl(url.to_string())),
        None => url,
    };

    match rest {
        "" => Err(StoreError::InvalidUrl(url.to_string())),
        ":memory:" => Ok(None),
        path => Ok(Some(path)),
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

impl CredentialStore for SqliteStore {
    fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock();

        let row = conn
            .query_row(
                "SELECT name, password_hash, role FROM users WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(name, password_hash, role_str)| {
            let role = match role_str.parse::<UserRole>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!("User {} has {}; denying all role-gated operations", name, e);
                    None
                }
            };
            User {
                name,
                password_hash,
                role,
            }
        }))
    }

    fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let role = user
            .role
            .map(|r| r.as_str())
            .ok_or_else(|| StoreError::Corrupt(format!("user {} has no role", user.name)))?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (name, password_hash, role) VALUES (?1, ?2, ?3)",
            params![user.name, user.password_hash, role],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::AlreadyExists(user.name.clone())
            } else {
                e.into()
            }
        })?;

        info!("Created user: {} ({})", user.name, role);
        Ok(())
    }

    fn find_ticket_by_code(&self, code: &str) -> Result<Option<Ticket>, StoreError> {
        let conn = self.conn.lock();

        let row = conn
            .query_row(
                "SELECT id, code, validated_status FROM tickets WHERE code = ?1",
                params![code],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, code, validated_status)| -> Result<Ticket, StoreError> {
            let id = Uuid::parse_str(&id)
                .map_err(|e| StoreError::Corrupt(format!("ticket id {:?}: {}", id, e)))?;
            Ok(Ticket {
                id,
                code,
                validated_status,
            })
        })
        .transpose()
    }

    fn insert_ticket(&self, code: &str) -> Result<Option<Uuid>, StoreError> {
        let id = Uuid::new_v4();
        let conn = self.conn.lock();

        let inserted = conn.execute(
            "INSERT INTO tickets (id, code, validated_status) VALUES (?1, ?2, 0)
             ON CONFLICT(code) DO NOTHING",
            params![id.to_string(), code],
        )?;

        Ok((inserted == 1).then_some(id))
    }

    fn mark_validated(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = self.conn.lock();

        let updated = conn.execute(
            "UPDATE tickets SET validated_status = 1 WHERE id = ?1 AND validated_status = 0",
            params![id.to_string()],
        )?;

        Ok(updated == 1)
    }
}
