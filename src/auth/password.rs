//! Password Hashing
//! Mission: One-way salted hashing and verification of user credentials

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use std::sync::{Arc, OnceLock};
use tracing::debug;

const DUMMY_PASSWORD: &str = "ticketgate-absent-account";

/// bcrypt-backed password hasher.
///
/// Clones share one lazily computed dummy digest, used to spend the same
/// bcrypt work on unknown accounts as on real ones.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_digest: Arc<OnceLock<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::with_cost(DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// Hasher with an explicit bcrypt cost (4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            dummy_digest: Arc::new(OnceLock::new()),
        }
    }

    /// Produce a salted digest. Two calls on the same input never match.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        hash(plaintext, self.cost).context("Failed to hash password")
    }

    /// Check `plaintext` against `digest`. A malformed digest is a mismatch.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match verify(plaintext, digest) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("Rejecting unverifiable password digest: {}", e);
                false
            }
        }
    }

    /// Check a login attempt. `None` means the account does not exist: the
    /// password is still run through bcrypt at this hasher's cost, and the
    /// attempt is rejected.
    pub fn verify_account(&self, plaintext: &str, digest: Option<&str>) -> bool {
        match digest {
            Some(digest) => self.verify(plaintext, digest),
            None => {
                let _ = self.verify(plaintext, self.dummy_digest());
                false
            }
        }
    }

    fn dummy_digest(&self) -> &str {
        self.dummy_digest.get_or_init(|| {
            hash(DUMMY_PASSWORD, self.cost).unwrap_or_else(|e| {
                debug!("Dummy digest unavailable: {}", e);
                String::new()
            })
        })
    }
}
