//! Process-wide configuration
//!
//! Loaded once at startup and never mutated. A missing secret, algorithm or
//! store URL is fatal: the service refuses to start rather than run with an
//! undefined signing key.

use crate::auth::jwt::{parse_algorithm, DEFAULT_TOKEN_TTL_MINUTES};
use anyhow::{Context, Result};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::path::Path;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Clone)]
pub struct Config {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub database_url: String,
    pub bind_addr: String,
    pub token_ttl: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("database_url", &self.database_url)
            .field("bind_addr", &self.bind_addr)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let secret_key = required("SECRET_KEY")?;
        let algorithm = parse_algorithm(&required("ALGORITHM")?)?;
        let database_url = required("DATABASE_URL")?;

        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|&m| m > 0)
                .with_context(|| {
                    format!("Invalid ACCESS_TOKEN_EXPIRE_MINUTES: {:?}", raw)
                })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        Ok(Self {
            secret_key,
            algorithm,
            database_url,
            bind_addr,
            token_ttl: Duration::minutes(ttl_minutes),
        })
    }
}

/// Load `.env` files: the standard cwd search, then the crate directory.
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
