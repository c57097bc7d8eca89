//! JWT Token Handler
//! Mission: Issue and verify signed, time-limited bearer tokens

use crate::auth::models::{Claims, UserRole};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use tracing::debug;

/// Default token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key and HMAC algorithm
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    /// Override the default token lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` with the configured lifetime
    pub fn issue(&self, subject: &str, role: Option<UserRole>) -> Result<String> {
        self.issue_with_ttl(subject, role, self.ttl)
    }

    /// Issue a token expiring `ttl` from now
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        role: Option<UserRole>,
        ttl: Duration,
    ) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .context("Invalid timestamp")?
            .timestamp()
            .max(0) as usize;

        let claims = Claims {
            sub: subject.to_string(),
            role,
            exp: expiration,
        };

        debug!(
            "Generating JWT for {}, expires in {}m",
            subject,
            ttl.num_minutes()
        );

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let decoded = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Rejected JWT: {}", e);
            TokenError::Invalid
        })?;

        Ok(decoded.claims)
    }
}

/// Token verification failure. Deliberately carries no detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Invalid,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid or expired token")
    }
}

impl std::error::Error for TokenError {}

/// Parse an `ALGORITHM` setting. Only the HMAC family works with a shared secret.
pub fn parse_algorithm(value: &str) -> Result<Algorithm> {
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => anyhow::bail!("Unsupported signing algorithm {:?} (expected HS256, HS384 or HS512)", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> JwtHandler {
        JwtHandler::new("test-secret-key-12345", Algorithm::HS256)
    }

    #[test]
    fn test_jwt_issue_and_verify() {
        let handler = handler();

        let token = handler.issue("gate1", Some(UserRole::Authenticator)).unwrap();
        assert!(!token.is_empty());

        let claims = handler.verify(&token).unwrap();
        assert_eq!(claims.sub, "gate1");
        assert_eq!(claims.role, Some(UserRole::Authenticator));
    }

    #[test]
    fn test_default_ttl_is_thirty_minutes() {
        let handler = handler();
        assert_eq!(handler.ttl(), Duration::minutes(30));

        let before = Utc::now().timestamp() as usize;
        let token = handler.issue("v1", Some(UserRole::Validator)).unwrap();
        let claims = handler.verify(&token).unwrap();

        let expected = before + 30 * 60;
        assert!(claims.exp >= expected && claims.exp <= expected + 5);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = handler().verify("invalid.token.here");
        assert_eq!(result, Err(TokenError::Invalid));
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = handler();
        let token = handler
            .issue_with_ttl("v1", Some(UserRole::Validator), Duration::seconds(-5))
            .unwrap();

        assert_eq!(handler.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1", Algorithm::HS256);
        let handler2 = JwtHandler::new("secret2", Algorithm::HS256);

        let token = handler1.issue("v1", None).unwrap();
        assert_eq!(handler2.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let hs512 = JwtHandler::new("shared", Algorithm::HS512);
        let hs256 = JwtHandler::new("shared", Algorithm::HS256);

        let token = hs512.issue("v1", None).unwrap();
        assert!(hs512.verify(&token).is_ok());
        assert!(hs256.verify(&token).is_err());
    }

    #[test]
    fn test_token_without_role_claim() {
        let handler = handler();
        let token = handler.issue("nobody", None).unwrap();
        let claims = handler.verify(&token).unwrap();
        assert_eq!(claims.role, None);
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("hs384").unwrap(), Algorithm::HS384);
        assert_eq!(parse_algorithm(" HS512 ").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("none").is_err());
    }
}
