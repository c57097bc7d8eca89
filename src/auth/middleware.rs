//! Authentication Middleware
//! Mission: Resolve bearer tokens to current user records on every request

use crate::auth::{jwt::JwtHandler, models::User};
use crate::store::{CredentialStore, StoreError};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// The authenticated user, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Verifies tokens and looks the subject up in the store.
///
/// Authorization decisions use the role from the returned record. The token's
/// own `role` claim is never consulted, so a role change in the store applies
/// on the next request.
pub struct AuthGate {
    jwt_handler: Arc<JwtHandler>,
    store: Arc<dyn CredentialStore>,
}

impl AuthGate {
    pub fn new(jwt_handler: Arc<JwtHandler>, store: Arc<dyn CredentialStore>) -> Self {
        Self { jwt_handler, store }
    }

    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .jwt_handler
            .verify(token)
            .map_err(|_| AuthError::Unauthenticated)?;

        if claims.sub.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        match self.store.find_user_by_name(&claims.sub)? {
            Some(user) => Ok(user),
            None => {
                warn!("Token subject {} no longer resolves to a user", claims.sub);
                Err(AuthError::Unauthenticated)
            }
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Auth middleware that validates JWT tokens and loads the user
pub async fn auth_middleware(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AuthError::Unauthenticated)?;

    let user = gate.authenticate(token)?;
    debug!("Authenticated {}", user.name);

    // Add the user to request extensions so handlers can access it
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Auth gate failures
#[derive(Debug)]
pub enum AuthError {
    /// Missing, malformed, invalid or expired token, or unknown subject
    Unauthenticated,
    Store(StoreError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated => f.write_str("Could not validate credentials"),
            AuthError::Store(e) => write!(f, "User lookup failed: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::Store(e)
    }
}
