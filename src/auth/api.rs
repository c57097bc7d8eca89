//! Authentication API Endpoints
//! Mission: Exchange credentials for bearer tokens

use crate::api::{error::ApiError, AppState};
use crate::auth::models::{LoginForm, LoginResponse};
use axum::{extract::State, Form, Json};
use tracing::{error, info, warn};

/// Login endpoint - POST /login
///
/// Unknown usernames and wrong passwords produce the same rejection.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, ApiError> {
    info!("Login attempt: {}", form.username);

    // Store lookup and bcrypt are blocking work.
    let store = state.store.clone();
    let hasher = state.hasher.clone();
    let username = form.username.clone();
    let user = tokio::task::spawn_blocking(move || {
        let user = store.find_user_by_name(&username)?;
        let digest = user.as_ref().map(|u| u.password_hash.as_str());
        let verified = hasher.verify_account(&form.password, digest);
        Ok::<_, ApiError>(user.filter(|_| verified))
    })
    .await
    .map_err(|e| {
        error!("Login task failed: {}", e);
        ApiError::Internal
    })??;

    let user = match user {
        Some(user) => user,
        None => {
            warn!("Failed login attempt: {}", form.username);
            return Err(ApiError::BadCredentials);
        }
    };

    let token = state
        .jwt_handler
        .issue(&user.name, user.role)
        .map_err(|e| {
            error!("Token issuance failed for {}: {:#}", user.name, e);
            ApiError::Internal
        })?;

    match user.role {
        Some(role) => info!("Login successful: {} ({})", user.name, role),
        None => warn!("Login for {} without a recognized role", user.name),
    }

    Ok(Json(LoginResponse::bearer(token, user.role)))
}
