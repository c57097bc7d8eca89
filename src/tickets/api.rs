//! Ticket API Endpoints
//! Mission: Expose code registration and validation to authenticated staff

use crate::api::{error::ApiError, AppState};
use crate::auth::middleware::CurrentUser;
use crate::models::{AddCodeRequest, MessageResponse, ValidateCodeParams};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use tracing::debug;

/// Register a code - POST /validator/add_code
pub async fn add_code(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<AddCodeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.validated_status {
        debug!(
            "Ignoring validated_status=true on registration of {}",
            payload.code
        );
    }

    let outcome = state.tickets.register(&payload.code, &user)?;
    Ok(Json(MessageResponse::new(outcome.message())))
}

/// Redeem a code - POST /authenticator/validate_code?code=...
pub async fn validate_code(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<ValidateCodeParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state.tickets.validate(&params.code, &user)?;
    Ok(Json(MessageResponse::new(outcome.message())))
}
