//! HTTP error mapping

use crate::auth::middleware::AuthError;
use crate::store::StoreError;
use crate::tickets::TicketError;
use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors surfaced to HTTP clients as `{"detail": ...}`
#[derive(Debug)]
pub enum ApiError {
    Unauthenticated,
    Forbidden,
    BadCredentials,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Unauthorized access"),
            ApiError::BadCredentials => (StatusCode::BAD_REQUEST, "Incorrect username or password"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(json!({ "detail": message }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        error!("Store failure: {}", e);
        ApiError::Internal
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated => ApiError::Unauthenticated,
            AuthError::Store(e) => e.into(),
        }
    }
}

impl From<TicketError> for ApiError {
    fn from(e: TicketError) -> Self {
        match e {
            TicketError::Forbidden => ApiError::Forbidden,
            TicketError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
