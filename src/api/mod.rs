//! HTTP Surface
//! Mission: Route requests through the auth gate to the ticket service

pub mod error;

use crate::auth::{api as auth_api, auth_middleware, AuthGate, JwtHandler, PasswordHasher};
use crate::middleware::request_logging;
use crate::store::CredentialStore;
use crate::tickets::{api as tickets_api, TicketService};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub jwt_handler: Arc<JwtHandler>,
    pub hasher: PasswordHasher,
    pub gate: Arc<AuthGate>,
    pub tickets: Arc<TicketService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        jwt_handler: Arc<JwtHandler>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            gate: Arc::new(AuthGate::new(jwt_handler.clone(), store.clone())),
            tickets: Arc::new(TicketService::new(store.clone())),
            store,
            jwt_handler,
            hasher,
        }
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    // Role checks happen in the ticket service; the gate only authenticates.
    let protected_routes = Router::new()
        .route("/validator/add_code", post(tickets_api::add_code))
        .route(
            "/authenticator/validate_code",
            post(tickets_api::validate_code),
        )
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/login", post(auth_api::login))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

async fn home() -> &'static str {
    "welcome to the ticket validation backend"
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
