//! Ticket Gate - ticket registration and validation service
//!
//! Loads configuration, opens the credential store and serves the HTTP API.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketgate_backend::{
    auth::{JwtHandler, PasswordHasher},
    config::{load_env, Config},
    router,
    store::{CredentialStore, SqliteStore},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;
    info!("Starting ticket gate with {:?}", config);

    // Store must be reachable before we accept traffic
    let store: Arc<dyn CredentialStore> = Arc::new(
        SqliteStore::open(&config.database_url).context("Failed to open credential store")?,
    );

    let jwt_handler = Arc::new(
        JwtHandler::new(&config.secret_key, config.algorithm).with_ttl(config.token_ttl),
    );
    let state = AppState::new(store, jwt_handler, PasswordHasher::default());

    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketgate_backend=debug,ticketgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
