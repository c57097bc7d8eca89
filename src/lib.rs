//! Ticket Gate Backend Library
//!
//! Issues bearer tokens to provisioned staff and exposes two role-gated
//! operations over ticket codes: registration by validators and one-time
//! validation by authenticators.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod models;
pub mod store;
pub mod tickets;

pub use api::{router, AppState};
pub use config::Config;
