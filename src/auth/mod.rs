//! Authentication Module
//! Mission: Secure API access with bcrypt credentials, JWT tokens and RBAC

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, AuthGate, CurrentUser};
pub use models::{User, UserRole};
pub use password::PasswordHasher;
