//! Ticket data model and request/response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered ticket code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub code: String,
    pub validated_status: bool,
}

/// Body of `POST /validator/add_code`
#[derive(Debug, Clone, Deserialize)]
pub struct AddCodeRequest {
    pub code: String,
    /// Accepted for client compatibility; new tickets always start unvalidated.
    #[serde(default)]
    pub validated_status: bool,
}

/// Query of `POST /authenticator/validate_code`
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateCodeParams {
    pub code: String,
}

/// Body of every ticket operation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
