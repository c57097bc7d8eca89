//! Authentication Models
//! Mission: Define user, role and token data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User account
///
/// Users are provisioned out-of-band; the HTTP surface only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    /// `None` when the stored role value is not a recognized role.
    /// Such users pass authentication but every role check fails.
    pub role: Option<UserRole>,
}

impl User {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == Some(role)
    }
}

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    #[serde(rename = "validator")]
    Validator, // Registers ticket codes
    #[serde(rename = "authenticator")]
    Authenticator, // Redeems ticket codes at the gate
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Validator => "validator",
            UserRole::Authenticator => "authenticator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    // Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validator" => Ok(UserRole::Validator),
            "authenticator" => Ok(UserRole::Authenticator),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A role value that is neither `validator` nor `authenticator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // subject (username)
    /// Informational only; the auth gate re-reads the role from the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    pub exp: usize, // expiration timestamp
}

/// Login form body (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: Option<UserRole>,
}

impl LoginResponse {
    pub fn bearer(access_token: String, role: Option<UserRole>) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serialization() {
        let validator = UserRole::Validator;
        let json = serde_json::to_string(&validator).unwrap();
        assert_eq!(json, r#""validator""#);

        let authenticator: UserRole = serde_json::from_str(r#""authenticator""#).unwrap();
        assert_eq!(authenticator, UserRole::Authenticator);
    }

    #[test]
    fn test_user_role_string_conversion() {
        assert_eq!(UserRole::Validator.as_str(), "validator");
        assert_eq!(UserRole::Authenticator.as_str(), "authenticator");

        assert_eq!("validator".parse::<UserRole>(), Ok(UserRole::Validator));
        assert_eq!(
            "authenticator".parse::<UserRole>(),
            Ok(UserRole::Authenticator)
        );
    }

    #[test]
    fn test_unknown_role_is_a_parse_failure() {
        assert_eq!(
            "admin".parse::<UserRole>(),
            Err(UnknownRole("admin".to_string()))
        );
        // No case folding
        assert!("Validator".parse::<UserRole>().is_err());
        assert!(serde_json::from_str::<UserRole>(r#""admin""#).is_err());
    }

    #[test]
    fn test_user_without_role_matches_nothing() {
        let user = User {
            name: "ghost".to_string(),
            password_hash: "hash".to_string(),
            role: None,
        };
        assert!(!user.has_role(UserRole::Validator));
        assert!(!user.has_role(UserRole::Authenticator));
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            name: "gate1".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            role: Some(UserRole::Authenticator),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains(r#""role":"authenticator""#));
    }

    #[test]
    fn test_login_response_shape() {
        let response = LoginResponse::bearer("abc".to_string(), Some(UserRole::Validator));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["role"], "validator");
    }
}
