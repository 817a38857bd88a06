//! Wire types for the authentication endpoints
//!
//! Resource endpoints exchange free-form JSON; only the payloads the client
//! itself interprets are typed here.

use carryit_core::{UserProfile, UserRole};
use serde::{Deserialize, Serialize};

/// `POST /auth/login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// `POST /auth/refresh` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `POST /auth/refresh` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Present when the backend rotates refresh tokens
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// `POST /auth/register` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_response_without_rotation() {
        let response: RefreshResponse =
            serde_json::from_str(r#"{"access_token":"A2"}"#).unwrap();
        assert_eq!(response.access_token, "A2");
        assert_eq!(response.refresh_token, None);
    }

    #[test]
    fn test_login_response_with_user() {
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "access_token": "A1",
            "token_type": "bearer",
            "refresh_token": "R1",
            "user": {"id": 1, "email": "admin@carryit.app", "role": "admin"}
        }))
        .unwrap();
        assert_eq!(response.user.map(|u| u.role), Some(UserRole::Admin));
    }

    #[test]
    fn test_register_request_omits_missing_phone() {
        let request = RegisterRequest {
            email: "owner@carryit.app".to_string(),
            username: "owner".to_string(),
            first_name: "Wanjiru".to_string(),
            last_name: "Kamau".to_string(),
            password: "secret".to_string(),
            phone: None,
            role: UserRole::Owner,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("phone").is_none());
        assert_eq!(value["role"], "owner");
    }
}
