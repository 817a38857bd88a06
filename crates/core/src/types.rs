use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Role of a dashboard user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Owner,
    #[default]
    Tenant,
    Agent,
    #[serde(other)]
    Unknown,
}

/// Signed-in user as returned by login and `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl UserProfile {
    /// Display name, falling back to the email address
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Where a user lands after their session ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignInView {
    Admin,
    Agent,
    Default,
}

impl SignInView {
    /// Entry point for the given role
    pub const fn for_role(role: Option<UserRole>) -> Self {
        match role {
            Some(UserRole::Admin) => Self::Admin,
            Some(UserRole::Agent) => Self::Agent,
            _ => Self::Default,
        }
    }

    /// Route of the sign-in view
    pub const fn path(self) -> &'static str {
        match self {
            Self::Admin => "/admin-login",
            Self::Agent => "/agent-login",
            Self::Default => "/login",
        }
    }
}
