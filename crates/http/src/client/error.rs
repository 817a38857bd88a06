//! Client error types

use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    /// The request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed and could not be recovered by a refresh
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The access token could not be refreshed; the session has ended
    #[error("Session refresh failed: {0}")]
    RefreshFailed(#[from] RefreshError),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token storage error
    #[error("Storage error: {0}")]
    Storage(#[from] carryit_core::CoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Request(err)
        }
    }
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status carried by this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(err) | Self::Timeout(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error ended the session
    pub const fn is_session_ended(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
    }

    /// Whether this error is a timeout
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Why a token refresh failed
///
/// Cloneable so that one outcome can be handed to every request waiting on
/// the same refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// No refresh token is stored
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// The refresh endpoint answered with a non-success status
    #[error("Refresh rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The refresh endpoint could not be reached or timed out
    #[error("Refresh request failed: {0}")]
    Transport(String),

    /// The refresh response could not be decoded
    #[error("Invalid refresh response: {0}")]
    InvalidResponse(String),

    /// The new token could not be written to storage
    #[error("Failed to persist refreshed token: {0}")]
    Storage(String),
}

/// Pull the `detail` message out of a backend error body
///
/// Falls back to the raw text, or to the status reason when the body is
/// empty.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }

    if body.trim().is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, "x".into()),
            ClientError::BadRequest(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, "x".into()),
            ClientError::AuthenticationFailed(_)
        ));
        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_session_ended());
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail":"Invalid refresh token"}"#),
            "Invalid refresh token"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, ""),
            StatusCode::NOT_FOUND.to_string()
        );
    }

    #[test]
    fn test_refresh_failure_ends_session() {
        let err = ClientError::from(RefreshError::MissingRefreshToken);
        assert!(err.is_session_ended());
        assert!(err.to_string().contains("No refresh token available"));
    }
}
