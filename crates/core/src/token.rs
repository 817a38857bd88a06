//! Access token inspection
//!
//! Tokens are opaque to the client. The backend happens to issue JWTs, so
//! the `exp` claim is read when present to report expiry; nothing here
//! verifies signatures.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Expiry time encoded in a JWT access token, if it carries one
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    // Some issuers keep the padding
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&decoded).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}

/// Whether the token's `exp` claim lies in the future
///
/// Tokens without a readable expiry are treated as invalid.
pub fn is_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    expires_at(token).is_some_and(|exp| exp > now)
}

/// Shortened form of a token that is safe to put in logs
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jwt_with_payload(payload: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.signature",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_reads_exp_claim() {
        let token = jwt_with_payload(r#"{"sub":"admin@carryit.app","exp":1700000000}"#);
        let expected = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(expires_at(&token), Some(expected));
    }

    #[test]
    fn test_validity_relative_to_now() {
        let token = jwt_with_payload(r#"{"exp":1700000000}"#);
        let before = Utc.timestamp_opt(1_699_999_000, 0).unwrap();
        let after = Utc.timestamp_opt(1_700_000_001, 0).unwrap();
        assert!(is_valid_at(&token, before));
        assert!(!is_valid_at(&token, after));
    }

    #[test]
    fn test_opaque_tokens_have_no_expiry() {
        assert_eq!(expires_at("A1"), None);
        assert_eq!(expires_at("a.%%%.c"), None);
        assert_eq!(expires_at(&jwt_with_payload(r#"{"sub":"x"}"#)), None);
        assert!(!is_valid_at("A1", Utc::now()));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(redact("A1"), "A1...");
    }
}
