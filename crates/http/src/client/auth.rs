//! Authentication API client methods

use super::error::{ClientError, RefreshError, error_message};
use super::request::ApiRequest;
use super::session::TokenRefresher;
use super::ApiClient;
use crate::types::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest};
use async_trait::async_trait;
use carryit_core::{SignInView, UserProfile, token};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

impl ApiClient {
    /// Sign in with email and password and store the returned tokens
    ///
    /// Login never goes through the refresh path: a 401 here means the
    /// credentials were wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let response: LoginResponse = self
            .execute_public(&ApiRequest::post("/auth/login").json(body))
            .await?;

        self.session().establish(
            &response.access_token,
            &response.refresh_token,
            response.user.as_ref(),
        )?;
        info!(email, "Logged in");
        Ok(response)
    }

    /// Register a new user account
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ClientError> {
        let body = serde_json::to_value(request)?;
        self.execute_public(&ApiRequest::post("/auth/register").json(body))
            .await
    }

    /// Get the signed-in user's profile
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.execute(&ApiRequest::get("/auth/me")).await
    }

    /// Sign out: notify the backend, then clear local credentials
    ///
    /// The backend call is best-effort; local credentials are cleared even
    /// when it fails.
    pub async fn logout(&self) -> Result<SignInView, ClientError> {
        if let Some(token) = self.session().access_token() {
            match self.send(&ApiRequest::post("/auth/logout"), Some(&token)).await {
                Ok(response) => {
                    debug!(status = response.status().as_u16(), "Backend logout answered");
                }
                Err(e) => debug!(error = %e, "Backend logout failed"),
            }
        }
        self.session().logout()
    }

    /// Expiry encoded in the stored access token
    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.session()
            .access_token()
            .and_then(|t| token::expires_at(&t))
    }

    /// Whether the stored access token is unexpired
    pub fn is_token_valid(&self) -> bool {
        self.session()
            .access_token()
            .is_some_and(|t| token::is_valid_at(&t, Utc::now()))
    }
}

/// Refreshes tokens through `POST /auth/refresh`
pub struct HttpRefresher {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRefresher {
    /// Create a refresher for the API at `base_url`
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| RefreshError::InvalidResponse(e.to_string()))
    }
}
