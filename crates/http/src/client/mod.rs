//! CarryIT API client
//!
//! [`ApiClient::request`] attaches the stored access token to every call
//! and recovers from an expired token: on the first 401 it waits for (or
//! starts) the session's single refresh and replays the request once with
//! the new token.

pub mod admin;
pub mod agents;
pub mod airbnb;
pub mod analytics;
pub mod auth;
pub mod communications;
pub mod error;
pub mod inspections;
pub mod monitoring;
pub mod notifications;
pub mod payments;
pub mod properties;
pub mod reports;
pub mod request;
pub mod services;
pub mod session;
pub mod tenants;
pub mod units;
pub mod utilities;

use auth::HttpRefresher;
use bytes::Bytes;
use carryit_core::token::redact;
use carryit_core::{ClientConfig, MemoryTokenStore, TokenStore};
use error::{ClientError, error_message};
use request::{ApiRequest, DEFAULT_TIMEOUT, FilePart, RequestBody, ResponseType};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use request::{ListParams, RequestOptions};
pub use session::{SessionEvent, SessionManager, SessionState, TokenRefresher};

/// Authenticated CarryIT API client
///
/// Cloning is cheap; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: SessionManager,
}

impl ApiClient {
    /// Create a new client with default configuration and in-memory tokens
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ClientError> {
        Self::builder()
            .base_url(&config.api_base_url)
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .store(store)
            .build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session shared by this client
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Send a request with the stored access token
    ///
    /// A first 401 triggers the refresh path and a single replay; every
    /// other failure is returned as-is.
    pub async fn request(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let token = self.session.access_token();
        let response = self.send(request, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check(request, response).await;
        }

        debug!(
            method = %request.method,
            path = %request.path,
            "Access token rejected, recovering session"
        );
        let token = self.session.on_unauthorized(token.as_deref()).await?;

        debug!(method = %request.method, path = %request.path, "Replaying request after refresh");
        let replayed = self.send(request, Some(&token)).await?;
        Self::check(request, replayed).await
    }

    /// Send a request and decode its JSON body
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ClientError> {
        let response = self.request(request).await?;
        Self::decode(response).await
    }

    /// Send a request without credentials and without the refresh path
    pub async fn execute_public<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ClientError> {
        let response = self.send(request, None).await?;
        let response = Self::check(request, response).await?;
        Self::decode(response).await
    }

    /// Download a binary body
    pub async fn download(&self, path: impl Into<String>) -> Result<Bytes, ClientError> {
        let request = ApiRequest::get(path).options(RequestOptions::blob());
        let response = self.request(&request).await?;
        Ok(response.bytes().await?)
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        let timeout = request.options.timeout.unwrap_or(self.timeout);
        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .timeout(timeout);

        if let Some(token) = token {
            debug!(token = %redact(token), "Attaching access token");
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let blob = request.options.response_type == ResponseType::Blob;
        builder = match &request.body {
            Some(RequestBody::Json(body)) if blob => builder.body(serde_json::to_vec(body)?),
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Multipart(parts)) => builder.multipart(build_form(parts)?),
            None if blob => builder,
            None => builder.header(header::CONTENT_TYPE, "application/json"),
        };

        debug!(
            method = %request.method,
            path = %request.path,
            timeout_secs = timeout.as_secs(),
            "Sending request"
        );
        Ok(builder.send().await?)
    }

    async fn check(request: &ApiRequest, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            %message,
            "API request failed"
        );
        Err(ClientError::from_status(status, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let body = response.bytes().await?;
        // 204 and other empty bodies decode as JSON null
        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        Ok(serde_json::from_slice(body)?)
    }
}

fn build_form(parts: &[FilePart]) -> Result<Form, ClientError> {
    parts.iter().try_fold(Form::new(), |form, file| -> Result<Form, ClientError> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        Ok(form.part(file.field.clone(), part))
    })
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn TokenStore>>,
    session: Option<SessionManager>,
}

impl ApiClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the default request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Persist tokens in `store`
    #[must_use]
    pub fn store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Share an existing session instead of creating one
    #[must_use]
    pub fn session(mut self, session: SessionManager) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url: {e}")))?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("carryit-client/{}", env!("CARGO_PKG_VERSION")));
        let client = ClientBuilder::new().user_agent(user_agent).build()?;
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let session = self.session.unwrap_or_else(|| {
            let store = self
                .store
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));
            let refresher = HttpRefresher::new(client.clone(), base_url.clone(), timeout);
            SessionManager::new(store, Arc::new(refresher))
        });

        Ok(ApiClient {
            client,
            base_url,
            timeout,
            session,
        })
    }
}
