//! CarryIT HTTP client
//!
//! Typed access to the CarryIT property-management REST API with bearer
//! authentication and transparent access-token refresh.

pub mod client;
pub mod types;

pub use client::error::{ClientError, RefreshError};
pub use client::request::{ApiRequest, FilePart, RequestBody, ResponseType};
pub use client::{
    ApiClient, ApiClientBuilder, ListParams, RequestOptions, SessionEvent, SessionManager,
    SessionState, TokenRefresher,
};
