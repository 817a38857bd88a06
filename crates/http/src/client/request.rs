//! Request description and per-request options
//!
//! A request is kept as plain data rather than a `reqwest::RequestBuilder`
//! so it can be sent a second time after a token refresh.

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Timeout applied when a request does not ask for another one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for endpoints known to return large payloads
pub const EXTENDED_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for image and document uploads
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(180);

/// Expected shape of the response body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    #[default]
    Json,
    /// Binary download; no JSON content type is sent
    Blob,
}

/// Options that vary per request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub response_type: ResponseType,
    /// Falls back to the client's default timeout when unset
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options for a binary download
    pub fn blob() -> Self {
        Self {
            response_type: ResponseType::Blob,
            ..Self::default()
        }
    }

    /// Options for a file upload
    pub fn upload() -> Self {
        Self::default().with_timeout(UPLOAD_TIMEOUT)
    }

    /// Override the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// One file in a multipart upload
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Bytes,
}

impl FilePart {
    /// Create a part for form field `field`
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    /// Set the MIME type of the part
    #[must_use]
    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Request payload
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(JsonValue),
    Multipart(Vec<FilePart>),
}

/// A replayable API request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<RequestBody>,
    pub options: RequestOptions,
}

impl ApiRequest {
    /// Create a request without a body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// PATCH request
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attach files as a multipart form
    #[must_use]
    pub fn multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    /// Replace the options
    #[must_use]
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Append query parameters to a path, skipping unset values
pub fn with_query<'a, I>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, &value);
            any = true;
        }
    }

    if any {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}{}", serializer.finish())
    } else {
        path.to_string()
    }
}

/// Pagination and free-form filters for list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    /// Page through results
    pub const fn page(skip: u32, limit: u32) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
            filters: Vec::new(),
        }
    }

    /// Add a filter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }

    /// Render onto `path`
    pub fn apply(&self, path: &str) -> String {
        let paging = [
            ("skip", self.skip.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
        ];
        let filters = self
            .filters
            .iter()
            .map(|(key, value)| (key.as_str(), Some(value.clone())));
        with_query(path, paging.into_iter().chain(filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_skips_unset_values() {
        let path = with_query(
            "/tenants",
            [("status", Some("active".to_string())), ("property_id", None)],
        );
        assert_eq!(path, "/tenants?status=active");
        assert_eq!(with_query("/tenants", [("status", None)]), "/tenants");
    }

    #[test]
    fn test_with_query_encodes_values() {
        let path = with_query("/units/search/x?skip=0", [("q", Some("two bed & bath".to_string()))]);
        assert_eq!(path, "/units/search/x?skip=0&q=two+bed+%26+bath");
    }

    #[test]
    fn test_list_params() {
        let params = ListParams::page(0, 100).filter("status", "overdue");
        assert_eq!(params.apply("/payments"), "/payments?skip=0&limit=100&status=overdue");
        assert_eq!(ListParams::default().apply("/agents/"), "/agents/");
    }

    #[test]
    fn test_option_presets() {
        assert_eq!(RequestOptions::upload().timeout, Some(UPLOAD_TIMEOUT));
        assert_eq!(RequestOptions::blob().response_type, ResponseType::Blob);
        assert_eq!(RequestOptions::default().timeout, None);
    }
}
