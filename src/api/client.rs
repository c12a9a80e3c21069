use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

use crate::config::{PortalConfig, RequestConfig};
use crate::error::{RequestError, RequestResult};
use crate::storage::SessionManager;

/// Message used when a failed response carries no usable `error` field.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Per-call request options.
///
/// Headers are shallow-merged over the client defaults: a caller header
/// replaces the default of the same name (case-insensitive) and every other
/// default survives.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// Headers applied over the defaults
    pub headers: Vec<(String, String)>,
    /// Query-string pairs
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// GET with no body
    pub fn get() -> Self {
        Self::default()
    }

    /// POST with no body
    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    /// Add or override a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append query parameters
    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Set a raw JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON body
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> RequestResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| RequestError::Encode {
            message: e.to_string(),
        })?;
        Ok(self.with_body(value))
    }
}

/// Authenticated JSON client for the portal REST API.
///
/// The bearer token is read from the shared [`SessionManager`] at the moment
/// each request is built, so a login or logout takes effect on the next call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
    request_config: RequestConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(
        config: &PortalConfig,
        request_config: RequestConfig,
        session: Arc<SessionManager>,
    ) -> RequestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(RequestError::Network)?;

        Ok(Self {
            client,
            base_url: config.api_base_url(),
            session,
            request_config,
        })
    }

    /// Get the API base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session the client reads its token from
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Resolve an endpoint path against the API base; absolute URLs pass through.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Resolve `base` and append `segment` as a single percent-encoded path
    /// segment, so `/`, `?` and `#` inside it cannot change the target.
    pub fn resolve_segment(&self, base: &str, segment: &str) -> RequestResult<String> {
        if matches!(segment, "" | "." | "..") {
            return Err(RequestError::InvalidUrl {
                url: format!("{}/{}", base, segment),
            });
        }

        let full = self.resolve_url(base);
        let invalid = || RequestError::InvalidUrl { url: full.clone() };
        let mut url = Url::parse(&full).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(segment);

        Ok(url.to_string())
    }

    /// Build the outgoing header set: defaults, then caller overrides.
    pub fn build_headers(&self, overrides: &[(String, String)]) -> RequestResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.get_token().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                RequestError::InvalidHeader {
                    name: AUTHORIZATION.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in overrides {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequestError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| RequestError::InvalidHeader { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// The body is parsed as JSON whatever the status. A non-success status
    /// fails with [`RequestError::Api`] carrying the server's message. Every
    /// failure is logged before it is returned.
    pub async fn api_request(&self, url: &str, options: RequestOptions) -> RequestResult<Value> {
        let method = options.method.clone();
        let start = Instant::now();

        match self.execute_request(url, options).await {
            Ok(body) => {
                debug!(
                    method = %method,
                    url = %url,
                    latency_ms = start.elapsed().as_millis(),
                    "API request succeeded"
                );
                Ok(body)
            }
            Err(e) => {
                error!(
                    method = %method,
                    url = %url,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "API request failed"
                );
                Err(e)
            }
        }
    }

    /// Issue a request and decode the body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> RequestResult<T> {
        let body = self.api_request(url, options).await?;

        serde_json::from_value(body).map_err(|e| {
            let err = RequestError::Decode {
                message: e.to_string(),
            };
            error!(url = %url, error = %err, "API response did not match expected shape");
            err
        })
    }

    /// Execute a single request (internal)
    async fn execute_request(&self, url: &str, options: RequestOptions) -> RequestResult<Value> {
        let full_url = self.resolve_url(url);
        let parsed = Url::parse(&full_url).map_err(|_| RequestError::InvalidUrl {
            url: full_url.clone(),
        })?;
        let headers = self.build_headers(&options.headers)?;

        let mut builder = self.client.request(options.method, parsed).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = options.body {
            builder = builder.body(body.to_string());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let data: Value =
            serde_json::from_slice(&bytes).map_err(|e| RequestError::ResponseParse {
                message: format!("Failed to parse response (status {}): {}", status.as_u16(), e),
            })?;

        if !status.is_success() {
            return Err(RequestError::Api {
                status: status.as_u16(),
                message: failure_message(&data),
            });
        }

        Ok(data)
    }

    fn transport_error(&self, e: reqwest::Error) -> RequestError {
        if e.is_timeout() {
            RequestError::Timeout {
                timeout_ms: self.request_config.timeout_ms,
            }
        } else {
            RequestError::Network(e)
        }
    }
}

/// Pick the human-readable message out of a failure body.
///
/// Only a non-empty `error` string is used; anything else falls back to
/// [`GENERIC_FAILURE_MESSAGE`].
pub fn failure_message(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    async fn test_client() -> ApiClient {
        let session = SessionManager::load(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        let config = PortalConfig {
            base_url: "http://localhost:5000".to_string(),
        };
        ApiClient::new(&config, RequestConfig::default(), Arc::new(session)).unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = test_client().await;
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[tokio::test]
    async fn test_resolve_url() {
        let client = test_client().await;
        assert_eq!(
            client.resolve_url("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(
            client.resolve_url("auth/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(
            client.resolve_url("https://other.example.com/x"),
            "https://other.example.com/x"
        );
    }

    #[tokio::test]
    async fn test_resolve_segment_encodes_one_segment() {
        let client = test_client().await;
        assert_eq!(
            client.resolve_segment("/energy/news", "abc").unwrap(),
            "http://localhost:5000/api/energy/news/abc"
        );
        assert_eq!(
            client
                .resolve_segment("/energy/news", "../../user/profile")
                .unwrap(),
            "http://localhost:5000/api/energy/news/..%2F..%2Fuser%2Fprofile"
        );
        assert_eq!(
            client.resolve_segment("/energy/news", "n1?limit=1#x").unwrap(),
            "http://localhost:5000/api/energy/news/n1%3Flimit=1%23x"
        );
    }

    #[tokio::test]
    async fn test_resolve_segment_rejects_dot_segments() {
        let client = test_client().await;
        for segment in ["", ".", ".."] {
            let err = client.resolve_segment("/energy/news", segment).unwrap_err();
            assert!(matches!(err, RequestError::InvalidUrl { .. }));
        }
    }

    #[tokio::test]
    async fn test_default_headers_without_token() {
        let client = test_client().await;
        let headers = client.build_headers(&[]).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_headers_include_current_token() {
        let client = test_client().await;
        client.session().set_token("t1").await.unwrap();
        let headers = client.build_headers(&[]).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t1");

        client.session().set_token("t2").await.unwrap();
        let headers = client.build_headers(&[]).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t2");
    }

    #[tokio::test]
    async fn test_empty_token_sends_no_authorization() {
        let client = test_client().await;
        client.session().set_token("").await.unwrap();
        let headers = client.build_headers(&[]).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_caller_headers_override_by_name() {
        let client = test_client().await;
        client.session().set_token("t1").await.unwrap();
        let overrides = vec![
            ("content-type".to_string(), "text/plain".to_string()),
            ("X-Trace".to_string(), "abc".to_string()),
        ];
        let headers = client.build_headers(&overrides).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t1");
        assert_eq!(headers.get("x-trace").unwrap(), "abc");
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_header_name_rejected() {
        let client = test_client().await;
        let overrides = vec![("bad header".to_string(), "x".to_string())];
        let err = client.build_headers(&overrides).unwrap_err();
        assert!(matches!(err, RequestError::InvalidHeader { .. }));
    }

    #[test]
    fn test_failure_message_reads_error_field_only() {
        assert_eq!(failure_message(&json!({"error": "X"})), "X");
        assert_eq!(
            failure_message(&json!({"error": "X", "message": "Y"})),
            "X"
        );
        assert_eq!(
            failure_message(&json!({"success": false, "message": "Y"})),
            GENERIC_FAILURE_MESSAGE
        );
        assert_eq!(
            failure_message(&json!({"error": {"message": "nested"}})),
            GENERIC_FAILURE_MESSAGE
        );
        assert_eq!(failure_message(&json!({})), GENERIC_FAILURE_MESSAGE);
        assert_eq!(failure_message(&json!({"error": ""})), GENERIC_FAILURE_MESSAGE);
        assert_eq!(failure_message(&json!([1, 2])), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_request_options_builders() {
        let opts = RequestOptions::post()
            .with_header("X-A", "1")
            .with_json(&json!({"k": "v"}))
            .unwrap();
        assert_eq!(opts.method, Method::POST);
        assert_eq!(opts.headers.len(), 1);
        assert_eq!(opts.body, Some(json!({"k": "v"})));

        let opts = RequestOptions::get();
        assert_eq!(opts.method, Method::GET);
        assert!(opts.body.is_none());
    }
}
