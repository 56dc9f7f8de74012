//! HTTP transport wrapper for Meridian API communication.
//!
//! This module provides the [`HttpClient`] type: a thin wrapper over the
//! injected reqwest transport that encodes an [`HttpRequest`], performs
//! exactly one round trip, and decodes the response body. Connection
//! pooling, TLS, timeouts, and cancellation all belong to reqwest; this
//! layer adds default headers and JSON/form encoding, nothing more.
//!
//! There is no retry logic anywhere in the SDK: throttle and server errors
//! are surfaced to the caller, who decides whether and when to retry.

use std::collections::HashMap;

use crate::client::errors::{ApiError, ResponseError};
use crate::client::http_request::{BodyFormat, HttpMethod, HttpRequest};
use crate::client::http_response::HttpResponse;
use crate::config::MeridianConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Meridian APIs.
///
/// The client handles:
/// - Default headers including User-Agent and Accept
/// - JSON and url-encoded form body encoding
/// - Response body decoding
///
/// # Thread Safety
///
/// `HttpClient` is `Clone`, `Send`, and `Sync`; clones share one reqwest
/// connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: &MeridianConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Meridian API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_headers,
        }
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request and decodes the response.
    ///
    /// Exactly one round trip is performed. The response body is decoded as
    /// JSON; an empty body decodes to `Value::Null` (several endpoints
    /// return nothing on success).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the transport itself fails
    /// (propagated unmodified from reqwest), or
    /// [`ResponseError::Malformed`] when a 2xx response body is non-empty
    /// but not valid JSON.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "dispatching API request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Patch => self.client.patch(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if request.params_in_body() {
            builder = builder.form(&request.params);
        } else if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        if let (BodyFormat::Json, Some(body)) = (request.format, &request.body) {
            builder = builder.json(body);
        }

        let res = builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let text = res.text().await.unwrap_or_default();

        let body = if text.is_empty() {
            serde_json::Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) if (200..=299).contains(&code) => {
                    return Err(ResponseError::Malformed {
                        reason: format!("invalid JSON: {e}"),
                    }
                    .into());
                }
                // Keep unparseable failure bodies visible to the decoders.
                Err(_) => serde_json::json!({ "raw_body": text }),
            }
        };

        Ok(HttpResponse::new(code, headers, body))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&MeridianConfig::default());
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Meridian API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = MeridianConfig::builder()
            .user_agent_prefix("MyApp/1.0")
            .build();
        let client = HttpClient::new(&config);

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("Meridian API Library"));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&MeridianConfig::default());
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
