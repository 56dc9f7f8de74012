//! HTTP request types for the Meridian API SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder. A request
//! carries a flat map of scalar parameters plus an optional JSON body; how
//! the parameters travel (query string vs form body) is decided by the
//! [`BodyFormat`] and HTTP method at send time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// HTTP methods used by the Meridian APIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// How a request's payload is encoded on the wire.
///
/// Legacy endpoints take url-encoded form parameters; modern endpoints take
/// JSON bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json` body; scalar params travel as the query string.
    Json,
    /// `application/x-www-form-urlencoded`; params travel in the body for
    /// POST/PUT/PATCH and as the query string otherwise.
    Form,
}

impl BodyFormat {
    /// Returns the MIME type string for this format.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// An HTTP request to be sent to a Meridian API.
///
/// Use [`HttpRequest::builder`] to construct requests. Parameters are
/// scalar-only by construction: the builder's [`merge_params`]
/// (`HttpRequestBuilder::merge_params`) silently drops nulls, arrays, and
/// objects, which is the documented behavior for the legacy APIs.
///
/// # Example
///
/// ```rust
/// use meridian_api::client::{BodyFormat, HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "https://rest.example.test/sms/json")
///     .format(BodyFormat::Form)
///     .merge_params(&json!({"from": "Acme", "to": "447700900000", "extra": null}))
///     .build();
///
/// assert_eq!(request.params.get("from").map(String::as_str), Some("Acme"));
/// assert!(!request.params.contains_key("extra"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The absolute URL to send the request to.
    pub url: String,
    /// Flat scalar parameters; sorted so signing and tests are deterministic.
    pub params: BTreeMap<String, String>,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// How the payload is encoded.
    pub format: BodyFormat,
    /// Additional headers (auth handlers insert theirs here).
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Returns `true` if the scalar params should travel in the request body.
    #[must_use]
    pub const fn params_in_body(&self) -> bool {
        matches!(self.format, BodyFormat::Form)
            && matches!(
                self.method,
                HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch
            )
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: HttpMethod,
    url: String,
    params: BTreeMap<String, String>,
    body: Option<serde_json::Value>,
    format: BodyFormat,
    headers: HashMap<String, String>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: BTreeMap::new(),
            body: None,
            format: BodyFormat::Json,
            headers: HashMap::new(),
        }
    }

    /// Sets the payload encoding.
    #[must_use]
    pub const fn format(mut self, format: BodyFormat) -> Self {
        self.format = format;
        self
    }

    /// Adds a single scalar parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Merges the scalar entries of a JSON object into the parameter map.
    ///
    /// Only scalar-valued entries are kept: strings pass through, numbers
    /// are rendered, and booleans become `"1"`/`"0"` (the legacy wire
    /// convention). Nulls, arrays, and nested objects are dropped silently —
    /// a documented quirk of the legacy APIs, not an error.
    #[must_use]
    pub fn merge_params(mut self, value: &serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = value {
            for (key, val) in map {
                match val {
                    serde_json::Value::String(s) => {
                        self.params.insert(key.clone(), s.clone());
                    }
                    serde_json::Value::Number(n) => {
                        self.params.insert(key.clone(), n.to_string());
                    }
                    serde_json::Value::Bool(b) => {
                        self.params
                            .insert(key.clone(), if *b { "1" } else { "0" }.to_string());
                    }
                    // Non-scalar values are filtered out, not errored.
                    serde_json::Value::Null
                    | serde_json::Value::Array(_)
                    | serde_json::Value::Object(_) => {}
                }
            }
        }
        self
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            url: self.url,
            params: self.params,
            body: self.body,
            format: self.format,
            headers: self.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_body_format_content_types() {
        assert_eq!(BodyFormat::Json.as_content_type(), "application/json");
        assert_eq!(
            BodyFormat::Form.as_content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_merge_params_keeps_scalars() {
        let request = HttpRequest::builder(HttpMethod::Post, "https://example.test")
            .merge_params(&json!({
                "from": "Acme",
                "ttl": 30000,
                "status-report-req": true,
            }))
            .build();

        assert_eq!(request.params.get("from").unwrap(), "Acme");
        assert_eq!(request.params.get("ttl").unwrap(), "30000");
        assert_eq!(request.params.get("status-report-req").unwrap(), "1");
    }

    #[test]
    fn test_merge_params_drops_non_scalars_silently() {
        let request = HttpRequest::builder(HttpMethod::Post, "https://example.test")
            .merge_params(&json!({
                "to": "447700900000",
                "nested": {"a": 1},
                "list": [1, 2],
                "absent": null,
            }))
            .build();

        assert_eq!(request.params.len(), 1);
        assert!(request.params.contains_key("to"));
    }

    #[test]
    fn test_false_booleans_become_zero() {
        let request = HttpRequest::builder(HttpMethod::Post, "https://example.test")
            .merge_params(&json!({"delivered": false}))
            .build();
        assert_eq!(request.params.get("delivered").unwrap(), "0");
    }

    #[test]
    fn test_params_in_body_only_for_form_writes() {
        let form_post = HttpRequest::builder(HttpMethod::Post, "https://example.test")
            .format(BodyFormat::Form)
            .build();
        assert!(form_post.params_in_body());

        let form_get = HttpRequest::builder(HttpMethod::Get, "https://example.test")
            .format(BodyFormat::Form)
            .build();
        assert!(!form_get.params_in_body());

        let json_post = HttpRequest::builder(HttpMethod::Post, "https://example.test")
            .format(BodyFormat::Json)
            .build();
        assert!(!json_post.params_in_body());
    }

    #[test]
    fn test_params_are_sorted() {
        let request = HttpRequest::builder(HttpMethod::Get, "https://example.test")
            .param("zebra", "1")
            .param("alpha", "2")
            .build();

        let keys: Vec<&str> = request.params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["alpha", "zebra"]);
    }
}
