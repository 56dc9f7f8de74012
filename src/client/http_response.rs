//! HTTP response types for the Meridian API SDK.
//!
//! This module provides the [`HttpResponse`] type plus the helpers typed
//! responses use to validate their shape: required-key checking and HAL
//! (`_embedded`/`_links`) navigation.

use std::collections::HashMap;

use serde_json::Value;

use crate::client::errors::ResponseError;

/// An HTTP response from a Meridian API.
///
/// Contains the status code, headers, and the decoded JSON body. Responses
/// are read-only after construction; typed accessors live on the per-API
/// response objects hydrated from `body`.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded response body; `Value::Null` when the body was empty.
    pub body: Value,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    pub retry_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Value) -> Self {
        let retry_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            retry_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the HAL-embedded collection with the given name, if present.
    ///
    /// HAL bodies nest their page members under `_embedded.<collection>`.
    #[must_use]
    pub fn embedded(&self, collection: &str) -> Option<&Vec<Value>> {
        self.body
            .get("_embedded")
            .and_then(|e| e.get(collection))
            .and_then(Value::as_array)
    }

    /// Returns the `_links.next.href` URL when the page links to another.
    #[must_use]
    pub fn next_page_url(&self) -> Option<&str> {
        hal_link(&self.body, "next")
    }
}

/// Extracts a HAL link href from a JSON body.
#[must_use]
pub fn hal_link<'a>(body: &'a Value, rel: &str) -> Option<&'a str> {
    body.get("_links")
        .and_then(|links| links.get(rel))
        .and_then(|link| link.get("href"))
        .and_then(Value::as_str)
}

/// Checks that every key in `keys` is present in the JSON object.
///
/// This is a shape check, not value validation: a key mapped to `null`
/// still counts as present, matching the wire behavior of the legacy APIs.
///
/// # Errors
///
/// Returns [`ResponseError::MissingKeys`] naming every absent key.
pub fn require_keys(value: &Value, keys: &[&str]) -> Result<(), ResponseError> {
    let map = value.as_object().ok_or_else(|| ResponseError::Malformed {
        reason: "expected a JSON object".to_string(),
    })?;

    let missing: Vec<String> = keys
        .iter()
        .filter(|key| !map.contains_key(**key))
        .map(|key| (*key).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ResponseError::MissingKeys { missing })
    }
}

/// Renders a scalar JSON value as a string for type-coercing comparison.
///
/// Legacy response bodies are inconsistent about numeric vs string status
/// codes (`"status": "0"` vs `0`); comparing through this helper preserves
/// that looseness.
#[must_use]
pub fn coerce_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
