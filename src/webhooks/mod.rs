//! Inbound webhook parsing.
//!
//! Meridian delivers webhooks (delivery receipts, inbound messages, verify
//! events) as either a GET with query parameters or a POST carrying a JSON
//! or url-encoded form body. This module normalizes all three transports
//! into one flat parameter map that the per-API webhook types hydrate from.
//!
//! The caller supplies the already-parsed [`IncomingRequest`] — the SDK
//! never reaches into ambient process state — and the per-family factories
//! (`sms::webhooks`, `messages::webhooks`, `verify::webhooks`) dispatch on
//! a discriminator field in the normalized map.
//!
//! # Example
//!
//! ```rust
//! use meridian_api::webhooks::{params_from_request, IncomingRequest};
//!
//! let request = IncomingRequest::post_json(r#"{"channel": "sms", "text": "hi"}"#);
//! let params = params_from_request(&request).unwrap();
//! assert_eq!(params.get("channel").unwrap(), "sms");
//! ```

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::client::HttpMethod;

/// Errors raised while interpreting an inbound webhook.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The payload's discriminator carried a value no factory recognizes.
    #[error("Unable to determine incoming webhook type: unrecognized {discriminator} '{value}'")]
    UnknownType {
        /// The discriminator field consulted.
        discriminator: &'static str,
        /// The unrecognized value.
        value: String,
    },

    /// The payload has no discriminator field at all.
    #[error("Unable to determine incoming webhook type: missing '{discriminator}' field")]
    MissingDiscriminator {
        /// The discriminator field that was absent.
        discriminator: &'static str,
    },

    /// A field the webhook type requires was absent.
    #[error("Webhook payload is missing required field '{field}'")]
    MissingField {
        /// The absent field.
        field: &'static str,
    },

    /// The payload was not valid JSON.
    #[error("Invalid webhook body: {reason}")]
    MalformedBody {
        /// Why parsing failed.
        reason: String,
    },

    /// The request carried a content type this SDK cannot interpret.
    #[error("Unsupported webhook content type '{content_type}'")]
    UnsupportedContentType {
        /// The offending content type.
        content_type: String,
    },
}

/// An inbound HTTP request, already parsed by the caller's web framework.
///
/// Only the pieces webhook dispatch needs are carried: method, content
/// type, query parameters, and the raw body.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    method: HttpMethod,
    content_type: Option<String>,
    query: HashMap<String, String>,
    body: String,
}

impl IncomingRequest {
    /// Wraps a GET webhook delivery.
    #[must_use]
    pub fn get(query: HashMap<String, String>) -> Self {
        Self {
            method: HttpMethod::Get,
            content_type: None,
            query,
            body: String::new(),
        }
    }

    /// Wraps a POST webhook delivery carrying JSON.
    #[must_use]
    pub fn post_json(body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            content_type: Some("application/json".to_string()),
            query: HashMap::new(),
            body: body.into(),
        }
    }

    /// Wraps a POST webhook delivery carrying a url-encoded form.
    #[must_use]
    pub fn post_form(body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            content_type: Some("application/x-www-form-urlencoded".to_string()),
            query: HashMap::new(),
            body: body.into(),
        }
    }

    /// Wraps an arbitrary request.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        content_type: Option<String>,
        query: HashMap<String, String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            method,
            content_type,
            query,
            body: body.into(),
        }
    }
}

/// Normalizes an inbound request into a flat parameter map.
///
/// GET deliveries read the query string; POST deliveries read the body as
/// JSON or url-encoded form depending on content type.
///
/// # Errors
///
/// Returns [`WebhookError::MalformedBody`] for unparseable bodies and
/// [`WebhookError::UnsupportedContentType`] for content types the SDK does
/// not understand.
pub fn params_from_request(request: &IncomingRequest) -> Result<Map<String, Value>, WebhookError> {
    match request.method {
        HttpMethod::Get => Ok(request
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect()),
        _ => {
            let content_type = request
                .content_type
                .as_deref()
                .unwrap_or("application/json");
            // Parameters like `; charset=utf-8` are irrelevant here.
            let base_type = content_type
                .split(';')
                .next()
                .unwrap_or(content_type)
                .trim();

            match base_type {
                "application/json" => params_from_json(&request.body),
                "application/x-www-form-urlencoded" => Ok(parse_form(&request.body)),
                other => Err(WebhookError::UnsupportedContentType {
                    content_type: other.to_string(),
                }),
            }
        }
    }
}

/// Parses a raw JSON string into a flat parameter map.
///
/// # Errors
///
/// Returns [`WebhookError::MalformedBody`] when the string is not a JSON
/// object.
pub fn params_from_json(body: &str) -> Result<Map<String, Value>, WebhookError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| WebhookError::MalformedBody {
            reason: e.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(WebhookError::MalformedBody {
            reason: "expected a JSON object".to_string(),
        }),
    }
}

/// Parses a url-encoded form body into string parameters.
///
/// Undecodable percent sequences pass through verbatim; webhook producers
/// are not consistent enough to be strict here.
#[must_use]
pub fn parse_form(body: &str) -> Map<String, Value> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = percent_decode(parts.next().unwrap_or_default());
            let value = percent_decode(parts.next().unwrap_or_default());
            (key, Value::String(value))
        })
        .collect()
}

// Internal percent decoding since we don't want to add another dependency
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                let high = char::from(bytes[i + 1]).to_digit(16).unwrap_or(0) as u8;
                let low = char::from(bytes[i + 2]).to_digit(16).unwrap_or(0) as u8;
                out.push((high << 4) | low);
                i += 3;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Reads the discriminator field every family factory dispatches on.
///
/// # Errors
///
/// Returns [`WebhookError::MissingDiscriminator`] when the field is absent
/// or not a string.
pub fn discriminator<'a>(
    params: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, WebhookError> {
    params
        .get(field)
        .and_then(Value::as_str)
        .ok_or(WebhookError::MissingDiscriminator {
            discriminator: field,
        })
}
