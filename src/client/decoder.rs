//! Pluggable error decoding.
//!
//! Meridian's endpoints do not agree on an error body shape: modern JSON
//! APIs send RFC 7807-style `{type, title, detail, invalid_parameters}`
//! documents, while the legacy form APIs report a business `status` code and
//! an `error-text` pair — inside an HTTP 200 more often than not. The
//! dispatcher therefore cannot hard-code one parsing rule; each
//! [`ApiResource`](crate::client::ApiResource) is configured with the
//! [`ErrorDecoder`] matching its endpoint family.
//!
//! Classification by HTTP status is shared by every decoder:
//! 429 becomes [`ApiError::Throttle`], 5xx becomes [`ApiError::Server`],
//! the remaining 4xx become [`ApiError::Request`], and anything else
//! surfaces as [`ApiError::Unexpected`].

use std::fmt;

use serde_json::Value;

use crate::client::errors::{ApiError, FieldError};
use crate::client::http_response::{coerce_str, HttpResponse};

/// Decodes API-level failures out of an HTTP response.
///
/// `decode` is called for every non-2xx response, and for 2xx responses
/// only when the owning resource has `errors_on_200` enabled. Returning
/// `None` means the response is a success.
pub trait ErrorDecoder: Send + Sync + fmt::Debug {
    /// Inspects a response and returns the error it represents, if any.
    fn decode(&self, response: &HttpResponse) -> Option<ApiError>;
}

/// Classifies a failure by HTTP status code.
///
/// The decoders extract a message (and optional field errors) from their
/// body format, then delegate here for the status-range mapping.
#[must_use]
pub fn classify_status(
    response: &HttpResponse,
    title: String,
    detail: Option<String>,
    invalid_parameters: Vec<FieldError>,
) -> ApiError {
    let code = response.code;
    match code {
        429 => ApiError::Throttle {
            retry_after: retry_hint(response),
            message: detail.unwrap_or(title),
        },
        500..=599 => ApiError::Server {
            code,
            message: detail.map_or_else(|| title.clone(), |d| format!("{title}: {d}")),
        },
        400..=499 => ApiError::Request {
            code,
            title,
            detail,
            invalid_parameters,
        },
        _ => ApiError::Unexpected {
            code,
            message: title,
        },
    }
}

/// Extracts a retry-after hint from the response.
///
/// The `Retry-After` header wins; some bodies carry a `retry_after`
/// or `retry-after` field instead.
#[must_use]
pub fn retry_hint(response: &HttpResponse) -> Option<f64> {
    if response.retry_after.is_some() {
        return response.retry_after;
    }
    ["retry_after", "retry-after"]
        .iter()
        .find_map(|key| response.body.get(*key))
        .and_then(Value::as_f64)
}

/// Decoder for RFC 7807-style problem documents.
///
/// Used by the modern JSON APIs (voice, messages, subaccounts, secrets,
/// network). Bodies look like:
///
/// ```json
/// {
///   "type": "https://developer.example.com/errors/invalid-parameters",
///   "title": "Invalid parameters",
///   "detail": "The `to` number is not valid",
///   "invalid_parameters": [{"name": "to", "reason": "must be E.164"}]
/// }
/// ```
#[derive(Debug, Default)]
pub struct Rfc7807Decoder;

impl ErrorDecoder for Rfc7807Decoder {
    fn decode(&self, response: &HttpResponse) -> Option<ApiError> {
        if response.is_ok() {
            return None;
        }

        let body = &response.body;
        let title = body
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("API request failed")
            .to_string();
        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        let invalid_parameters = body
            .get("invalid_parameters")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        Some(FieldError {
                            name: entry.get("name")?.as_str()?.to_string(),
                            reason: entry
                                .get("reason")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(classify_status(response, title, detail, invalid_parameters))
    }
}

/// Decoder for the legacy `{status, error-text}` body format.
///
/// Legacy SMS and Verify endpoints report business failure inside HTTP 200:
/// a `status` of `0` means success and anything else is an error described
/// by `error-text` (spelled `error_text` by some endpoints). Status `1` is
/// the legacy throttle signal. Status values compare with type-coercing
/// equality because the wire is inconsistent about `"0"` vs `0`.
#[derive(Debug, Default)]
pub struct LegacyDecoder;

impl LegacyDecoder {
    /// Reads the normalized error text from a legacy body.
    fn error_text(body: &Value) -> Option<String> {
        body.get("error-text")
            .or_else(|| body.get("error_text"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }

    /// Reads the coerced business status from a legacy body.
    #[must_use]
    pub fn status(body: &Value) -> Option<String> {
        body.get("status").and_then(coerce_str)
    }
}

impl ErrorDecoder for LegacyDecoder {
    fn decode(&self, response: &HttpResponse) -> Option<ApiError> {
        let body = &response.body;

        if !response.is_ok() {
            let title = Self::error_text(body).unwrap_or_else(|| "API request failed".to_string());
            return Some(classify_status(response, title, None, Vec::new()));
        }

        // HTTP 200 with an error-shaped body (errors_on_200 endpoints).
        let status = Self::status(body)?;
        if status == "0" {
            return None;
        }
        // Lifecycle strings like "SUCCESS"/"IN PROGRESS" (search bodies)
        // are not business error codes.
        if !status.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let message = Self::error_text(body)
            .unwrap_or_else(|| format!("API responded with status {status}"));

        if status == "1" {
            return Some(ApiError::Throttle {
                retry_after: retry_hint(response),
                message,
            });
        }

        Some(ApiError::Request {
            code: response.code,
            title: message,
            detail: Some(format!("error status {status}")),
            invalid_parameters: Vec::new(),
        })
    }
}
