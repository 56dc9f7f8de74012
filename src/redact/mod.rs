//! The Redact API.
//!
//! Erases personal data from a stored message or call record. The endpoint
//! answers 204 on success and reports failures in its own body format
//! (`error_title`/`error_description` rather than RFC 7807), so this module
//! supplies its own [`ErrorDecoder`].

use std::fmt;

use serde_json::{json, Value};

use crate::client::decoder::{classify_status, ErrorDecoder};
use crate::client::{ApiError, ApiResource, HttpResponse};

/// The product whose record is being redacted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Product {
    /// Legacy SMS records.
    Sms,
    /// Voice call records.
    Voice,
    /// Unified messages records.
    Messages,
    /// Verify request records.
    Verify,
    /// Number insight lookups.
    NumberInsight,
}

impl Product {
    /// Returns the wire name of this product.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Voice => "voice",
            Self::Messages => "messages",
            Self::Verify => "verify",
            Self::NumberInsight => "number-insight",
        }
    }
}

/// Which direction the redacted record traveled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// A record the platform received.
    Inbound,
    /// A record the platform sent.
    Outbound,
}

impl Direction {
    /// Returns the wire name of this direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoder for the redaction endpoint's error format.
///
/// Bodies look like `{"error_title": "...", "error_description": "..."}`,
/// sometimes with only the title present.
#[derive(Debug, Default)]
pub struct RedactDecoder;

impl ErrorDecoder for RedactDecoder {
    fn decode(&self, response: &HttpResponse) -> Option<ApiError> {
        if response.is_ok() {
            return None;
        }

        let body = &response.body;
        let title = body
            .get("error_title")
            .or_else(|| body.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("Redaction request failed")
            .to_string();
        let detail = body
            .get("error_description")
            .or_else(|| body.get("detail"))
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Some(classify_status(response, title, detail, Vec::new()))
    }
}

/// Sub-client for the Redact API.
#[derive(Clone, Debug)]
pub struct RedactClient {
    resource: ApiResource,
}

impl RedactClient {
    /// Wraps a configured resource. Exposed for the registry factory.
    #[must_use]
    pub const fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Redacts one stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] when the record is too recent or
    /// already redacted, classified through [`RedactDecoder`].
    pub async fn transaction(
        &self,
        id: &str,
        product: Product,
        direction: Direction,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "id": id,
            "product": product.as_str(),
            "type": direction.as_str(),
        });
        self.resource.create(payload, "/transaction").await?;
        Ok(())
    }
}
