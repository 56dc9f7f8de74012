//! The unified Messages API.
//!
//! Sends messages across SMS, MMS, WhatsApp, Viber, and Messenger through
//! one JSON endpoint. The endpoint answers 202 with a `message_uuid`;
//! delivery progress arrives later over the status webhook. Errors are
//! RFC 7807 documents.
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_api::messages::{SmsText, WhatsAppText};
//!
//! let uuid = client
//!     .messages()
//!     .send(&SmsText::new("447700900000", "Acme", "Hello"))
//!     .await?;
//! ```

pub mod channel;
pub mod webhooks;

pub use channel::{
    Channel, MessengerText, MmsImage, OutboundMessage, SmsText, ViberText, WhatsAppTemplate,
    WhatsAppText,
};
pub use webhooks::{InboundDetail, InboundMessage, MessageStatus};

use serde_json::Value;

use crate::client::http_response::require_keys;
use crate::client::{ApiError, ApiResource};

/// Sub-client for the unified Messages API.
#[derive(Clone, Debug)]
pub struct MessagesClient {
    resource: ApiResource,
}

impl MessagesClient {
    /// Wraps a configured resource. Exposed for the registry factory.
    #[must_use]
    pub const fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Sends a message on whatever channel it declares.
    ///
    /// Returns the platform-assigned message UUID from the 202 response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] with field-level detail for rejected
    /// sends, or other [`ApiError`] variants per the classification rules.
    pub async fn send(&self, message: &impl OutboundMessage) -> Result<String, ApiError> {
        let response = self.resource.create(message.to_body(), "").await?;
        require_keys(&response.body, &["message_uuid"])?;
        Ok(response
            .body
            .get("message_uuid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}
