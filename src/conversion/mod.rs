//! The Conversion API.
//!
//! Reports back to the platform whether a message or call achieved its
//! purpose, which feeds delivery quality routing. Both operations POST
//! exactly three form parameters and treat an empty 200 body as success.

use crate::client::{ApiError, ApiResource};

/// Sub-client for the Conversion API.
#[derive(Clone, Debug)]
pub struct ConversionClient {
    resource: ApiResource,
}

impl ConversionClient {
    /// Wraps a configured resource. Exposed for the registry factory.
    #[must_use]
    pub const fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Reports the conversion state of an SMS.
    ///
    /// `timestamp` is the conversion moment in `yyyyMMddHHmmss` or Unix
    /// form; `None` lets the platform use its receipt time.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn sms(
        &self,
        message_id: &str,
        delivered: bool,
        timestamp: Option<&str>,
    ) -> Result<(), ApiError> {
        self.submit("/sms", message_id, delivered, timestamp).await
    }

    /// Reports the conversion state of a voice call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn voice(
        &self,
        call_id: &str,
        delivered: bool,
        timestamp: Option<&str>,
    ) -> Result<(), ApiError> {
        self.submit("/voice", call_id, delivered, timestamp).await
    }

    async fn submit(
        &self,
        suffix: &str,
        message_id: &str,
        delivered: bool,
        timestamp: Option<&str>,
    ) -> Result<(), ApiError> {
        let payload = serde_json::json!({
            "message-id": message_id,
            "delivered": delivered,
            "timestamp": timestamp,
        });
        // The endpoint answers 200 with an empty body; nothing to hydrate.
        self.resource.create(payload, suffix).await?;
        Ok(())
    }
}
