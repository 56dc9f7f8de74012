//! The SMS API.
//!
//! Sends messages through the legacy form-encoded `/sms/json` endpoint and
//! parses the webhooks it generates (inbound messages and delivery
//! receipts).
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_api::{Client, auth::Credentials};
//! use meridian_api::sms::SendSms;
//!
//! let client = Client::new(Credentials::basic("key", "secret")?);
//! let message = SendSms::text("Acme", "447700900000", "Hello").ttl(30_000)?;
//!
//! let collection = client.sms().send(&message).await?;
//! if collection.is_success() {
//!     println!("sent: {}", collection.first().unwrap().message_id().unwrap());
//! }
//! ```

mod message;
mod response;
pub mod webhooks;

pub use message::{SendSms, SmsType, CLIENT_REF_MAX_LEN, TTL_MAX_MS, TTL_MIN_MS};
pub use response::{MessageResponse, SmsCollection};
pub use webhooks::{DeliveryReceipt, InboundSms};

use crate::client::{ApiError, ApiResource};

/// Sub-client for the SMS API.
///
/// Constructed by [`Client::sms`](crate::Client::sms); holds one configured
/// [`ApiResource`] pointed at the legacy REST host.
#[derive(Clone, Debug)]
pub struct SmsClient {
    resource: ApiResource,
}

impl SmsClient {
    /// Wraps a configured resource. Exposed for the registry factory.
    #[must_use]
    pub const fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Sends an SMS, returning the per-destination response collection.
    ///
    /// A long message may be split into several parts, one entry each. The
    /// collection reports success only when every entry was accepted;
    /// per-entry errors (quota, bad number) live on the entries themselves
    /// rather than failing the call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or a response body that
    /// does not parse as a send collection.
    pub async fn send(&self, message: &SendSms) -> Result<SmsCollection, ApiError> {
        let response = self.resource.create(message.to_params(), "/json").await?;
        Ok(SmsCollection::from_value(&response.body)?)
    }

    /// Convenience wrapper: sends a plain text message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] as [`send`](Self::send) does.
    pub async fn send_text(
        &self,
        from: &str,
        to: &str,
        text: &str,
    ) -> Result<SmsCollection, ApiError> {
        self.send(&SendSms::text(from, to, text)).await
    }
}
