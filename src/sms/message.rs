//! Outbound SMS message construction and validation.
//!
//! [`SendSms`] is the request value object for the legacy `/sms/json`
//! endpoint. Validation happens at the point of setting a field — an
//! out-of-range TTL or an over-long client reference never reaches the
//! wire.

use serde_json::{json, Value};

use crate::error::ValidationError;

/// Minimum accepted message time-to-live, in milliseconds (20 seconds).
pub const TTL_MIN_MS: u64 = 20_000;

/// Maximum accepted message time-to-live, in milliseconds (7 days).
pub const TTL_MAX_MS: u64 = 604_800_000;

/// Maximum accepted client reference length, in characters.
pub const CLIENT_REF_MAX_LEN: usize = 40;

/// Wire encoding of an outbound SMS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmsType {
    /// GSM 03.38 text.
    Text,
    /// Raw binary body with a user data header.
    Binary,
    /// UCS-2 text for non-GSM alphabets.
    Unicode,
}

impl SmsType {
    /// Returns the wire name of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
            Self::Unicode => "unicode",
        }
    }
}

/// An outbound SMS for the legacy send endpoint.
///
/// Construct with [`SendSms::text`], [`SendSms::unicode`], or
/// [`SendSms::binary`], then chain the optional setters. Setters that
/// validate return `Result`, so invalid input fails before any network
/// call.
///
/// # Example
///
/// ```rust
/// use meridian_api::sms::SendSms;
///
/// let message = SendSms::text("Acme", "447700900000", "Hello")
///     .ttl(30_000)
///     .unwrap()
///     .client_ref("order-66")
///     .unwrap()
///     .delivery_receipt(true);
///
/// let params = message.to_params();
/// assert_eq!(params["ttl"], 30_000);
/// assert_eq!(params["status-report-req"], true);
/// ```
#[derive(Clone, Debug)]
pub struct SendSms {
    from: String,
    to: String,
    sms_type: SmsType,
    text: Option<String>,
    body: Option<String>,
    udh: Option<String>,
    ttl: Option<u64>,
    client_ref: Option<String>,
    status_report_req: Option<bool>,
    callback: Option<String>,
    message_class: Option<u8>,
}

impl SendSms {
    fn new(from: impl Into<String>, to: impl Into<String>, sms_type: SmsType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            sms_type,
            text: None,
            body: None,
            udh: None,
            ttl: None,
            client_ref: None,
            status_report_req: None,
            callback: None,
            message_class: None,
        }
    }

    /// Creates a GSM text message.
    #[must_use]
    pub fn text(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        let mut message = Self::new(from, to, SmsType::Text);
        message.text = Some(text.into());
        message
    }

    /// Creates a UCS-2 text message.
    #[must_use]
    pub fn unicode(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let mut message = Self::new(from, to, SmsType::Unicode);
        message.text = Some(text.into());
        message
    }

    /// Creates a binary message from hex-encoded body and UDH.
    #[must_use]
    pub fn binary(
        from: impl Into<String>,
        to: impl Into<String>,
        body: impl Into<String>,
        udh: impl Into<String>,
    ) -> Self {
        let mut message = Self::new(from, to, SmsType::Binary);
        message.body = Some(body.into());
        message.udh = Some(udh.into());
        message
    }

    /// Sets the message time-to-live in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TtlOutOfRange`] unless the value falls in
    /// `20000..=604800000`.
    pub fn ttl(mut self, ttl_ms: u64) -> Result<Self, ValidationError> {
        if !(TTL_MIN_MS..=TTL_MAX_MS).contains(&ttl_ms) {
            return Err(ValidationError::TtlOutOfRange {
                min: TTL_MIN_MS,
                max: TTL_MAX_MS,
                actual: ttl_ms,
            });
        }
        self.ttl = Some(ttl_ms);
        Ok(self)
    }

    /// Sets the client reference echoed back in delivery receipts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ClientRefTooLong`] for references longer
    /// than 40 characters.
    pub fn client_ref(mut self, client_ref: impl Into<String>) -> Result<Self, ValidationError> {
        let client_ref = client_ref.into();
        let length = client_ref.chars().count();
        if length > CLIENT_REF_MAX_LEN {
            return Err(ValidationError::ClientRefTooLong {
                max: CLIENT_REF_MAX_LEN,
                actual: length,
            });
        }
        self.client_ref = Some(client_ref);
        Ok(self)
    }

    /// Sets the GSM 03.38 message class.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMessageClass`] for values above 3.
    pub fn message_class(mut self, class: u8) -> Result<Self, ValidationError> {
        if class > 3 {
            return Err(ValidationError::InvalidMessageClass { actual: class });
        }
        self.message_class = Some(class);
        Ok(self)
    }

    /// Requests (or suppresses) a delivery receipt.
    #[must_use]
    pub const fn delivery_receipt(mut self, requested: bool) -> Self {
        self.status_report_req = Some(requested);
        self
    }

    /// Sets a per-message delivery receipt callback URL.
    #[must_use]
    pub fn callback(mut self, url: impl Into<String>) -> Self {
        self.callback = Some(url.into());
        self
    }

    /// Returns the configured client reference, if any.
    #[must_use]
    pub fn get_client_ref(&self) -> Option<&str> {
        self.client_ref.as_deref()
    }

    /// Returns the configured TTL, if any.
    #[must_use]
    pub const fn get_ttl(&self) -> Option<u64> {
        self.ttl
    }

    /// Returns the wire parameter map for this message.
    ///
    /// Only set fields appear; unset optionals serialize as JSON null and
    /// are filtered out by the request builder.
    #[must_use]
    pub fn to_params(&self) -> Value {
        json!({
            "from": self.from,
            "to": self.to,
            "type": self.sms_type.as_str(),
            "text": self.text,
            "body": self.body,
            "udh": self.udh,
            "ttl": self.ttl,
            "client-ref": self.client_ref,
            "status-report-req": self.status_report_req,
            "callback": self.callback,
            "message-class": self.message_class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_params() {
        let params = SendSms::text("Acme", "447700900000", "Hello").to_params();
        assert_eq!(params["from"], "Acme");
        assert_eq!(params["to"], "447700900000");
        assert_eq!(params["type"], "text");
        assert_eq!(params["text"], "Hello");
        assert!(params["body"].is_null());
    }

    #[test]
    fn test_binary_message_params() {
        let params = SendSms::binary("Acme", "447700900000", "00480065", "06050415811581")
            .to_params();
        assert_eq!(params["type"], "binary");
        assert_eq!(params["body"], "00480065");
        assert_eq!(params["udh"], "06050415811581");
        assert!(params["text"].is_null());
    }

    #[test]
    fn test_ttl_bounds_are_inclusive() {
        let at_min = SendSms::text("a", "b", "c").ttl(TTL_MIN_MS).unwrap();
        assert_eq!(at_min.get_ttl(), Some(TTL_MIN_MS));

        let at_max = SendSms::text("a", "b", "c").ttl(TTL_MAX_MS).unwrap();
        assert_eq!(at_max.get_ttl(), Some(TTL_MAX_MS));
    }

    #[test]
    fn test_ttl_below_minimum_fails() {
        let error = SendSms::text("a", "b", "c").ttl(TTL_MIN_MS - 1).unwrap_err();
        assert_eq!(
            error,
            ValidationError::TtlOutOfRange {
                min: TTL_MIN_MS,
                max: TTL_MAX_MS,
                actual: 19_999,
            }
        );
    }

    #[test]
    fn test_ttl_above_maximum_fails() {
        let error = SendSms::text("a", "b", "c").ttl(TTL_MAX_MS + 1).unwrap_err();
        assert!(matches!(error, ValidationError::TtlOutOfRange { .. }));
    }

    #[test]
    fn test_ttl_round_trips_through_params() {
        let params = SendSms::text("a", "b", "c").ttl(30_000).unwrap().to_params();
        assert_eq!(params["ttl"], 30_000);
    }

    #[test]
    fn test_client_ref_length_boundary() {
        let ok = SendSms::text("a", "b", "c")
            .client_ref("x".repeat(40))
            .unwrap();
        assert_eq!(ok.get_client_ref(), Some("x".repeat(40).as_str()));

        let error = SendSms::text("a", "b", "c")
            .client_ref("x".repeat(41))
            .unwrap_err();
        assert_eq!(
            error,
            ValidationError::ClientRefTooLong {
                max: 40,
                actual: 41,
            }
        );
    }

    #[test]
    fn test_message_class_range() {
        assert!(SendSms::text("a", "b", "c").message_class(3).is_ok());
        assert!(matches!(
            SendSms::text("a", "b", "c").message_class(4),
            Err(ValidationError::InvalidMessageClass { actual: 4 })
        ));
    }

    #[test]
    fn test_delivery_receipt_flag_serializes_as_bool() {
        let params = SendSms::text("a", "b", "c").delivery_receipt(true).to_params();
        assert_eq!(params["status-report-req"], true);
    }
}
