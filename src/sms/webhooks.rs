//! Inbound SMS and delivery receipt webhooks.
//!
//! The platform delivers these either as a GET with query parameters or a
//! POST with a JSON or form body; [`InboundSms::from_request`] and
//! [`DeliveryReceipt::from_request`] accept all three via the generic
//! [`webhooks`](crate::webhooks) parsing. Both types keep the raw
//! parameter map behind [`get`](InboundSms::get) because carriers attach
//! open-ended extra fields.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::webhooks::{params_from_request, IncomingRequest, WebhookError};

/// Wire format of webhook timestamps (`2020-01-01 12:00:00`, UTC).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn str_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(ToString::to_string)
}

fn required_param(
    params: &Map<String, Value>,
    key: &'static str,
) -> Result<String, WebhookError> {
    str_param(params, key).ok_or(WebhookError::MissingField { field: key })
}

fn timestamp_param(params: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    params
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok())
        .map(|naive| naive.and_utc())
}

/// An inbound SMS delivered to a webhook endpoint.
#[derive(Clone, Debug)]
pub struct InboundSms {
    /// Sender number.
    pub msisdn: String,
    /// The Meridian number that received the message.
    pub to: String,
    /// Platform-assigned message ID.
    pub message_id: String,
    /// Wire type (`text`, `binary`, `unicode`).
    pub sms_type: String,
    /// Message text for text-type messages.
    pub text: Option<String>,
    /// First word of the message, uppercased by the platform.
    pub keyword: Option<String>,
    /// When the platform received the message.
    pub message_timestamp: Option<DateTime<Utc>>,
    /// Hex-encoded body for binary messages.
    pub data: Option<String>,
    /// Hex-encoded user data header for binary messages.
    pub udh: Option<String>,
    /// Concatenation reference when this is one part of a long message.
    pub concat_ref: Option<String>,
    /// Total number of parts in the concatenated message.
    pub concat_total: Option<u32>,
    /// This part's position within the concatenated message.
    pub concat_part: Option<u32>,
    raw: Map<String, Value>,
}

impl InboundSms {
    /// Hydrates an inbound SMS from normalized webhook parameters.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingField`] when any of `msisdn`, `to`,
    /// `messageId`, or `type` is absent.
    pub fn from_params(params: Map<String, Value>) -> Result<Self, WebhookError> {
        let concat_number = |key: &str| {
            params
                .get(key)
                .and_then(Value::as_str)
                .and_then(|raw| raw.parse().ok())
        };

        Ok(Self {
            msisdn: required_param(&params, "msisdn")?,
            to: required_param(&params, "to")?,
            message_id: required_param(&params, "messageId")?,
            sms_type: required_param(&params, "type")?,
            text: str_param(&params, "text"),
            keyword: str_param(&params, "keyword"),
            message_timestamp: timestamp_param(&params, "message-timestamp"),
            data: str_param(&params, "data"),
            udh: str_param(&params, "udh"),
            concat_ref: str_param(&params, "concat-ref"),
            concat_total: concat_number("concat-total"),
            concat_part: concat_number("concat-part"),
            raw: params,
        })
    }

    /// Hydrates an inbound SMS straight from an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] for unparseable requests or missing fields.
    pub fn from_request(request: &IncomingRequest) -> Result<Self, WebhookError> {
        Self::from_params(params_from_request(request)?)
    }

    /// Returns `true` when this message is one part of a concatenated SMS.
    #[must_use]
    pub const fn is_concatenated(&self) -> bool {
        self.concat_ref.is_some()
    }

    /// Raw access to any wire field, including ones without a typed field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

/// A delivery receipt (DLR) confirming a message's fate.
#[derive(Clone, Debug)]
pub struct DeliveryReceipt {
    /// Recipient number the receipt refers to.
    pub msisdn: String,
    /// The sender ID the original message used.
    pub to: String,
    /// Platform-assigned ID of the original message.
    pub message_id: String,
    /// Delivery status (`delivered`, `failed`, `expired`, ...).
    pub status: String,
    /// Network code that handled delivery.
    pub network_code: Option<String>,
    /// Price charged for the message.
    pub price: Option<String>,
    /// SMSC timestamp in semi-octet format.
    pub scts: Option<String>,
    /// Carrier error code; `0` means none.
    pub err_code: Option<String>,
    /// Client reference from the original send.
    pub client_ref: Option<String>,
    /// When the receipt was generated.
    pub message_timestamp: Option<DateTime<Utc>>,
    raw: Map<String, Value>,
}

impl DeliveryReceipt {
    /// Hydrates a delivery receipt from normalized webhook parameters.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingField`] when any of `msisdn`, `to`,
    /// `messageId`, or `status` is absent.
    pub fn from_params(params: Map<String, Value>) -> Result<Self, WebhookError> {
        Ok(Self {
            msisdn: required_param(&params, "msisdn")?,
            to: required_param(&params, "to")?,
            message_id: required_param(&params, "messageId")?,
            status: required_param(&params, "status")?,
            network_code: str_param(&params, "network-code"),
            price: str_param(&params, "price"),
            scts: str_param(&params, "scts"),
            err_code: str_param(&params, "err-code"),
            client_ref: str_param(&params, "client-ref"),
            message_timestamp: timestamp_param(&params, "message-timestamp"),
            raw: params,
        })
    }

    /// Hydrates a delivery receipt straight from an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] for unparseable requests or missing fields.
    pub fn from_request(request: &IncomingRequest) -> Result<Self, WebhookError> {
        Self::from_params(params_from_request(request)?)
    }

    /// Returns `true` when the message reached the handset.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.status == "delivered"
    }

    /// Raw access to any wire field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn inbound_query() -> HashMap<String, String> {
        [
            ("msisdn", "447700900001"),
            ("to", "447700900000"),
            ("messageId", "0A0000000123ABCD1"),
            ("type", "text"),
            ("text", "Hello world"),
            ("keyword", "HELLO"),
            ("message-timestamp", "2020-01-01 12:00:00"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
    }

    #[test]
    fn test_inbound_sms_from_get_request() {
        let request = IncomingRequest::get(inbound_query());
        let inbound = InboundSms::from_request(&request).unwrap();

        assert_eq!(inbound.msisdn, "447700900001");
        assert_eq!(inbound.message_id, "0A0000000123ABCD1");
        assert_eq!(inbound.text.as_deref(), Some("Hello world"));
        assert_eq!(inbound.keyword.as_deref(), Some("HELLO"));
        assert!(!inbound.is_concatenated());

        let timestamp = inbound.message_timestamp.unwrap();
        assert_eq!(timestamp.to_rfc3339(), "2020-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_inbound_sms_from_form_post() {
        let request = IncomingRequest::post_form(
            "msisdn=447700900001&to=447700900000&messageId=abc&type=text&text=Hi+there",
        );
        let inbound = InboundSms::from_request(&request).unwrap();
        assert_eq!(inbound.text.as_deref(), Some("Hi there"));
    }

    #[test]
    fn test_inbound_sms_missing_required_field() {
        let mut query = inbound_query();
        query.remove("messageId");
        let error = InboundSms::from_request(&IncomingRequest::get(query)).unwrap_err();
        assert_eq!(
            error,
            WebhookError::MissingField {
                field: "messageId"
            }
        );
    }

    #[test]
    fn test_inbound_concatenated_parts() {
        let mut query = inbound_query();
        query.insert("concat".to_string(), "true".to_string());
        query.insert("concat-ref".to_string(), "1".to_string());
        query.insert("concat-total".to_string(), "3".to_string());
        query.insert("concat-part".to_string(), "2".to_string());

        let inbound = InboundSms::from_request(&IncomingRequest::get(query)).unwrap();
        assert!(inbound.is_concatenated());
        assert_eq!(inbound.concat_total, Some(3));
        assert_eq!(inbound.concat_part, Some(2));
    }

    #[test]
    fn test_inbound_raw_map_keeps_unknown_fields() {
        let mut query = inbound_query();
        query.insert("nonce".to_string(), "abc123".to_string());

        let inbound = InboundSms::from_request(&IncomingRequest::get(query)).unwrap();
        assert_eq!(
            inbound.get("nonce").and_then(Value::as_str),
            Some("abc123")
        );
        assert!(inbound.get("not-present").is_none());
    }

    #[test]
    fn test_delivery_receipt_from_json_post() {
        let request = IncomingRequest::post_json(
            r#"{
                "msisdn": "447700900001",
                "to": "Acme",
                "messageId": "0A0000000123ABCD1",
                "status": "delivered",
                "network-code": "23410",
                "price": "0.03330000",
                "err-code": "0",
                "scts": "2001011400",
                "message-timestamp": "2020-01-01 14:00:03"
            }"#,
        );
        let receipt = DeliveryReceipt::from_request(&request).unwrap();

        assert!(receipt.is_delivered());
        assert_eq!(receipt.network_code.as_deref(), Some("23410"));
        assert_eq!(receipt.err_code.as_deref(), Some("0"));
        assert!(receipt.message_timestamp.is_some());
    }

    #[test]
    fn test_delivery_receipt_failed_status() {
        let request = IncomingRequest::post_json(
            r#"{"msisdn": "1", "to": "2", "messageId": "3", "status": "failed"}"#,
        );
        let receipt = DeliveryReceipt::from_request(&request).unwrap();
        assert!(!receipt.is_delivered());
        assert_eq!(receipt.status, "failed");
    }

    #[test]
    fn test_delivery_receipt_requires_status() {
        let request =
            IncomingRequest::post_json(r#"{"msisdn": "1", "to": "2", "messageId": "3"}"#);
        let error = DeliveryReceipt::from_request(&request).unwrap_err();
        assert_eq!(error, WebhookError::MissingField { field: "status" });
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        let mut query = inbound_query();
        query.insert(
            "message-timestamp".to_string(),
            "not a timestamp".to_string(),
        );
        let inbound = InboundSms::from_request(&IncomingRequest::get(query)).unwrap();
        assert!(inbound.message_timestamp.is_none());
    }
}
