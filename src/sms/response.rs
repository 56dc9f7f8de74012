//! SMS send responses.
//!
//! The legacy send endpoint answers with a collection body:
//!
//! ```json
//! {
//!   "message-count": "2",
//!   "messages": [
//!     {"status": "0", "message-id": "...", "to": "...",
//!      "message-price": "0.03330000", "network": "23410", ...},
//!     {"status": "4", "error-text": "Bad Credentials"}
//!   ]
//! }
//! ```
//!
//! Per-message `status` of `0` means accepted; anything else is an error
//! item. The collection as a whole only reports success when no member is
//! an error. Status values compare with type-coercing equality because the
//! wire sends both `"0"` and `0`.

use serde_json::{Map, Value};

use crate::client::http_response::{coerce_str, require_keys};
use crate::client::ResponseError;

/// Keys a successful send item must carry.
const SUCCESS_REQUIRED_KEYS: &[&str] = &["status", "message-id", "to", "message-price", "network"];

/// One message entry from a send response.
///
/// Successful entries expose typed getters over the wire fields; error
/// entries normalize `error_text` to the canonical `error-text` spelling
/// and expose both through [`get`](Self::get). The raw map is retained so
/// open-ended fields stay reachable.
#[derive(Clone, Debug)]
pub struct MessageResponse {
    status: String,
    raw: Map<String, Value>,
}

impl MessageResponse {
    /// Hydrates one entry from the `messages` array.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::MissingKeys`] when `status` is absent, or
    /// when a successful entry is missing any of `status`, `message-id`,
    /// `to`, `message-price`, `network`.
    pub fn from_value(value: &Value) -> Result<Self, ResponseError> {
        require_keys(value, &["status"])?;
        let map = value
            .as_object()
            .cloned()
            .unwrap_or_default();

        let status = map
            .get("status")
            .and_then(coerce_str)
            .ok_or_else(|| ResponseError::Malformed {
                reason: "status is not a scalar".to_string(),
            })?;

        let mut raw = map;
        if status == "0" {
            require_keys(value, SUCCESS_REQUIRED_KEYS)?;
        } else if let Some(text) = raw.get("error_text").cloned() {
            // Normalize the underscore spelling; both stay readable.
            raw.entry("error-text".to_string()).or_insert(text);
        }

        Ok(Self { status, raw })
    }

    /// Returns the coerced per-message status code.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns `true` when the message was accepted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "0"
    }

    /// Returns `true` when this entry describes a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Returns the platform-assigned message ID.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.str_field("message-id")
    }

    /// Returns the recipient number.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.str_field("to")
    }

    /// Returns the price charged for this message.
    #[must_use]
    pub fn message_price(&self) -> Option<f64> {
        self.raw
            .get("message-price")
            .and_then(coerce_str)
            .and_then(|price| price.parse().ok())
    }

    /// Returns the remaining account balance after this message.
    #[must_use]
    pub fn remaining_balance(&self) -> Option<f64> {
        self.raw
            .get("remaining-balance")
            .and_then(coerce_str)
            .and_then(|balance| balance.parse().ok())
    }

    /// Returns the network code the recipient belongs to.
    #[must_use]
    pub fn network(&self) -> Option<&str> {
        self.str_field("network")
    }

    /// Returns the client reference echoed back by the platform.
    #[must_use]
    pub fn client_ref(&self) -> Option<&str> {
        self.str_field("client-ref")
    }

    /// Returns the error description for failed entries.
    ///
    /// Reads the canonical `error-text` key, which construction also
    /// populates from the `error_text` spelling some endpoints use.
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        self.str_field("error-text")
    }

    /// Raw access to any wire field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }
}

/// The collection of message entries a send call produced.
///
/// Iteration is index-based over the backing vector: [`iter`](Self::iter)
/// restarts from the first entry every time it is called, replaying the
/// same items.
#[derive(Clone, Debug)]
pub struct SmsCollection {
    items: Vec<MessageResponse>,
}

impl SmsCollection {
    /// Hydrates the collection from a decoded send response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::MissingKeys`] when `message-count` or
    /// `messages` is absent, and [`ResponseError::CountMismatch`] when the
    /// declared count disagrees with the array length.
    pub fn from_value(body: &Value) -> Result<Self, ResponseError> {
        require_keys(body, &["message-count", "messages"])?;

        let declared = body
            .get("message-count")
            .and_then(coerce_str)
            .and_then(|count| count.parse::<usize>().ok())
            .ok_or_else(|| ResponseError::Malformed {
                reason: "message-count is not a number".to_string(),
            })?;

        let messages = body
            .get("messages")
            .and_then(Value::as_array)
            .ok_or_else(|| ResponseError::Malformed {
                reason: "messages is not an array".to_string(),
            })?;

        if declared != messages.len() {
            return Err(ResponseError::CountMismatch {
                expected: declared,
                actual: messages.len(),
            });
        }

        let items = messages
            .iter()
            .map(MessageResponse::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { items })
    }

    /// Returns the number of message entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the collection has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the entry at the given index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MessageResponse> {
        self.items.get(index)
    }

    /// Returns the first entry, which is the whole response for
    /// single-recipient sends.
    #[must_use]
    pub fn first(&self) -> Option<&MessageResponse> {
        self.items.first()
    }

    /// Returns `true` only when no entry is an error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.items.iter().all(MessageResponse::is_success)
    }

    /// Iterates the entries from the start.
    pub fn iter(&self) -> std::slice::Iter<'_, MessageResponse> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a SmsCollection {
    type Item = &'a MessageResponse;
    type IntoIter = std::slice::Iter<'a, MessageResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_item() -> Value {
        json!({
            "status": "0",
            "message-id": "0A0000000123ABCD1",
            "to": "447700900000",
            "message-price": "0.03330000",
            "remaining-balance": "3.14159265",
            "network": "23410",
            "client-ref": "order-66"
        })
    }

    #[test]
    fn test_success_item_typed_getters() {
        let message = MessageResponse::from_value(&success_item()).unwrap();

        assert!(message.is_success());
        assert!(!message.is_error());
        assert_eq!(message.message_id(), Some("0A0000000123ABCD1"));
        assert_eq!(message.to(), Some("447700900000"));
        assert_eq!(message.message_price(), Some(0.0333));
        assert_eq!(message.remaining_balance(), Some(3.141_592_65));
        assert_eq!(message.network(), Some("23410"));
        assert_eq!(message.client_ref(), Some("order-66"));
    }

    #[test]
    fn test_success_item_requires_all_keys() {
        let mut item = success_item();
        item.as_object_mut().unwrap().remove("network");
        item.as_object_mut().unwrap().remove("message-price");

        let error = MessageResponse::from_value(&item).unwrap_err();
        match error {
            ResponseError::MissingKeys { missing } => {
                assert!(missing.contains(&"network".to_string()));
                assert!(missing.contains(&"message-price".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_numeric_status_coerces() {
        let message = MessageResponse::from_value(&json!({
            "status": 0,
            "message-id": "id",
            "to": "447700900000",
            "message-price": "0.03",
            "network": "23410"
        }))
        .unwrap();
        assert!(message.is_success());
        assert_eq!(message.status(), "0");
    }

    #[test]
    fn test_error_item_is_always_error() {
        let message = MessageResponse::from_value(&json!({
            "status": "4",
            "error-text": "Bad Credentials"
        }))
        .unwrap();

        assert!(message.is_error());
        assert!(!message.is_success());
        assert_eq!(message.error_text(), Some("Bad Credentials"));
    }

    #[test]
    fn test_error_text_normalization_keeps_both_spellings() {
        let message = MessageResponse::from_value(&json!({
            "status": "6",
            "error_text": "Invalid message"
        }))
        .unwrap();

        assert_eq!(message.error_text(), Some("Invalid message"));
        assert_eq!(
            message.get("error_text").and_then(Value::as_str),
            Some("Invalid message")
        );
        assert_eq!(
            message.get("error-text").and_then(Value::as_str),
            Some("Invalid message")
        );
    }

    #[test]
    fn test_item_without_status_fails() {
        let error = MessageResponse::from_value(&json!({"to": "447700900000"})).unwrap_err();
        assert!(matches!(error, ResponseError::MissingKeys { .. }));
    }

    #[test]
    fn test_collection_round_trips() {
        let collection = SmsCollection::from_value(&json!({
            "message-count": "1",
            "messages": [success_item()]
        }))
        .unwrap();

        assert_eq!(collection.len(), 1);
        assert!(collection.is_success());
        assert_eq!(
            collection.first().unwrap().message_id(),
            Some("0A0000000123ABCD1")
        );
    }

    #[test]
    fn test_collection_count_mismatch_fails() {
        let error = SmsCollection::from_value(&json!({
            "message-count": "2",
            "messages": [success_item()]
        }))
        .unwrap_err();

        assert_eq!(
            error,
            ResponseError::CountMismatch {
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_collection_success_requires_every_member() {
        let collection = SmsCollection::from_value(&json!({
            "message-count": 2,
            "messages": [
                success_item(),
                {"status": "9", "error-text": "Quota exceeded"}
            ]
        }))
        .unwrap();

        assert!(!collection.is_success());
        assert_eq!(collection.len(), 2);
        assert!(collection.get(1).unwrap().is_error());
    }

    #[test]
    fn test_collection_requires_count_and_messages() {
        let error = SmsCollection::from_value(&json!({"messages": []})).unwrap_err();
        match error {
            ResponseError::MissingKeys { missing } => {
                assert_eq!(missing, vec!["message-count".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_iteration_restarts_from_zero() {
        let collection = SmsCollection::from_value(&json!({
            "message-count": 1,
            "messages": [success_item()]
        }))
        .unwrap();

        let first_pass: Vec<_> = collection.iter().collect();
        let second_pass: Vec<_> = collection.iter().collect();
        assert_eq!(first_pass.len(), second_pass.len());
    }
}
