//! Verify API response objects.
//!
//! All of these hydrate from legacy bodies whose business errors have
//! already been raised by the dispatcher (the verify resource runs its
//! decoder on HTTP 200), so construction only checks shape.

use serde_json::{Map, Value};

use crate::client::http_response::{coerce_str, require_keys};
use crate::client::ResponseError;

fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(ToString::to_string)
}

/// Response to starting a verification.
#[derive(Clone, Debug)]
pub struct VerifyStart {
    /// The verification request ID used by check/control/search.
    pub request_id: String,
    /// The coerced business status (`0` after successful dispatch).
    pub status: String,
}

impl VerifyStart {
    /// Hydrates from a start response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::MissingKeys`] when `request_id` or
    /// `status` is absent.
    pub fn from_value(body: &Value) -> Result<Self, ResponseError> {
        require_keys(body, &["request_id", "status"])?;
        let map = body.as_object().cloned().unwrap_or_default();
        Ok(Self {
            request_id: str_field(&map, "request_id").unwrap_or_default(),
            status: map.get("status").and_then(coerce_str).unwrap_or_default(),
        })
    }
}

/// Response to checking a submitted code.
#[derive(Clone, Debug)]
pub struct VerifyCheck {
    /// The verification request this check belonged to.
    pub request_id: Option<String>,
    /// The coerced business status.
    pub status: String,
    /// Price charged for the verification.
    pub price: Option<String>,
    /// Currency of the price.
    pub currency: Option<String>,
}

impl VerifyCheck {
    /// Hydrates from a check response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::MissingKeys`] when `status` is absent.
    pub fn from_value(body: &Value) -> Result<Self, ResponseError> {
        require_keys(body, &["status"])?;
        let map = body.as_object().cloned().unwrap_or_default();
        Ok(Self {
            request_id: str_field(&map, "request_id"),
            status: map.get("status").and_then(coerce_str).unwrap_or_default(),
            price: str_field(&map, "price"),
            currency: str_field(&map, "currency"),
        })
    }
}

/// One delivery attempt inside a searched verification.
#[derive(Clone, Debug)]
pub struct VerifyEvent {
    /// Event type (`sms` or `tts`).
    pub event_type: Option<String>,
    /// Platform event ID.
    pub id: Option<String>,
}

/// One code check inside a searched verification.
#[derive(Clone, Debug)]
pub struct VerifyAttempt {
    /// When the check happened.
    pub date_received: Option<String>,
    /// The code the user submitted.
    pub code: Option<String>,
    /// Whether the check matched (`VALID`/`INVALID`).
    pub status: Option<String>,
}

/// Full verification state from the search endpoint.
#[derive(Clone, Debug)]
pub struct VerifySearch {
    /// The verification request ID.
    pub request_id: String,
    /// Lifecycle status (`IN PROGRESS`, `SUCCESS`, `FAILED`, ...).
    pub status: String,
    /// Account that started the verification.
    pub account_id: Option<String>,
    /// The number under verification.
    pub number: Option<String>,
    /// Sender ID the messages used.
    pub sender_id: Option<String>,
    /// When the verification was started.
    pub date_submitted: Option<String>,
    /// When the verification reached a terminal state.
    pub date_finalized: Option<String>,
    /// Price charged so far.
    pub price: Option<String>,
    /// Currency of the price.
    pub currency: Option<String>,
    /// Delivery attempts made.
    pub events: Vec<VerifyEvent>,
    /// Code checks received.
    pub checks: Vec<VerifyAttempt>,
}

impl VerifySearch {
    /// Hydrates from a search response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::MissingKeys`] when `request_id` or
    /// `status` is absent.
    pub fn from_value(body: &Value) -> Result<Self, ResponseError> {
        require_keys(body, &["request_id", "status"])?;
        let map = body.as_object().cloned().unwrap_or_default();

        let events = map
            .get("events")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|event| VerifyEvent {
                        event_type: str_field(event, "type"),
                        id: str_field(event, "id"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let checks = map
            .get("checks")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|check| VerifyAttempt {
                        date_received: str_field(check, "date_received"),
                        code: str_field(check, "code"),
                        status: str_field(check, "status"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            request_id: str_field(&map, "request_id").unwrap_or_default(),
            status: str_field(&map, "status")
                .or_else(|| map.get("status").and_then(coerce_str))
                .unwrap_or_default(),
            account_id: str_field(&map, "account_id"),
            number: str_field(&map, "number"),
            sender_id: str_field(&map, "sender_id"),
            date_submitted: str_field(&map, "date_submitted"),
            date_finalized: str_field(&map, "date_finalized"),
            price: str_field(&map, "price"),
            currency: str_field(&map, "currency"),
            events,
            checks,
        })
    }
}

/// Response to a control command (cancel / trigger next event).
#[derive(Clone, Debug)]
pub struct VerifyControl {
    /// The coerced business status.
    pub status: String,
    /// The command the platform acknowledged.
    pub command: String,
}

impl VerifyControl {
    /// Hydrates from a control response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::MissingKeys`] when `status` or `command`
    /// is absent.
    pub fn from_value(body: &Value) -> Result<Self, ResponseError> {
        require_keys(body, &["status", "command"])?;
        let map = body.as_object().cloned().unwrap_or_default();
        Ok(Self {
            status: map.get("status").and_then(coerce_str).unwrap_or_default(),
            command: str_field(&map, "command").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_requires_request_id_and_status() {
        let ok = VerifyStart::from_value(&json!({
            "request_id": "abcdef0123456789",
            "status": "0"
        }))
        .unwrap();
        assert_eq!(ok.request_id, "abcdef0123456789");
        assert_eq!(ok.status, "0");

        let error = VerifyStart::from_value(&json!({"status": "0"})).unwrap_err();
        assert!(matches!(error, ResponseError::MissingKeys { .. }));
    }

    #[test]
    fn test_start_coerces_numeric_status() {
        let ok = VerifyStart::from_value(&json!({"request_id": "r", "status": 0})).unwrap();
        assert_eq!(ok.status, "0");
    }

    #[test]
    fn test_check_reads_price_fields() {
        let check = VerifyCheck::from_value(&json!({
            "request_id": "r",
            "status": "0",
            "price": "0.10000000",
            "currency": "EUR"
        }))
        .unwrap();
        assert_eq!(check.price.as_deref(), Some("0.10000000"));
        assert_eq!(check.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_search_reads_nested_events_and_checks() {
        let search = VerifySearch::from_value(&json!({
            "request_id": "r",
            "status": "IN PROGRESS",
            "number": "447700900000",
            "events": [
                {"type": "sms", "id": "e1"},
                {"type": "tts", "id": "e2"}
            ],
            "checks": [
                {"date_received": "2020-01-01 12:00:00", "code": "1234", "status": "INVALID"}
            ]
        }))
        .unwrap();

        assert_eq!(search.status, "IN PROGRESS");
        assert_eq!(search.events.len(), 2);
        assert_eq!(search.events[1].event_type.as_deref(), Some("tts"));
        assert_eq!(search.checks.len(), 1);
        assert_eq!(search.checks[0].status.as_deref(), Some("INVALID"));
    }

    #[test]
    fn test_control_requires_command() {
        let control =
            VerifyControl::from_value(&json!({"status": "0", "command": "cancel"})).unwrap();
        assert_eq!(control.command, "cancel");

        let error = VerifyControl::from_value(&json!({"status": "0"})).unwrap_err();
        assert!(matches!(error, ResponseError::MissingKeys { .. }));
    }
}
