//! Verification request construction.

use serde_json::{json, Value};

use crate::error::ValidationError;

/// Lower bound of the PIN expiry window, in seconds.
pub const PIN_EXPIRY_MIN_SECS: u32 = 60;

/// Upper bound of the PIN expiry window, in seconds.
pub const PIN_EXPIRY_MAX_SECS: u32 = 3_600;

/// A request to start verifying a phone number.
///
/// Only `number` and `brand` are required; the setters validate the narrow
/// rules the platform enforces (code length 4 or 6, workflow 1 through 7,
/// PIN expiry 60 through 3600 seconds) before anything is sent.
///
/// # Example
///
/// ```rust
/// use meridian_api::verify::VerificationRequest;
///
/// let request = VerificationRequest::new("447700900000", "Acme")
///     .code_length(6)
///     .unwrap()
///     .workflow(2)
///     .unwrap();
///
/// assert_eq!(request.to_params()["code_length"], 6);
/// ```
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    number: String,
    brand: String,
    code_length: Option<u8>,
    pin_expiry: Option<u32>,
    next_event_wait: Option<u32>,
    workflow_id: Option<u8>,
    sender_id: Option<String>,
    country: Option<String>,
    locale: Option<String>,
}

impl VerificationRequest {
    /// Creates a request for the given number and brand text.
    #[must_use]
    pub fn new(number: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            brand: brand.into(),
            code_length: None,
            pin_expiry: None,
            next_event_wait: None,
            workflow_id: None,
            sender_id: None,
            country: None,
            locale: None,
        }
    }

    /// Sets the verification code length.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCodeLength`] for anything other
    /// than 4 or 6.
    pub fn code_length(mut self, length: u8) -> Result<Self, ValidationError> {
        if length != 4 && length != 6 {
            return Err(ValidationError::InvalidCodeLength { actual: length });
        }
        self.code_length = Some(length);
        Ok(self)
    }

    /// Sets how long the generated PIN stays valid, in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PinExpiryOutOfRange`] outside
    /// `60..=3600`.
    pub fn pin_expiry(mut self, seconds: u32) -> Result<Self, ValidationError> {
        if !(PIN_EXPIRY_MIN_SECS..=PIN_EXPIRY_MAX_SECS).contains(&seconds) {
            return Err(ValidationError::PinExpiryOutOfRange {
                min: PIN_EXPIRY_MIN_SECS,
                max: PIN_EXPIRY_MAX_SECS,
                actual: seconds,
            });
        }
        self.pin_expiry = Some(seconds);
        Ok(self)
    }

    /// Sets the delay before the workflow's next attempt, in seconds.
    #[must_use]
    pub const fn next_event_wait(mut self, seconds: u32) -> Self {
        self.next_event_wait = Some(seconds);
        self
    }

    /// Selects one of the platform's escalation workflows.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidWorkflowId`] outside `1..=7`.
    pub fn workflow(mut self, workflow_id: u8) -> Result<Self, ValidationError> {
        if !(1..=7).contains(&workflow_id) {
            return Err(ValidationError::InvalidWorkflowId {
                actual: workflow_id,
            });
        }
        self.workflow_id = Some(workflow_id);
        Ok(self)
    }

    /// Sets the sender ID shown on verification SMS.
    #[must_use]
    pub fn sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    /// Hints the number's country when it is not in international format.
    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the language verification messages use (e.g. `en-gb`).
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Returns the wire parameter map for this request.
    #[must_use]
    pub fn to_params(&self) -> Value {
        json!({
            "number": self.number,
            "brand": self.brand,
            "code_length": self.code_length,
            "pin_expiry": self.pin_expiry,
            "next_event_wait": self.next_event_wait,
            "workflow_id": self.workflow_id,
            "sender_id": self.sender_id,
            "country": self.country,
            "lg": self.locale,
        })
    }
}
