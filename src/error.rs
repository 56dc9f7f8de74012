//! Error types for SDK configuration and request validation.
//!
//! This module contains the errors raised before any network traffic
//! happens: configuration errors from the fail-fast newtype constructors,
//! and validation errors from request builders that reject out-of-range
//! caller input.
//!
//! # Example
//!
//! ```rust
//! use meridian_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable message. Configuration
/// constructors return `Result<T, ConfigError>` so that invalid values are
/// rejected before a client is ever built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Meridian API key.")]
    EmptyApiKey,

    /// API secret cannot be empty.
    #[error("API secret cannot be empty. Please provide a valid Meridian API secret.")]
    EmptyApiSecret,

    /// Application ID is not a well-formed identifier.
    #[error("Invalid application id '{id}'. Expected the UUID shown in the dashboard.")]
    InvalidApplicationId {
        /// The invalid application id that was provided.
        id: String,
    },

    /// Signature secret cannot be empty.
    #[error("Signature secret cannot be empty.")]
    EmptySignatureSecret,

    /// Private key is not a PEM-encoded RSA key.
    #[error("Invalid private key: {reason}")]
    InvalidPrivateKey {
        /// Why the key was rejected.
        reason: String,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.meridianapis.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

/// Errors raised by request builders when caller input is out of range.
///
/// These are raised synchronously at the point of setting an invalid field,
/// before any network call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Message time-to-live is outside the accepted window.
    #[error("ttl milliseconds out of range: {actual} (expected {min}..={max})")]
    TtlOutOfRange {
        /// Lower bound, inclusive.
        min: u64,
        /// Upper bound, inclusive.
        max: u64,
        /// The rejected value.
        actual: u64,
    },

    /// Client reference strings are limited to 40 characters.
    #[error("client-ref too long: {actual} characters (max {max})")]
    ClientRefTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected value.
        actual: usize,
    },

    /// Verification codes are either 4 or 6 digits.
    #[error("code length must be 4 or 6, got {actual}")]
    InvalidCodeLength {
        /// The rejected value.
        actual: u8,
    },

    /// Verify workflows are numbered 1 through 7.
    #[error("workflow id out of range: {actual} (expected 1..=7)")]
    InvalidWorkflowId {
        /// The rejected value.
        actual: u8,
    },

    /// PIN expiry must fall between 60 and 3600 seconds.
    #[error("pin expiry seconds out of range: {actual} (expected {min}..={max})")]
    PinExpiryOutOfRange {
        /// Lower bound, inclusive.
        min: u32,
        /// Upper bound, inclusive.
        max: u32,
        /// The rejected value.
        actual: u32,
    },

    /// SMS message class is a GSM 03.38 value between 0 and 3.
    #[error("message class out of range: {actual} (expected 0..=3)")]
    InvalidMessageClass {
        /// The rejected value.
        actual: u8,
    },

    /// Machine-detection beep timeout must fall between 45 and 120 seconds.
    #[error("beep timeout seconds out of range: {actual} (expected {min}..={max})")]
    BeepTimeoutOutOfRange {
        /// Lower bound, inclusive.
        min: u32,
        /// Upper bound, inclusive.
        max: u32,
        /// The rejected value.
        actual: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_error_message() {
        let error = ConfigError::EmptyApiKey;
        let message = error.to_string();
        assert!(message.contains("API key cannot be empty"));
        assert!(message.contains("valid Meridian API key"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "api_key" };
        let message = error.to_string();
        assert!(message.contains("api_key"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_ttl_out_of_range_names_bounds() {
        let error = ValidationError::TtlOutOfRange {
            min: 20_000,
            max: 604_800_000,
            actual: 19_999,
        };
        let message = error.to_string();
        assert!(message.contains("19999"));
        assert!(message.contains("20000..=604800000"));
    }

    #[test]
    fn test_code_length_error_message() {
        let error = ValidationError::InvalidCodeLength { actual: 5 };
        assert_eq!(error.to_string(), "code length must be 4 or 6, got 5");
    }

    #[test]
    fn test_errors_implement_std_error() {
        let config_error: &dyn std::error::Error = &ConfigError::EmptyApiKey;
        let _ = config_error;
        let validation_error: &dyn std::error::Error =
            &ValidationError::InvalidCodeLength { actual: 5 };
        let _ = validation_error;
    }
}
