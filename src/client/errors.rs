//! Error types for API dispatch.
//!
//! This module contains the error taxonomy every sub-client surfaces:
//!
//! - [`ApiError::Request`]: 4xx responses — caller input was wrong, retrying
//!   without changing it will not help
//! - [`ApiError::Throttle`]: 429 responses — retryable after the hinted delay
//! - [`ApiError::Server`]: 5xx responses — retryable for idempotent calls
//!   (the SDK itself never retries)
//! - [`ApiError::Transport`]: errors from the underlying HTTP layer,
//!   propagated unmodified
//! - [`ResponseError`]: a 2xx response whose body does not have the shape
//!   the response type requires
//!
//! The hierarchy is structured so callers can catch exactly the kind they
//! care about:
//!
//! ```rust,ignore
//! match client.sms().send(&message).await {
//!     Ok(collection) => { /* ... */ }
//!     Err(ApiError::Throttle { retry_after, .. }) => { /* back off */ }
//!     Err(ApiError::Request { .. }) => { /* fix the input */ }
//!     Err(other) => return Err(other.into()),
//! }
//! ```

use thiserror::Error;

use crate::auth::AuthError;

/// A field-level validation failure reported by a 422-style response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The parameter the API rejected.
    pub name: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Errors surfaced by API dispatch.
///
/// Everything network-path raises one of these after the HTTP response has
/// been interpreted; nothing is swallowed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A client-side request error (4xx other than 429).
    ///
    /// Not retryable without changing the input. May carry field-level
    /// validation errors for 422-style responses.
    #[error("{title} (HTTP {code})")]
    Request {
        /// The HTTP status code.
        code: u16,
        /// Short error title from the response body.
        title: String,
        /// Longer description, when the body provides one.
        detail: Option<String>,
        /// Field-level validation failures, when the body provides them.
        invalid_parameters: Vec<FieldError>,
    },

    /// The API rate-limited the request (HTTP 429).
    ///
    /// `retry_after` carries the server's hint in seconds when one was
    /// given; the SDK does not wait or retry on the caller's behalf.
    #[error("Rate limited (HTTP 429): {message}")]
    Throttle {
        /// Seconds to wait before retrying, if the server hinted at one.
        retry_after: Option<f64>,
        /// Human-readable description from the response.
        message: String,
    },

    /// A server-side failure (5xx).
    #[error("Server error (HTTP {code}): {message}")]
    Server {
        /// The HTTP status code.
        code: u16,
        /// Human-readable description from the response.
        message: String,
    },

    /// A status code outside every classified range.
    #[error("Unexpected HTTP status {code}: {message}")]
    Unexpected {
        /// The HTTP status code.
        code: u16,
        /// Human-readable description from the response.
        message: String,
    },

    /// A transport-level failure from the injected HTTP client,
    /// propagated unmodified.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credentials could not be attached to the request.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The response body does not have the required shape.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl ApiError {
    /// Returns the HTTP status code for the status-classified variants.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Request { code, .. }
            | Self::Server { code, .. }
            | Self::Unexpected { code, .. } => Some(*code),
            Self::Throttle { .. } => Some(429),
            Self::Transport(_) | Self::Auth(_) | Self::Response(_) => None,
        }
    }
}

/// Errors raised while hydrating a typed response from a JSON body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// One or more keys the response type requires were absent.
    #[error("Response is missing required key(s): {}", missing.join(", "))]
    MissingKeys {
        /// The absent key names.
        missing: Vec<String>,
    },

    /// A collection's declared count disagrees with its member array.
    #[error("message-count {expected} does not match number of messages {actual}")]
    CountMismatch {
        /// The count the body declared.
        expected: usize,
        /// The number of members actually present.
        actual: usize,
    },

    /// The body could not be interpreted at all.
    #[error("Malformed response body: {reason}")]
    Malformed {
        /// Why the body was rejected.
        reason: String,
    },
}
