//! The Verify API.
//!
//! Starts phone number verifications, checks submitted codes, and controls
//! in-flight verifications. This is a legacy form API that reports business
//! failure inside HTTP 200, so the sub-client's resource runs the legacy
//! decoder on every response; by the time a response object is hydrated,
//! error bodies have already been raised as [`ApiError`].
//!
//! # Example
//!
//! ```rust,ignore
//! let verify = client.verify();
//! let started = verify
//!     .start(&VerificationRequest::new("447700900000", "Acme").code_length(4)?)
//!     .await?;
//!
//! // ... later, with the code the user typed:
//! let checked = verify.check(&started.request_id, "1234").await?;
//! ```

mod request;
mod response;

pub use request::{VerificationRequest, PIN_EXPIRY_MAX_SECS, PIN_EXPIRY_MIN_SECS};
pub use response::{
    VerifyAttempt, VerifyCheck, VerifyControl, VerifyEvent, VerifySearch, VerifyStart,
};

use serde_json::json;

use crate::client::{ApiError, ApiResource};

/// Sub-client for the Verify API.
#[derive(Clone, Debug)]
pub struct VerifyClient {
    resource: ApiResource,
}

impl VerifyClient {
    /// Wraps a configured resource. Exposed for the registry factory.
    #[must_use]
    pub const fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Starts verifying a number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures, including business
    /// failures the endpoint reports inside HTTP 200 (a throttled start
    /// surfaces as [`ApiError::Throttle`]).
    pub async fn start(&self, request: &VerificationRequest) -> Result<VerifyStart, ApiError> {
        let response = self.resource.create(request.to_params(), "/json").await?;
        Ok(VerifyStart::from_value(&response.body)?)
    }

    /// Checks a code the user submitted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures; a wrong code is a
    /// business failure and surfaces as [`ApiError::Request`].
    pub async fn check(&self, request_id: &str, code: &str) -> Result<VerifyCheck, ApiError> {
        let payload = json!({ "request_id": request_id, "code": code });
        let response = self.resource.create(payload, "/check/json").await?;
        Ok(VerifyCheck::from_value(&response.body)?)
    }

    /// Fetches the full state of a verification.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn search(&self, request_id: &str) -> Result<VerifySearch, ApiError> {
        let filter = json!({ "request_id": request_id });
        let response = self.resource.search(&filter, "/search/json").await?;
        Ok(VerifySearch::from_value(&response.body)?)
    }

    /// Cancels an in-flight verification.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn cancel(&self, request_id: &str) -> Result<VerifyControl, ApiError> {
        self.control(request_id, "cancel").await
    }

    /// Skips to the workflow's next delivery attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn trigger_next_event(&self, request_id: &str) -> Result<VerifyControl, ApiError> {
        self.control(request_id, "trigger_next_event").await
    }

    async fn control(&self, request_id: &str, command: &str) -> Result<VerifyControl, ApiError> {
        let payload = json!({ "request_id": request_id, "cmd": command });
        let response = self.resource.create(payload, "/control/json").await?;
        Ok(VerifyControl::from_value(&response.body)?)
    }
}
