//! The Voice API.
//!
//! Creates and controls calls over the JSON `/v1/calls` endpoints,
//! authenticated with an application JWT. Call behavior is described by
//! [`ncco`] action lists; in-progress calls can be transferred, muted,
//! streamed into, spoken into, and sent DTMF.
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_api::voice::{CallRequest, ncco::{Action, Ncco, Talk}};
//!
//! let created = client
//!     .voice()
//!     .create(
//!         &CallRequest::to_phone("447700900000")
//!             .from_number("447700900001")
//!             .ncco(Ncco::new().add(Action::Talk(Talk::new("Hello")))),
//!     )
//!     .await?;
//! println!("call {} {}", created.uuid, created.status);
//! ```

pub mod call;
pub mod ncco;

pub use call::{
    AdvancedMachineDetection, AmdBehavior, AmdMode, Call, CallFilter, CallRequest, CreatedCall,
    MachineDetection, BEEP_TIMEOUT_MAX_SECS, BEEP_TIMEOUT_MIN_SECS,
};
pub use ncco::{Action, ConnectEndpoint, Ncco};

use serde_json::json;

use crate::client::{ApiError, ApiResource, Page, Pager, ResponseError};

/// Sub-client for the Voice API.
#[derive(Clone, Debug)]
pub struct VoiceClient {
    resource: ApiResource,
}

impl VoiceClient {
    /// Wraps a configured resource. Exposed for the registry factory.
    #[must_use]
    pub const fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Creates an outbound call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or an undecodable body.
    pub async fn create(&self, request: &CallRequest) -> Result<CreatedCall, ApiError> {
        let response = self.resource.create(request.to_body(), "").await?;
        Ok(decode(&response.body)?)
    }

    /// Fetches one call by UUID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or an undecodable body.
    pub async fn get(&self, uuid: &str) -> Result<Call, ApiError> {
        let response = self.resource.get(&format!("/{uuid}")).await?;
        Ok(decode(&response.body)?)
    }

    /// Fetches one page of calls matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or an undecodable page.
    pub async fn list(&self, filter: &CallFilter) -> Result<Page<Call>, ApiError> {
        let mut pager = self.pager(filter);
        pager.set_auto_advance(false);
        match pager.next_page().await? {
            Some(page) => Ok(page),
            None => Ok(Page {
                items: Vec::new(),
                total: Some(0),
                has_next: false,
            }),
        }
    }

    /// Returns a lazy pager over every call matching the filter.
    ///
    /// Pages are fetched one at a time as the pager advances past each
    /// page boundary.
    #[must_use]
    pub fn pager(&self, filter: &CallFilter) -> Pager<Call> {
        self.resource.pager(&filter.to_params())
    }

    /// Transfers a call to an inline NCCO.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn transfer_to_ncco(&self, uuid: &str, ncco: &Ncco) -> Result<(), ApiError> {
        let body = json!({
            "action": "transfer",
            "destination": {"type": "ncco", "ncco": ncco},
        });
        self.resource.update(&format!("/{uuid}"), body).await?;
        Ok(())
    }

    /// Transfers a call to an answer URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn transfer_to_url(&self, uuid: &str, answer_url: &str) -> Result<(), ApiError> {
        let body = json!({
            "action": "transfer",
            "destination": {"type": "ncco", "url": [answer_url]},
        });
        self.resource.update(&format!("/{uuid}"), body).await?;
        Ok(())
    }

    /// Hangs up a call leg.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn hangup(&self, uuid: &str) -> Result<(), ApiError> {
        self.modify(uuid, "hangup").await
    }

    /// Mutes a call leg.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn mute(&self, uuid: &str) -> Result<(), ApiError> {
        self.modify(uuid, "mute").await
    }

    /// Unmutes a call leg.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn unmute(&self, uuid: &str) -> Result<(), ApiError> {
        self.modify(uuid, "unmute").await
    }

    /// Earmuffs a call leg (the leg stops hearing the conversation).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn earmuff(&self, uuid: &str) -> Result<(), ApiError> {
        self.modify(uuid, "earmuff").await
    }

    /// Removes an earmuff.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn unearmuff(&self, uuid: &str) -> Result<(), ApiError> {
        self.modify(uuid, "unearmuff").await
    }

    /// Streams an audio URL into a live call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn stream_audio(
        &self,
        uuid: &str,
        stream_url: &str,
        loop_count: u32,
    ) -> Result<(), ApiError> {
        let body = json!({ "stream_url": [stream_url], "loop": loop_count });
        self.resource
            .update(&format!("/{uuid}/stream"), body)
            .await?;
        Ok(())
    }

    /// Stops the audio currently streaming into a call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn stop_stream(&self, uuid: &str) -> Result<(), ApiError> {
        self.resource.delete(&format!("/{uuid}/stream")).await?;
        Ok(())
    }

    /// Speaks text into a live call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn talk(&self, uuid: &str, text: &str) -> Result<(), ApiError> {
        let body = json!({ "text": text });
        self.resource.update(&format!("/{uuid}/talk"), body).await?;
        Ok(())
    }

    /// Stops text-to-speech in a live call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn stop_talk(&self, uuid: &str) -> Result<(), ApiError> {
        self.resource.delete(&format!("/{uuid}/talk")).await?;
        Ok(())
    }

    /// Sends DTMF digits into a live call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn send_dtmf(&self, uuid: &str, digits: &str) -> Result<(), ApiError> {
        let body = json!({ "digits": digits });
        self.resource.update(&format!("/{uuid}/dtmf"), body).await?;
        Ok(())
    }

    async fn modify(&self, uuid: &str, action: &str) -> Result<(), ApiError> {
        let body = json!({ "action": action });
        self.resource.update(&format!("/{uuid}"), body).await?;
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &serde_json::Value) -> Result<T, ResponseError> {
    serde_json::from_value(body.clone()).map_err(|e| ResponseError::Malformed {
        reason: e.to_string(),
    })
}
