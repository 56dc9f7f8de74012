//! Call request and response objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::voice::ncco::{ConnectEndpoint, Ncco};

/// Lower bound of the advanced machine detection beep timeout, in seconds.
pub const BEEP_TIMEOUT_MIN_SECS: u32 = 45;

/// Upper bound of the advanced machine detection beep timeout, in seconds.
pub const BEEP_TIMEOUT_MAX_SECS: u32 = 120;

/// What to do when machine detection decides a machine answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineDetection {
    /// Keep the call running and report the detection in the event webhook.
    Continue,
    /// Hang up as soon as a machine is detected.
    Hangup,
}

/// Behaviour field of advanced machine detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmdBehavior {
    /// Keep the call running after detection.
    Continue,
    /// Hang up on machines.
    Hangup,
}

/// Mode field of advanced machine detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmdMode {
    /// Detect machines but not beeps.
    Detect,
    /// Detect machines and wait for the voicemail beep.
    DetectBeep,
    /// Platform default behavior.
    Default,
}

/// Advanced machine detection settings.
///
/// Constructed through [`new`](Self::new) so the beep timeout is validated
/// before the request is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedMachineDetection {
    /// What to do after detection.
    pub behavior: AmdBehavior,
    /// Detection mode.
    pub mode: AmdMode,
    /// Seconds to wait for a voicemail beep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beep_timeout: Option<u32>,
}

impl AdvancedMachineDetection {
    /// Creates validated advanced machine detection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BeepTimeoutOutOfRange`] when the timeout
    /// is outside `45..=120` seconds.
    pub fn new(
        behavior: AmdBehavior,
        mode: AmdMode,
        beep_timeout: Option<u32>,
    ) -> Result<Self, ValidationError> {
        if let Some(timeout) = beep_timeout {
            if !(BEEP_TIMEOUT_MIN_SECS..=BEEP_TIMEOUT_MAX_SECS).contains(&timeout) {
                return Err(ValidationError::BeepTimeoutOutOfRange {
                    min: BEEP_TIMEOUT_MIN_SECS,
                    max: BEEP_TIMEOUT_MAX_SECS,
                    actual: timeout,
                });
            }
        }
        Ok(Self {
            behavior,
            mode,
            beep_timeout,
        })
    }
}

/// A request to create an outbound call.
///
/// The call's behavior comes either from an inline [`Ncco`] or from an
/// answer URL the platform fetches when the callee picks up.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CallRequest {
    to: Vec<ConnectEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<CallerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    random_from_number: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ncco: Option<Ncco>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer_url: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_url: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    machine_detection: Option<MachineDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced_machine_detection: Option<AdvancedMachineDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length_timer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ringing_timer: Option<u32>,
}

/// Caller ID presented on an outbound call.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum CallerId {
    Phone { number: String },
}

impl CallRequest {
    /// Creates a call to a phone number.
    #[must_use]
    pub fn to_phone(number: impl Into<String>) -> Self {
        Self::to_endpoint(ConnectEndpoint::Phone {
            number: number.into(),
            dtmf_answer: None,
        })
    }

    /// Creates a call to an arbitrary endpoint.
    #[must_use]
    pub fn to_endpoint(endpoint: ConnectEndpoint) -> Self {
        Self {
            to: vec![endpoint],
            from: None,
            random_from_number: None,
            ncco: None,
            answer_url: None,
            answer_method: None,
            event_url: None,
            event_method: None,
            machine_detection: None,
            advanced_machine_detection: None,
            length_timer: None,
            ringing_timer: None,
        }
    }

    /// Sets the caller ID number.
    #[must_use]
    pub fn from_number(mut self, number: impl Into<String>) -> Self {
        self.from = Some(CallerId::Phone {
            number: number.into(),
        });
        self
    }

    /// Lets the platform pick a random owned number as caller ID.
    #[must_use]
    pub const fn random_from_number(mut self) -> Self {
        self.random_from_number = Some(true);
        self
    }

    /// Supplies the call's behavior inline.
    #[must_use]
    pub fn ncco(mut self, ncco: Ncco) -> Self {
        self.ncco = Some(ncco);
        self
    }

    /// Supplies the call's behavior via an answer URL.
    #[must_use]
    pub fn answer_url(mut self, url: impl Into<String>) -> Self {
        self.answer_url = Some(vec![url.into()]);
        self
    }

    /// Sets where call progress events are delivered.
    #[must_use]
    pub fn event_url(mut self, url: impl Into<String>) -> Self {
        self.event_url = Some(vec![url.into()]);
        self
    }

    /// Enables basic machine detection.
    #[must_use]
    pub const fn machine_detection(mut self, detection: MachineDetection) -> Self {
        self.machine_detection = Some(detection);
        self
    }

    /// Enables advanced machine detection.
    #[must_use]
    pub const fn advanced_machine_detection(
        mut self,
        detection: AdvancedMachineDetection,
    ) -> Self {
        self.advanced_machine_detection = Some(detection);
        self
    }

    /// Caps the call length, in seconds.
    #[must_use]
    pub const fn length_timer(mut self, seconds: u32) -> Self {
        self.length_timer = Some(seconds);
        self
    }

    /// Caps ringing time, in seconds.
    #[must_use]
    pub const fn ringing_timer(mut self, seconds: u32) -> Self {
        self.ringing_timer = Some(seconds);
        self
    }

    /// Returns the JSON body for the create-call endpoint.
    ///
    /// # Panics
    ///
    /// Never panics: every field of this struct serializes.
    #[must_use]
    pub fn to_body(&self) -> Value {
        serde_json::to_value(self).expect("call request serializes")
    }
}

/// Response to creating a call.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatedCall {
    /// The new call leg's UUID.
    pub uuid: String,
    /// Initial status (`started`).
    pub status: String,
    /// Leg direction (`outbound`).
    pub direction: String,
    /// Conversation the leg belongs to.
    pub conversation_uuid: Option<String>,
}

/// One endpoint of a call, as the API reports it.
#[derive(Clone, Debug, Deserialize)]
pub struct CallEndpoint {
    /// Endpoint kind (`phone`, `sip`, ...).
    #[serde(rename = "type")]
    pub endpoint_type: Option<String>,
    /// The number, for phone endpoints.
    pub number: Option<String>,
}

/// A call record from the get/list endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Call {
    /// The call leg's UUID.
    pub uuid: String,
    /// Lifecycle status (`started`, `ringing`, `answered`, `completed`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Leg direction.
    #[serde(default)]
    pub direction: Option<String>,
    /// Per-minute rate.
    #[serde(default)]
    pub rate: Option<String>,
    /// Total price so far.
    #[serde(default)]
    pub price: Option<String>,
    /// Call duration in seconds, as a string per the wire format.
    #[serde(default)]
    pub duration: Option<String>,
    /// Conversation the leg belongs to.
    #[serde(default)]
    pub conversation_uuid: Option<String>,
    /// When the call started.
    #[serde(default)]
    pub start_time: Option<String>,
    /// When the call ended.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Network that carried the call.
    #[serde(default)]
    pub network: Option<String>,
    /// Callee endpoint.
    #[serde(default)]
    pub to: Option<CallEndpoint>,
    /// Caller endpoint.
    #[serde(default)]
    pub from: Option<CallEndpoint>,
}

/// Filter for the list-calls endpoint.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CallFilter {
    /// Only calls in this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Only calls started at or after this ISO-8601 instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    /// Only calls started before this ISO-8601 instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    /// Page size (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Zero-based record offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_index: Option<u32>,
    /// Sort order (`asc`/`desc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Only legs of this conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_uuid: Option<String>,
}

impl CallFilter {
    /// Returns the query parameter map for this filter.
    ///
    /// # Panics
    ///
    /// Never panics: every field of this struct serializes.
    #[must_use]
    pub fn to_params(&self) -> Value {
        serde_json::to_value(self).expect("call filter serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::ncco::{Action, Talk};
    use serde_json::json;

    #[test]
    fn test_call_request_minimal_body() {
        let body = CallRequest::to_phone("447700900000")
            .answer_url("https://example.test/answer")
            .to_body();

        assert_eq!(body["to"][0]["type"], "phone");
        assert_eq!(body["to"][0]["number"], "447700900000");
        assert_eq!(body["answer_url"], json!(["https://example.test/answer"]));
        assert!(body.get("ncco").is_none());
        assert!(body.get("from").is_none());
    }

    #[test]
    fn test_call_request_with_ncco_and_caller_id() {
        let body = CallRequest::to_phone("447700900000")
            .from_number("447700900001")
            .ncco(Ncco::new().add(Action::Talk(Talk::new("Hi"))))
            .to_body();

        assert_eq!(body["from"]["type"], "phone");
        assert_eq!(body["from"]["number"], "447700900001");
        assert_eq!(body["ncco"][0]["action"], "talk");
    }

    #[test]
    fn test_machine_detection_serializes_lowercase() {
        let body = CallRequest::to_phone("447700900000")
            .answer_url("https://example.test/answer")
            .machine_detection(MachineDetection::Hangup)
            .to_body();
        assert_eq!(body["machine_detection"], "hangup");
    }

    #[test]
    fn test_amd_beep_timeout_bounds() {
        assert!(AdvancedMachineDetection::new(
            AmdBehavior::Continue,
            AmdMode::DetectBeep,
            Some(BEEP_TIMEOUT_MIN_SECS),
        )
        .is_ok());
        assert!(AdvancedMachineDetection::new(
            AmdBehavior::Continue,
            AmdMode::DetectBeep,
            Some(BEEP_TIMEOUT_MAX_SECS),
        )
        .is_ok());

        let low = AdvancedMachineDetection::new(
            AmdBehavior::Hangup,
            AmdMode::Detect,
            Some(BEEP_TIMEOUT_MIN_SECS - 1),
        )
        .unwrap_err();
        assert_eq!(
            low,
            ValidationError::BeepTimeoutOutOfRange {
                min: 45,
                max: 120,
                actual: 44,
            }
        );

        assert!(AdvancedMachineDetection::new(
            AmdBehavior::Hangup,
            AmdMode::Detect,
            Some(BEEP_TIMEOUT_MAX_SECS + 1),
        )
        .is_err());
    }

    #[test]
    fn test_amd_serialization_shape() {
        let amd = AdvancedMachineDetection::new(
            AmdBehavior::Continue,
            AmdMode::DetectBeep,
            Some(50),
        )
        .unwrap();
        let value = serde_json::to_value(amd).unwrap();
        assert_eq!(
            value,
            json!({"behavior": "continue", "mode": "detect_beep", "beep_timeout": 50})
        );
    }

    #[test]
    fn test_call_deserializes_from_wire_shape() {
        let call: Call = serde_json::from_value(json!({
            "uuid": "63f61863-4a51-4f6b-86e1-46edebcf9356",
            "status": "completed",
            "direction": "outbound",
            "duration": "60",
            "to": {"type": "phone", "number": "447700900000"},
            "from": {"type": "phone", "number": "447700900001"}
        }))
        .unwrap();

        assert_eq!(call.uuid, "63f61863-4a51-4f6b-86e1-46edebcf9356");
        assert_eq!(call.status.as_deref(), Some("completed"));
        assert_eq!(call.to.unwrap().number.as_deref(), Some("447700900000"));
    }

    #[test]
    fn test_call_filter_skips_unset_fields() {
        let params = CallFilter {
            status: Some("completed".to_string()),
            page_size: Some(10),
            ..CallFilter::default()
        }
        .to_params();

        assert_eq!(params["status"], "completed");
        assert_eq!(params["page_size"], 10);
        assert!(params.get("date_start").is_none());
    }
}
