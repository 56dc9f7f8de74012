//! Call control objects (NCCO).
//!
//! An NCCO is the ordered list of actions a call executes. Each action is a
//! sealed variant struct; the [`Action`] enum carries the wire `action` tag
//! so the whole set serializes to the JSON array the voice API expects.
//!
//! # Example
//!
//! ```rust
//! use meridian_api::voice::ncco::{Action, Ncco, Talk};
//!
//! let ncco = Ncco::new()
//!     .add(Action::Talk(Talk::new("Thank you for calling.")))
//!     .add(Action::Talk(Talk {
//!         text: "Goodbye.".to_string(),
//!         language: Some("en-GB".to_string()),
//!         ..Talk::default()
//!     }));
//!
//! let json = serde_json::to_value(&ncco).unwrap();
//! assert_eq!(json[0]["action"], "talk");
//! assert_eq!(json[1]["language"], "en-GB");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speaks text into the call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talk {
    /// The text to speak.
    pub text: String,
    /// Whether the caller can interrupt with DTMF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barge_in: Option<bool>,
    /// How many times to repeat the text.
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
    /// Playback volume between -1 and 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f32>,
    /// BCP-47 language tag for synthesis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Vendor voice style index for the chosen language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<u32>,
    /// Whether to use the premium voice tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<bool>,
}

impl Talk {
    /// Creates a talk action with defaults.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Streams an audio file into the call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    /// Audio URL; the single-element array is a wire quirk.
    pub stream_url: Vec<String>,
    /// Playback volume between -1 and 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f32>,
    /// Whether the caller can interrupt with DTMF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barge_in: Option<bool>,
    /// How many times to repeat the audio.
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
}

impl Stream {
    /// Creates a stream action for one audio URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            stream_url: vec![url.into()],
            ..Self::default()
        }
    }
}

/// Collects DTMF digits and/or speech from the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Which input kinds to collect (`dtmf`, `speech`).
    #[serde(rename = "type")]
    pub input_types: Vec<String>,
    /// DTMF collection settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmf: Option<DtmfSettings>,
    /// Where to deliver the collected input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url: Option<Vec<String>>,
}

/// DTMF collection settings for an [`Input`] action.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtmfSettings {
    /// Seconds of silence that end collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_out: Option<u32>,
    /// Maximum number of digits to collect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_digits: Option<u32>,
    /// Whether `#` submits the collected digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_on_hash: Option<bool>,
}

/// Records part of the call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Recording format (`mp3`, `wav`, `ogg`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Seconds of silence that end the recording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_on_silence: Option<u32>,
    /// Digit that ends the recording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_on_key: Option<String>,
    /// Maximum recording length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_out: Option<u32>,
    /// Whether to play a beep when recording starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beep_start: Option<bool>,
    /// Where to deliver the recording metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url: Option<Vec<String>>,
}

/// Places the call into a named conversation (conference).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation room name.
    pub name: String,
    /// Whether the conversation starts when this caller enters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_on_enter: Option<bool>,
    /// Whether the conversation ends when this caller leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_on_exit: Option<bool>,
    /// Whether to record the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,
}

impl Conversation {
    /// Creates a conversation action for a named room.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Connects the call to another endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connect {
    /// Destination endpoints; the wire takes an array of one.
    pub endpoint: Vec<ConnectEndpoint>,
    /// Caller ID presented to the callee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Seconds to ring before giving up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Maximum leg duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Where to deliver leg progress events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url: Option<Vec<String>>,
}

impl Connect {
    /// Creates a connect action for one endpoint.
    #[must_use]
    pub fn new(endpoint: ConnectEndpoint) -> Self {
        Self {
            endpoint: vec![endpoint],
            ..Self::default()
        }
    }
}

/// Posts a payload to an event URL mid-call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notify {
    /// Arbitrary JSON delivered to the event URL.
    pub payload: Value,
    /// Where to deliver the payload.
    pub event_url: Vec<String>,
}

/// The endpoints a [`Connect`] action can target.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectEndpoint {
    /// A PSTN phone number.
    Phone {
        /// E.164 number to dial.
        number: String,
        /// DTMF digits to send once answered.
        #[serde(rename = "dtmfAnswer", skip_serializing_if = "Option::is_none")]
        dtmf_answer: Option<String>,
    },
    /// A SIP URI.
    Sip {
        /// The `sip:` URI to dial.
        uri: String,
    },
    /// A websocket consuming the call audio.
    Websocket {
        /// The `wss:` URI to stream to.
        uri: String,
        /// Audio content type (e.g. `audio/l16;rate=16000`).
        #[serde(rename = "content-type", skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
    /// Another application user.
    App {
        /// The user to ring.
        user: String,
    },
}

/// One call control action, tagged with its wire name.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Speak text.
    Talk(Talk),
    /// Stream audio.
    Stream(Stream),
    /// Collect input.
    Input(Input),
    /// Record audio.
    Record(Record),
    /// Join a conversation.
    Conversation(Conversation),
    /// Connect to an endpoint.
    Connect(Connect),
    /// Post a mid-call notification.
    Notify(Notify),
}

/// An ordered action list, serialized as a JSON array.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ncco {
    actions: Vec<Action>,
}

impl Ncco {
    /// Creates an empty action list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action, preserving order.
    #[must_use]
    pub fn add(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when no actions have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the actions in execution order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_talk_serializes_with_action_tag() {
        let ncco = Ncco::new().add(Action::Talk(Talk::new("Hello")));
        let value = serde_json::to_value(&ncco).unwrap();
        assert_eq!(value, json!([{"action": "talk", "text": "Hello"}]));
    }

    #[test]
    fn test_talk_loop_uses_wire_name() {
        let talk = Talk {
            text: "Hi".to_string(),
            loop_count: Some(3),
            barge_in: Some(true),
            ..Talk::default()
        };
        let value = serde_json::to_value(Action::Talk(talk)).unwrap();
        assert_eq!(value["loop"], 3);
        assert_eq!(value["bargeIn"], true);
    }

    #[test]
    fn test_stream_wraps_url_in_array() {
        let value =
            serde_json::to_value(Action::Stream(Stream::new("https://cdn.example.test/a.mp3")))
                .unwrap();
        assert_eq!(value["streamUrl"], json!(["https://cdn.example.test/a.mp3"]));
    }

    #[test]
    fn test_connect_phone_endpoint_tagging() {
        let connect = Connect::new(ConnectEndpoint::Phone {
            number: "447700900000".to_string(),
            dtmf_answer: None,
        });
        let value = serde_json::to_value(Action::Connect(connect)).unwrap();
        assert_eq!(value["action"], "connect");
        assert_eq!(value["endpoint"][0]["type"], "phone");
        assert_eq!(value["endpoint"][0]["number"], "447700900000");
        assert!(value["endpoint"][0].get("dtmfAnswer").is_none());
    }

    #[test]
    fn test_websocket_endpoint_content_type_spelling() {
        let endpoint = ConnectEndpoint::Websocket {
            uri: "wss://example.test/socket".to_string(),
            content_type: Some("audio/l16;rate=16000".to_string()),
        };
        let value = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(value["content-type"], "audio/l16;rate=16000");
    }

    #[test]
    fn test_actions_keep_insertion_order() {
        let ncco = Ncco::new()
            .add(Action::Talk(Talk::new("first")))
            .add(Action::Conversation(Conversation::new("room")));
        let value = serde_json::to_value(&ncco).unwrap();
        assert_eq!(value[0]["action"], "talk");
        assert_eq!(value[1]["action"], "conversation");
        assert_eq!(ncco.len(), 2);
    }

    #[test]
    fn test_ncco_round_trips_through_deserialization() {
        let json_text = r#"[
            {"action": "talk", "text": "Hello"},
            {"action": "input", "type": ["dtmf"], "dtmf": {"maxDigits": 4}}
        ]"#;
        let ncco: Ncco = serde_json::from_str(json_text).unwrap();
        assert_eq!(ncco.len(), 2);
        match &ncco.actions()[1] {
            Action::Input(input) => {
                assert_eq!(input.input_types, vec!["dtmf"]);
                assert_eq!(input.dtmf.as_ref().unwrap().max_digits, Some(4));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
