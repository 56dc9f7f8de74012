//! Inbound message and status webhooks for the unified messages API.
//!
//! Every payload carries a `channel` discriminator; [`InboundMessage`]
//! dispatches on it and fails loudly for values it does not recognize, so
//! new platform channels surface as errors instead of silently misparsed
//! payloads.

use serde_json::{Map, Value};

use crate::messages::channel::Channel;
use crate::webhooks::{discriminator, params_from_request, IncomingRequest, WebhookError};

fn str_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(ToString::to_string)
}

/// Fields shared by every inbound channel message.
#[derive(Clone, Debug)]
pub struct InboundDetail {
    /// Platform-assigned message UUID.
    pub message_uuid: Option<String>,
    /// The Meridian number or ID that received the message.
    pub to: Option<String>,
    /// Who sent the message.
    pub from: Option<String>,
    /// ISO-8601 receipt instant.
    pub timestamp: Option<String>,
    /// The wire `message_type`.
    pub message_type: Option<String>,
    /// Text content, for text-type messages.
    pub text: Option<String>,
    raw: Map<String, Value>,
}

impl InboundDetail {
    fn from_params(params: Map<String, Value>) -> Self {
        Self {
            message_uuid: str_param(&params, "message_uuid"),
            to: str_param(&params, "to"),
            from: str_param(&params, "from"),
            timestamp: str_param(&params, "timestamp"),
            message_type: str_param(&params, "message_type"),
            text: str_param(&params, "text"),
            raw: params,
        }
    }

    /// Raw access to any wire field, including channel-specific content.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

/// An inbound message, dispatched on its `channel` discriminator.
#[derive(Clone, Debug)]
pub enum InboundMessage {
    /// Inbound SMS.
    Sms(InboundDetail),
    /// Inbound MMS.
    Mms(InboundDetail),
    /// Inbound WhatsApp message.
    WhatsApp(InboundDetail),
    /// Inbound Viber message.
    Viber(InboundDetail),
    /// Inbound Messenger message.
    Messenger(InboundDetail),
}

impl InboundMessage {
    /// Dispatches a normalized parameter map on its `channel` field.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingDiscriminator`] when `channel` is
    /// absent and [`WebhookError::UnknownType`] for unrecognized values.
    pub fn from_params(params: Map<String, Value>) -> Result<Self, WebhookError> {
        let channel_name = discriminator(&params, "channel")?.to_string();
        let channel = Channel::from_str_opt(&channel_name).ok_or(WebhookError::UnknownType {
            discriminator: "channel",
            value: channel_name,
        })?;

        let detail = InboundDetail::from_params(params);
        Ok(match channel {
            Channel::Sms => Self::Sms(detail),
            Channel::Mms => Self::Mms(detail),
            Channel::WhatsApp => Self::WhatsApp(detail),
            Channel::ViberService => Self::Viber(detail),
            Channel::Messenger => Self::Messenger(detail),
        })
    }

    /// Dispatches a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MalformedBody`] for invalid JSON, plus the
    /// dispatch errors of [`from_params`](Self::from_params).
    pub fn from_json(body: &str) -> Result<Self, WebhookError> {
        Self::from_params(crate::webhooks::params_from_json(body)?)
    }

    /// Dispatches an inbound HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] for unparseable requests, plus the dispatch
    /// errors of [`from_params`](Self::from_params).
    pub fn from_request(request: &IncomingRequest) -> Result<Self, WebhookError> {
        Self::from_params(params_from_request(request)?)
    }

    /// Returns the channel this message arrived on.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Sms(_) => Channel::Sms,
            Self::Mms(_) => Channel::Mms,
            Self::WhatsApp(_) => Channel::WhatsApp,
            Self::Viber(_) => Channel::ViberService,
            Self::Messenger(_) => Channel::Messenger,
        }
    }

    /// Returns the channel-independent detail fields.
    #[must_use]
    pub const fn detail(&self) -> &InboundDetail {
        match self {
            Self::Sms(detail)
            | Self::Mms(detail)
            | Self::WhatsApp(detail)
            | Self::Viber(detail)
            | Self::Messenger(detail) => detail,
        }
    }
}

/// A message status webhook (submitted, delivered, rejected, ...).
#[derive(Clone, Debug)]
pub struct MessageStatus {
    /// The message the status refers to.
    pub message_uuid: String,
    /// Lifecycle status value.
    pub status: String,
    /// The channel the message traveled on.
    pub channel: Option<Channel>,
    /// ISO-8601 status instant.
    pub timestamp: Option<String>,
    /// Client reference from the original send.
    pub client_ref: Option<String>,
    /// Error detail for `rejected`/`undeliverable` statuses.
    pub error: Option<Value>,
}

impl MessageStatus {
    /// Hydrates a status webhook from normalized parameters.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingField`] when `message_uuid` or
    /// `status` is absent.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, WebhookError> {
        let message_uuid = str_param(params, "message_uuid")
            .ok_or(WebhookError::MissingField {
                field: "message_uuid",
            })?;
        let status =
            str_param(params, "status").ok_or(WebhookError::MissingField { field: "status" })?;

        Ok(Self {
            message_uuid,
            status,
            channel: str_param(params, "channel")
                .as_deref()
                .and_then(Channel::from_str_opt),
            timestamp: str_param(params, "timestamp"),
            client_ref: str_param(params, "client_ref"),
            error: params.get("error").cloned(),
        })
    }

    /// Hydrates a status webhook from an inbound HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] for unparseable requests or missing fields.
    pub fn from_request(request: &IncomingRequest) -> Result<Self, WebhookError> {
        Self::from_params(&params_from_request(request)?)
    }
}
