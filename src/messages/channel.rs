//! Outbound channel messages.
//!
//! The unified messages endpoint takes one JSON shape across channels:
//! a `channel` tag, a `message_type` tag, addressing, and per-type content.
//! Each supported combination is a sealed struct implementing
//! [`OutboundMessage`]; the dispatcher never inspects the structs beyond
//! that interface.

use serde_json::{json, Value};

use crate::error::ValidationError;
use crate::sms::CLIENT_REF_MAX_LEN;

/// The delivery channels the unified messages endpoint accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Plain SMS.
    Sms,
    /// MMS.
    Mms,
    /// WhatsApp Business.
    WhatsApp,
    /// Viber Business (service messages).
    ViberService,
    /// Facebook Messenger.
    Messenger,
}

impl Channel {
    /// Returns the wire name of this channel.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Mms => "mms",
            Self::WhatsApp => "whatsapp",
            Self::ViberService => "viber_service",
            Self::Messenger => "messenger",
        }
    }

    /// Parses a wire channel name.
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "sms" => Some(Self::Sms),
            "mms" => Some(Self::Mms),
            "whatsapp" => Some(Self::WhatsApp),
            "viber_service" => Some(Self::ViberService),
            "messenger" => Some(Self::Messenger),
            _ => None,
        }
    }
}

/// A message that can travel through the unified messages endpoint.
pub trait OutboundMessage {
    /// The channel this message travels on.
    fn channel(&self) -> Channel;

    /// The wire `message_type` value.
    fn message_type(&self) -> &'static str;

    /// The complete JSON body for the send endpoint.
    fn to_body(&self) -> Value;
}

fn validate_client_ref(client_ref: String) -> Result<String, ValidationError> {
    let length = client_ref.chars().count();
    if length > CLIENT_REF_MAX_LEN {
        return Err(ValidationError::ClientRefTooLong {
            max: CLIENT_REF_MAX_LEN,
            actual: length,
        });
    }
    Ok(client_ref)
}

/// A text message over the SMS channel.
#[derive(Clone, Debug)]
pub struct SmsText {
    /// Recipient number.
    pub to: String,
    /// Sender number or ID.
    pub from: String,
    /// The text to send.
    pub text: String,
    client_ref: Option<String>,
}

impl SmsText {
    /// Creates an SMS text message.
    #[must_use]
    pub fn new(to: impl Into<String>, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            text: text.into(),
            client_ref: None,
        }
    }

    /// Sets the client reference echoed in status webhooks.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ClientRefTooLong`] above 40 characters.
    pub fn client_ref(mut self, client_ref: impl Into<String>) -> Result<Self, ValidationError> {
        self.client_ref = Some(validate_client_ref(client_ref.into())?);
        Ok(self)
    }
}

impl OutboundMessage for SmsText {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    fn message_type(&self) -> &'static str {
        "text"
    }

    fn to_body(&self) -> Value {
        json!({
            "channel": self.channel().as_str(),
            "message_type": self.message_type(),
            "to": self.to,
            "from": self.from,
            "text": self.text,
            "client_ref": self.client_ref,
        })
    }
}

/// An image message over the MMS channel.
#[derive(Clone, Debug)]
pub struct MmsImage {
    /// Recipient number.
    pub to: String,
    /// Sender number.
    pub from: String,
    /// Public URL of the image.
    pub url: String,
    /// Optional caption shown under the image.
    pub caption: Option<String>,
}

impl MmsImage {
    /// Creates an MMS image message.
    #[must_use]
    pub fn new(to: impl Into<String>, from: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            url: url.into(),
            caption: None,
        }
    }

    /// Sets the caption.
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl OutboundMessage for MmsImage {
    fn channel(&self) -> Channel {
        Channel::Mms
    }

    fn message_type(&self) -> &'static str {
        "image"
    }

    fn to_body(&self) -> Value {
        json!({
            "channel": self.channel().as_str(),
            "message_type": self.message_type(),
            "to": self.to,
            "from": self.from,
            "image": {
                "url": self.url,
                "caption": self.caption,
            },
        })
    }
}

/// A text message over the WhatsApp channel.
#[derive(Clone, Debug)]
pub struct WhatsAppText {
    /// Recipient number.
    pub to: String,
    /// The WhatsApp Business number sending.
    pub from: String,
    /// The text to send.
    pub text: String,
}

impl WhatsAppText {
    /// Creates a WhatsApp text message.
    #[must_use]
    pub fn new(to: impl Into<String>, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            text: text.into(),
        }
    }
}

impl OutboundMessage for WhatsAppText {
    fn channel(&self) -> Channel {
        Channel::WhatsApp
    }

    fn message_type(&self) -> &'static str {
        "text"
    }

    fn to_body(&self) -> Value {
        json!({
            "channel": self.channel().as_str(),
            "message_type": self.message_type(),
            "to": self.to,
            "from": self.from,
            "text": self.text,
        })
    }
}

/// A templated message over the WhatsApp channel.
///
/// Templates are required for business-initiated conversations.
#[derive(Clone, Debug)]
pub struct WhatsAppTemplate {
    /// Recipient number.
    pub to: String,
    /// The WhatsApp Business number sending.
    pub from: String,
    /// Namespaced template name.
    pub name: String,
    /// Positional template parameters.
    pub parameters: Vec<String>,
    /// BCP-47 template locale (e.g. `en_GB`).
    pub locale: String,
}

impl WhatsAppTemplate {
    /// Creates a template message with the platform's default locale.
    #[must_use]
    pub fn new(to: impl Into<String>, from: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            name: name.into(),
            parameters: Vec::new(),
            locale: "en_US".to_string(),
        }
    }

    /// Appends a positional parameter.
    #[must_use]
    pub fn parameter(mut self, value: impl Into<String>) -> Self {
        self.parameters.push(value.into());
        self
    }

    /// Overrides the template locale.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

impl OutboundMessage for WhatsAppTemplate {
    fn channel(&self) -> Channel {
        Channel::WhatsApp
    }

    fn message_type(&self) -> &'static str {
        "template"
    }

    fn to_body(&self) -> Value {
        json!({
            "channel": self.channel().as_str(),
            "message_type": self.message_type(),
            "to": self.to,
            "from": self.from,
            "template": {
                "name": self.name,
                "parameters": self.parameters,
            },
            "whatsapp": {
                "policy": "deterministic",
                "locale": self.locale,
            },
        })
    }
}

/// A text message over the Viber Business channel.
#[derive(Clone, Debug)]
pub struct ViberText {
    /// Recipient number.
    pub to: String,
    /// The Viber service ID sending.
    pub from: String,
    /// The text to send.
    pub text: String,
}

impl ViberText {
    /// Creates a Viber text message.
    #[must_use]
    pub fn new(to: impl Into<String>, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            text: text.into(),
        }
    }
}

impl OutboundMessage for ViberText {
    fn channel(&self) -> Channel {
        Channel::ViberService
    }

    fn message_type(&self) -> &'static str {
        "text"
    }

    fn to_body(&self) -> Value {
        json!({
            "channel": self.channel().as_str(),
            "message_type": self.message_type(),
            "to": self.to,
            "from": self.from,
            "text": self.text,
        })
    }
}

/// A text message over the Messenger channel.
#[derive(Clone, Debug)]
pub struct MessengerText {
    /// Recipient Messenger ID.
    pub to: String,
    /// The page ID sending.
    pub from: String,
    /// The text to send.
    pub text: String,
}

impl MessengerText {
    /// Creates a Messenger text message.
    #[must_use]
    pub fn new(to: impl Into<String>, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            text: text.into(),
        }
    }
}

impl OutboundMessage for MessengerText {
    fn channel(&self) -> Channel {
        Channel::Messenger
    }

    fn message_type(&self) -> &'static str {
        "text"
    }

    fn to_body(&self) -> Value {
        json!({
            "channel": self.channel().as_str(),
            "message_type": self.message_type(),
            "to": self.to,
            "from": self.from,
            "text": self.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_wire_names_round_trip() {
        for channel in [
            Channel::Sms,
            Channel::Mms,
            Channel::WhatsApp,
            Channel::ViberService,
            Channel::Messenger,
        ] {
            assert_eq!(Channel::from_str_opt(channel.as_str()), Some(channel));
        }
        assert!(Channel::from_str_opt("carrier_pigeon").is_none());
    }

    #[test]
    fn test_sms_text_body_shape() {
        let body = SmsText::new("447700900000", "Acme", "Hello").to_body();
        assert_eq!(body["channel"], "sms");
        assert_eq!(body["message_type"], "text");
        assert_eq!(body["text"], "Hello");
        assert!(body["client_ref"].is_null());
    }

    #[test]
    fn test_sms_text_client_ref_validation() {
        let ok = SmsText::new("t", "f", "x").client_ref("ref-1").unwrap();
        assert_eq!(ok.to_body()["client_ref"], "ref-1");

        let error = SmsText::new("t", "f", "x")
            .client_ref("x".repeat(41))
            .unwrap_err();
        assert!(matches!(error, ValidationError::ClientRefTooLong { .. }));
    }

    #[test]
    fn test_mms_image_nests_content() {
        let body = MmsImage::new("447700900000", "447700900001", "https://cdn.example.test/a.jpg")
            .caption("The caption")
            .to_body();
        assert_eq!(body["channel"], "mms");
        assert_eq!(body["message_type"], "image");
        assert_eq!(body["image"]["url"], "https://cdn.example.test/a.jpg");
        assert_eq!(body["image"]["caption"], "The caption");
    }

    #[test]
    fn test_whatsapp_template_body_shape() {
        let body = WhatsAppTemplate::new("447700900000", "447700900001", "acme:verify")
            .parameter("1234")
            .locale("en_GB")
            .to_body();

        assert_eq!(body["message_type"], "template");
        assert_eq!(body["template"]["name"], "acme:verify");
        assert_eq!(body["template"]["parameters"][0], "1234");
        assert_eq!(body["whatsapp"]["locale"], "en_GB");
        assert_eq!(body["whatsapp"]["policy"], "deterministic");
    }

    #[test]
    fn test_viber_and_messenger_channels() {
        assert_eq!(
            ViberText::new("t", "f", "x").to_body()["channel"],
            "viber_service"
        );
        assert_eq!(
            MessengerText::new("t", "f", "x").to_body()["channel"],
            "messenger"
        );
    }
}
