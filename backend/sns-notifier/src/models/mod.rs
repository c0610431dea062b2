use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::error::{NotifierError, Result};

/// Maximum characters allowed in an SMS payload (single text message)
pub const SMS_MESSAGE_MAX_LEN: usize = 140;

/// Acknowledgment returned by the notification topic service.
///
/// Kept as an untyped document; the notifier never inspects it.
pub type PublishResult = Value;

/// Text body of one published post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentItem(String);

impl ContentItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn into_text(self) -> String {
        self.0
    }
}

impl AsRef<str> for ContentItem {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentItem {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ContentItem {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// ARN of the SNS topic that receives the notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicArn(String);

impl TopicArn {
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SNS delivery protocol keys accepted in a JSON-structured message
///
/// See https://docs.aws.amazon.com/sns/latest/api/API_Subscribe.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Fallback for every protocol without a dedicated payload
    Default,
    Sms,
    Email,
    EmailJson,
    Http,
    Https,
    Sqs,
    Lambda,
    Application,
    Firehose,
}

impl Channel {
    pub const ALL: [Channel; 10] = [
        Channel::Default,
        Channel::Sms,
        Channel::Email,
        Channel::EmailJson,
        Channel::Http,
        Channel::Https,
        Channel::Sqs,
        Channel::Lambda,
        Channel::Application,
        Channel::Firehose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Default => "default",
            Channel::Sms => "sms",
            Channel::Email => "email",
            Channel::EmailJson => "email-json",
            Channel::Http => "http",
            Channel::Https => "https",
            Channel::Sqs => "sqs",
            Channel::Lambda => "lambda",
            Channel::Application => "application",
            Channel::Firehose => "firehose",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == key)
    }

    /// Character limit for the channel's rendered payload, if any
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Channel::Sms => Some(SMS_MESSAGE_MAX_LEN),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol-keyed message published to SNS with `MessageStructure=json`.
///
/// `default` is mandatory; every other protocol is optional and falls back
/// to `default` on the SNS side when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationEnvelope {
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(
        rename = "email-json",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub email_json: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firehose: Option<Value>,
}

impl NotificationEnvelope {
    pub fn new(default: impl Into<Value>) -> Self {
        Self {
            default: default.into(),
            sms: None,
            email: None,
            email_json: None,
            http: None,
            https: None,
            sqs: None,
            lambda: None,
            application: None,
            firehose: None,
        }
    }

    pub fn with_sms(mut self, payload: impl Into<Value>) -> Self {
        self.sms = Some(payload.into());
        self
    }

    pub fn with_email(mut self, payload: impl Into<Value>) -> Self {
        self.email = Some(payload.into());
        self
    }

    /// Sets the payload for any channel, including `default`.
    pub fn with_channel(mut self, channel: Channel, payload: impl Into<Value>) -> Self {
        let payload = payload.into();
        let slot = match channel {
            Channel::Default => {
                self.default = payload;
                return self;
            }
            Channel::Sms => &mut self.sms,
            Channel::Email => &mut self.email,
            Channel::EmailJson => &mut self.email_json,
            Channel::Http => &mut self.http,
            Channel::Https => &mut self.https,
            Channel::Sqs => &mut self.sqs,
            Channel::Lambda => &mut self.lambda,
            Channel::Application => &mut self.application,
            Channel::Firehose => &mut self.firehose,
        };
        *slot = Some(payload);
        self
    }

    pub fn get(&self, channel: Channel) -> Option<&Value> {
        match channel {
            Channel::Default => Some(&self.default),
            Channel::Sms => self.sms.as_ref(),
            Channel::Email => self.email.as_ref(),
            Channel::EmailJson => self.email_json.as_ref(),
            Channel::Http => self.http.as_ref(),
            Channel::Https => self.https.as_ref(),
            Channel::Sqs => self.sqs.as_ref(),
            Channel::Lambda => self.lambda.as_ref(),
            Channel::Application => self.application.as_ref(),
            Channel::Firehose => self.firehose.as_ref(),
        }
    }

    /// Channels that carry a payload, `default` first.
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &Value)> + '_ {
        Channel::ALL
            .into_iter()
            .filter_map(move |channel| self.get(channel).map(|payload| (channel, payload)))
    }

    /// Checks every per-channel length limit.
    pub fn validate(&self) -> Result<()> {
        for (channel, payload) in self.channels() {
            if let Some(limit) = channel.max_len() {
                let actual = render_plain(payload).chars().count();
                if actual > limit {
                    return Err(NotifierError::ConstraintViolation {
                        channel: channel.as_str(),
                        limit,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// JSON document sent as the SNS `Message` body.
    pub fn to_message(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| NotifierError::InvalidEnvelope(format!("Failed to serialize: {}", e)))
    }
}

impl TryFrom<Map<String, Value>> for NotificationEnvelope {
    type Error = NotifierError;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        if !map.contains_key(Channel::Default.as_str()) {
            return Err(NotifierError::InvalidEnvelope(
                "missing required 'default' channel".to_string(),
            ));
        }
        if let Some(unknown) = map.keys().find(|key| Channel::from_key(key).is_none()) {
            return Err(NotifierError::InvalidEnvelope(format!(
                "unknown channel '{}'",
                unknown
            )));
        }
        serde_json::from_value(Value::Object(map))
            .map_err(|e| NotifierError::InvalidEnvelope(e.to_string()))
    }
}

impl TryFrom<Value> for NotificationEnvelope {
    type Error = NotifierError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(NotifierError::InvalidEnvelope(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }
}

/// Renders a channel payload the way a subscriber would see it as text.
pub fn render_plain(payload: &Value) -> Cow<'_, str> {
    match payload {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
