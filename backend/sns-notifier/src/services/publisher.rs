use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_SUBJECT;
use crate::error::Result;
use crate::models::{NotificationEnvelope, PublishResult, TopicArn};
use crate::services::sns_client::{PublishRequest, TopicClient, MESSAGE_STRUCTURE_JSON};

/// Validates envelopes and hands them to the topic service.
///
/// Validation always runs before the request is built, so a rejected
/// envelope never reaches the network.
pub struct Publisher {
    client: Arc<dyn TopicClient>,
    subject: String,
}

impl Publisher {
    pub fn new(client: Arc<dyn TopicClient>) -> Self {
        Self {
            client,
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub async fn publish(
        &self,
        topic: &TopicArn,
        envelope: &NotificationEnvelope,
    ) -> Result<PublishResult> {
        if let Err(e) = envelope.validate() {
            warn!(topic_arn = %topic, error = %e, "Rejected notification envelope");
            return Err(e);
        }

        let channels: Vec<&str> = envelope
            .channels()
            .map(|(channel, _)| channel.as_str())
            .collect();

        let request = PublishRequest {
            target_arn: topic.as_str().to_string(),
            message: envelope.to_message()?,
            subject: self.subject.clone(),
            message_structure: MESSAGE_STRUCTURE_JSON,
        };

        debug!(topic_arn = %topic, ?channels, "Publishing notification");
        let ack = self.client.publish(request).await?;
        info!(topic_arn = %topic, ?channels, ack = %ack, "Notification published");

        Ok(ack)
    }

    /// Publishes a loosely-typed protocol map, e.g. `{"default": "...", "sms": "..."}`.
    pub async fn publish_message(&self, topic: &TopicArn, message: Value) -> Result<PublishResult> {
        let envelope = NotificationEnvelope::try_from(message).map_err(|e| {
            warn!(topic_arn = %topic, error = %e, "Rejected notification envelope");
            e
        })?;
        self.publish(topic, &envelope).await
    }
}
