use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client as SnsClient;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{error, info};

use crate::error::{NotifierError, Result};
use crate::models::PublishResult;

/// `MessageStructure` value telling SNS the body is keyed by protocol
pub const MESSAGE_STRUCTURE_JSON: &str = "json";

/// One SNS `Publish` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub target_arn: String,
    pub message: String,
    pub subject: String,
    pub message_structure: &'static str,
}

/// Notification topic service
#[async_trait]
pub trait TopicClient: Send + Sync {
    async fn publish(&self, request: PublishRequest) -> Result<PublishResult>;
}

/// AWS SNS implementation of [`TopicClient`]
#[derive(Clone)]
pub struct SnsTopicClient {
    client: SnsClient,
}

impl SnsTopicClient {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS credential chain
    pub async fn from_env(region: &str, request_timeout: Duration) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(request_timeout)
                    .build(),
            )
            .load()
            .await;

        info!(region = %region, timeout = ?request_timeout, "AWS SNS client initialized");
        Self::new(SnsClient::new(&config))
    }
}

#[async_trait]
impl TopicClient for SnsTopicClient {
    async fn publish(&self, request: PublishRequest) -> Result<PublishResult> {
        let output = self
            .client
            .publish()
            .target_arn(&request.target_arn)
            .message(&request.message)
            .subject(&request.subject)
            .message_structure(request.message_structure)
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                error!(
                    topic_arn = %request.target_arn,
                    error = %detail,
                    "SNS publish failed"
                );
                NotifierError::Transport(format!("SNS publish failed: {}", detail))
            })?;

        let mut ack = Map::new();
        if let Some(message_id) = output.message_id() {
            ack.insert("MessageId".to_string(), Value::from(message_id));
        }
        if let Some(sequence_number) = output.sequence_number() {
            ack.insert("SequenceNumber".to_string(), Value::from(sequence_number));
        }
        Ok(Value::Object(ack))
    }
}
