use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DEFAULT_POST_LIMIT;
use crate::error::Result;
use crate::models::{PublishResult, TopicArn};
use crate::services::composer::{compose, compose_default};
use crate::services::content_fetcher::ContentSource;
use crate::services::publisher::Publisher;

/// One fetch → compose → publish run
pub struct Notifier {
    content: Option<Arc<dyn ContentSource>>,
    post_limit: NonZeroU32,
    publisher: Publisher,
}

impl Notifier {
    /// Publishes the fixed heartbeat message on every run
    pub fn heartbeat(publisher: Publisher) -> Self {
        Self {
            content: None,
            post_limit: NonZeroU32::MIN,
            publisher,
        }
    }

    pub fn with_content(content: Arc<dyn ContentSource>, publisher: Publisher) -> Self {
        Self {
            content: Some(content),
            post_limit: NonZeroU32::new(DEFAULT_POST_LIMIT).unwrap_or(NonZeroU32::MIN),
            publisher,
        }
    }

    pub fn post_limit(mut self, post_limit: NonZeroU32) -> Self {
        self.post_limit = post_limit;
        self
    }

    pub async fn run(&self, topic: &TopicArn) -> Result<PublishResult> {
        let envelope = match &self.content {
            Some(source) => {
                let items = source.fetch_recent(self.post_limit).await?;
                if items.is_empty() {
                    // Published anyway; subscribers see an empty update
                    warn!(topic_arn = %topic, "No posts returned, publishing empty notification");
                }
                compose(&items)
            }
            None => {
                info!(topic_arn = %topic, "No content source configured, publishing heartbeat");
                compose_default()
            }
        };

        self.publisher.publish(topic, &envelope).await
    }
}
