use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{NotifierError, Result};
use crate::models::TopicArn;

/// Kubernetes ConfigMap volume mount holding the topic ARN
pub const SNS_TOPIC_CONFIG_PATH: &str = "/etc/populare-sns-notifier/populare-sns-topic-arn";

pub const DEFAULT_SUBJECT: &str = "Populare SNS Notifier Update";
pub const DEFAULT_REGION: &str = "us-east-2";
pub const DEFAULT_POST_LIMIT: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub topic: TopicConfig,
    pub content: ContentConfig,
    pub aws: AwsConfig,
}

#[derive(Debug, Clone)]
pub struct TopicConfig {
    pub arn_path: PathBuf,
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// GraphQL endpoint of the content service; `None` runs in heartbeat mode
    pub graphql_url: Option<String>,
    pub post_limit: NonZeroU32,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let request_timeout = Duration::from_secs(parse_env(
            "NOTIFIER_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        let post_limit = NonZeroU32::new(parse_env("POPULARE_POST_LIMIT", DEFAULT_POST_LIMIT)?)
            .ok_or_else(|| {
                NotifierError::Config("POPULARE_POST_LIMIT must be greater than zero".to_string())
            })?;

        Ok(Config {
            topic: TopicConfig {
                arn_path: std::env::var("SNS_TOPIC_ARN_PATH")
                    .unwrap_or_else(|_| SNS_TOPIC_CONFIG_PATH.to_string())
                    .into(),
                subject: std::env::var("NOTIFIER_SUBJECT")
                    .unwrap_or_else(|_| DEFAULT_SUBJECT.to_string()),
            },
            content: ContentConfig {
                graphql_url: std::env::var("POPULARE_GRAPHQL_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
                post_limit,
                request_timeout,
            },
            aws: AwsConfig {
                region: std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
                request_timeout,
            },
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| NotifierError::Config(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}

/// Reads the topic ARN from `path`; the whole trimmed file is the ARN.
///
/// A missing file is fatal for the run.
pub fn load_topic_arn(path: impl AsRef<Path>) -> Result<TopicArn> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| NotifierError::TopicFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TopicArn::new(contents.trim()))
}
