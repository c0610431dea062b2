use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotifierError>;

#[derive(Debug, Error)]
pub enum NotifierError {
    /// Network or service failure talking to the content service or SNS
    #[error("Transport error: {0}")]
    Transport(String),

    /// The content service answered with something other than the expected shape
    #[error("Malformed response from content service: {0}")]
    MalformedResponse(String),

    /// Envelope is missing the `default` channel or names an unknown channel
    #[error("Invalid notification envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Channel '{channel}' payload is {actual} characters, limit is {limit}")]
    ConstraintViolation {
        channel: &'static str,
        limit: usize,
        actual: usize,
    },

    #[error("Failed to read topic ARN from {path}: {source}")]
    TopicFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotifierError {
    /// True for failures raised before any request left the process.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NotifierError::InvalidEnvelope(_) | NotifierError::ConstraintViolation { .. }
        )
    }
}

impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifierError::Transport(format!("request timed out: {}", err))
        } else {
            NotifierError::Transport(err.to_string())
        }
    }
}
