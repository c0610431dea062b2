//! Populare SNS notifier
//!
//! Composes a protocol-keyed notification from the most recent posts (or a
//! fixed heartbeat message) and publishes it to an SNS topic.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{load_topic_arn, Config};
pub use error::{NotifierError, Result};
pub use models::*;
pub use services::*;
