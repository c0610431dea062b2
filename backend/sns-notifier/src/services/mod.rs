pub mod composer;
pub mod content_fetcher;
pub mod notifier;
pub mod publisher;
pub mod sns_client;

pub use composer::*;
pub use content_fetcher::*;
pub use notifier::*;
pub use publisher::*;
pub use sns_client::*;
