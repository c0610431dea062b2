use anyhow::{Context, Result};
use sns_notifier::{
    load_topic_arn, Config, GraphQlContentFetcher, Notifier, Publisher, SnsTopicClient,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Invalid notifier configuration")?;

    let topic = load_topic_arn(&config.topic.arn_path).context("Failed to load SNS topic ARN")?;
    tracing::info!(topic_arn = %topic, "Starting SNS notifier run");

    let sns = SnsTopicClient::from_env(&config.aws.region, config.aws.request_timeout).await;
    let publisher = Publisher::new(Arc::new(sns)).with_subject(config.topic.subject.clone());

    let notifier = match &config.content.graphql_url {
        Some(url) => {
            let fetcher = GraphQlContentFetcher::new(url.clone(), config.content.request_timeout)
                .context("Failed to create content fetcher")?;
            tracing::info!(endpoint = %url, limit = config.content.post_limit.get(), "Content mode");
            Notifier::with_content(Arc::new(fetcher), publisher)
                .post_limit(config.content.post_limit)
        }
        None => Notifier::heartbeat(publisher),
    };

    let ack = notifier.run(&topic).await.map_err(|e| {
        tracing::error!(error = %e, "Notifier run failed");
        e
    })?;

    tracing::info!(ack = %ack, "SNS notifier run complete");
    Ok(())
}
