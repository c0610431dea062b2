use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{NotifierError, Result};
use crate::models::ContentItem;

/// Source of the most recent published content
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Returns up to `count` items in the order the source supplied them.
    async fn fetch_recent(&self, count: NonZeroU32) -> Result<Vec<ContentItem>>;
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ReadPostsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ReadPostsData {
    #[serde(rename = "readPosts")]
    read_posts: Vec<String>,
}

/// Each `readPosts` element is itself a JSON-encoded post record
#[derive(Debug, Deserialize)]
struct PostRecord {
    text: String,
}

/// Content service client speaking GraphQL over HTTP
pub struct GraphQlContentFetcher {
    endpoint: String,
    http_client: reqwest::Client,
}

impl GraphQlContentFetcher {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| NotifierError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn read_posts_query(count: NonZeroU32) -> String {
        format!("{{ readPosts(limit: {}) }}", count)
    }

    fn parse_response(body: &str) -> Result<Vec<ContentItem>> {
        let response: GraphQlResponse = serde_json::from_str(body)
            .map_err(|e| NotifierError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        let data = match response.data {
            Some(data) => data,
            None => {
                let reason = response
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "response has no data".to_string());
                return Err(NotifierError::MalformedResponse(reason));
            }
        };

        if !response.errors.is_empty() {
            warn!(
                errors = response.errors.len(),
                "Content service returned partial errors alongside data"
            );
        }

        data.read_posts
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_str::<PostRecord>(raw)
                    .map(|record| ContentItem::new(record.text))
                    .map_err(|e| {
                        NotifierError::MalformedResponse(format!("post record {}: {}", index, e))
                    })
            })
            .collect()
    }
}

#[async_trait]
impl ContentSource for GraphQlContentFetcher {
    async fn fetch_recent(&self, count: NonZeroU32) -> Result<Vec<ContentItem>> {
        debug!(endpoint = %self.endpoint, count = count.get(), "Querying recent posts");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/graphql")
            .body(Self::read_posts_query(count))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifierError::Transport(format!(
                "Content service returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let items = Self::parse_response(&body)?;

        info!(
            requested = count.get(),
            returned = items.len(),
            "Fetched recent posts"
        );

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_posts_query() {
        let query = GraphQlContentFetcher::read_posts_query(NonZeroU32::new(5).unwrap());
        assert_eq!(query, "{ readPosts(limit: 5) }");
    }

    #[test]
    fn test_parse_response_unwraps_records_in_order() {
        let body = r#"{"data": {"readPosts": [
            "{\"id\": 2, \"text\": \"second\", \"author\": \"a\"}",
            "{\"id\": 1, \"text\": \"first\"}"
        ]}}"#;

        let items = GraphQlContentFetcher::parse_response(body).unwrap();
        let texts: Vec<&str> = items.iter().map(ContentItem::text).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn test_parse_response_empty_list() {
        let items =
            GraphQlContentFetcher::parse_response(r#"{"data": {"readPosts": []}}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_response_rejects_non_json() {
        let err = GraphQlContentFetcher::parse_response("<html>502</html>").unwrap_err();
        assert!(matches!(err, NotifierError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_response_rejects_missing_key() {
        let err = GraphQlContentFetcher::parse_response(r#"{"data": {"posts": []}}"#).unwrap_err();
        assert!(matches!(err, NotifierError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_response_rejects_record_without_text() {
        let body = r#"{"data": {"readPosts": ["{\"id\": 1}"]}}"#;
        let err = GraphQlContentFetcher::parse_response(body).unwrap_err();
        assert!(err.to_string().contains("post record 0"));
    }

    #[test]
    fn test_parse_response_rejects_unencoded_record() {
        let body = r#"{"data": {"readPosts": [{"text": "not a string"}]}}"#;
        let err = GraphQlContentFetcher::parse_response(body).unwrap_err();
        assert!(matches!(err, NotifierError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_response_surfaces_graphql_error() {
        let body = r#"{"data": null, "errors": [{"message": "Cannot query field"}]}"#;
        let err = GraphQlContentFetcher::parse_response(body).unwrap_err();
        assert!(err.to_string().contains("Cannot query field"));
    }
}
