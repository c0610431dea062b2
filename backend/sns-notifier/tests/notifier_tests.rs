/// End-to-end runs: topic file → fetch → compose → publish
use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};
use sns_notifier::{
    load_topic_arn, ContentItem, ContentSource, GraphQlContentFetcher, Notifier, NotifierError,
    PublishRequest, PublishResult, Publisher, TopicArn, TopicClient,
};
use std::io::Write;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

mock! {
    pub Topic {}

    #[async_trait]
    impl TopicClient for Topic {
        async fn publish(&self, request: PublishRequest) -> sns_notifier::Result<PublishResult>;
    }
}

mock! {
    pub Source {}

    #[async_trait]
    impl ContentSource for Source {
        async fn fetch_recent(&self, count: NonZeroU32) -> sns_notifier::Result<Vec<ContentItem>>;
    }
}

fn expect_default_body(client: &mut MockTopic, expected: &'static str) {
    client
        .expect_publish()
        .withf(move |request| {
            let body: Value = serde_json::from_str(&request.message).unwrap();
            body == json!({"default": expected})
        })
        .times(1)
        .returning(|_| Ok(json!({"MessageId": "e2e-message"})));
}

#[tokio::test]
async fn test_end_to_end_content_run() {
    let mut arn_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(arn_file, "T").unwrap();
    let topic = load_topic_arn(arn_file.path()).unwrap();
    assert_eq!(topic, TopicArn::new("T"));

    let posts: Vec<String> = (2..=6)
        .rev()
        .map(|n| json!({"text": format!("hello posts {}", n)}).to_string())
        .collect();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string("{ readPosts(limit: 5) }"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"readPosts": posts}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = MockTopic::new();
    client
        .expect_publish()
        .withf(|request| {
            let body: Value = serde_json::from_str(&request.message).unwrap();
            request.target_arn == "T"
                && body
                    == json!({
                        "default": "hello posts 6\nhello posts 5\nhello posts 4\nhello posts 3\nhello posts 2"
                    })
        })
        .times(1)
        .returning(|_| Ok(json!({"MessageId": "e2e-message"})));

    let fetcher =
        GraphQlContentFetcher::new(format!("{}/graphql", server.uri()), Duration::from_secs(2))
            .unwrap();
    let notifier = Notifier::with_content(Arc::new(fetcher), Publisher::new(Arc::new(client)));

    let ack = notifier.run(&topic).await.unwrap();
    assert_eq!(ack, json!({"MessageId": "e2e-message"}));
}

#[tokio::test]
async fn test_heartbeat_run_publishes_fixed_message() {
    let mut client = MockTopic::new();
    expect_default_body(&mut client, "Hello SNS");

    let notifier = Notifier::heartbeat(Publisher::new(Arc::new(client)));
    let ack = notifier.run(&TopicArn::new("T")).await.unwrap();
    assert_eq!(ack["MessageId"], "e2e-message");
}

#[tokio::test]
async fn test_empty_content_still_publishes() {
    let mut source = MockSource::new();
    source.expect_fetch_recent().times(1).returning(|_| Ok(vec![]));

    let mut client = MockTopic::new();
    expect_default_body(&mut client, "");

    let notifier = Notifier::with_content(Arc::new(source), Publisher::new(Arc::new(client)));
    notifier.run(&TopicArn::new("T")).await.unwrap();
}

#[tokio::test]
async fn test_post_limit_is_forwarded() {
    let mut source = MockSource::new();
    source
        .expect_fetch_recent()
        .withf(|count| count.get() == 3)
        .times(1)
        .returning(|_| Ok(vec![ContentItem::new("a"), ContentItem::new("b")]));

    let mut client = MockTopic::new();
    expect_default_body(&mut client, "a\nb");

    let notifier = Notifier::with_content(Arc::new(source), Publisher::new(Arc::new(client)))
        .post_limit(NonZeroU32::new(3).unwrap());
    notifier.run(&TopicArn::new("T")).await.unwrap();
}

#[tokio::test]
async fn test_fetch_failure_aborts_before_publish() {
    let mut source = MockSource::new();
    source
        .expect_fetch_recent()
        .times(1)
        .returning(|_| Err(NotifierError::MalformedResponse("missing readPosts".to_string())));

    let mut client = MockTopic::new();
    client.expect_publish().never();

    let notifier = Notifier::with_content(Arc::new(source), Publisher::new(Arc::new(client)));
    let err = notifier.run(&TopicArn::new("T")).await.unwrap_err();
    assert!(matches!(err, NotifierError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_publish_failure_fails_run() {
    let mut client = MockTopic::new();
    client
        .expect_publish()
        .times(1)
        .returning(|_| Err(NotifierError::Transport("AuthorizationError".to_string())));

    let notifier = Notifier::heartbeat(Publisher::new(Arc::new(client)));
    let err = notifier.run(&TopicArn::new("T")).await.unwrap_err();
    assert!(matches!(err, NotifierError::Transport(_)));
}
