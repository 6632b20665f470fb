use std::time::Duration;

use brightfeed::app::{AppContext, BrightError};
use brightfeed::config::Config;
use brightfeed::cycle::{run_cycle, CycleOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_rss(image_url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Bright</title>
    <link>https://www.bright.nl</link>
    <description>Test feed</description>
    <item>
      <title>RTL Nieuws update</title>
      <link>https://www.bright.nl/1</link>
      <pubDate>Mon, 21 Oct 2024 08:00:00 +0200</pubDate>
      <description>Bulletin</description>
    </item>
    <item>
      <title>Real Story</title>
      <link>https://www.bright.nl/2</link>
      <pubDate>Mon, 21 Oct 2024 07:28:00 +0200</pubDate>
      <description>&lt;p&gt;Body&lt;/p&gt;</description>
      <enclosure url="{}" length="4" type="image/png"/>
    </item>
  </channel>
</rss>"#,
        image_url
    )
}

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.feed.url = format!("{}/rss.xml", server.uri());
    config.http.timeout_secs = 2;
    config
}

async fn mount_feed(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/rss.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn announces_second_item_with_image_over_http() {
    let server = MockServer::start().await;
    let image_url = format!("{}/img/1.png", server.uri());
    mount_feed(&server, sample_rss(&image_url)).await;
    Mock::given(method("GET"))
        .and(path("/img/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let ctx = AppContext::new(&config_for(&server)).unwrap();

    let payload = match run_cycle(&ctx).await.unwrap() {
        CycleOutcome::Announced(payload) => payload,
        other => panic!("expected an announcement, got {other:?}"),
    };
    assert_eq!(payload.title, "Real Story");
    assert_eq!(payload.pub_date, "Mon, 21 Oct 2024 07:28:00 +0200");
    assert_eq!(payload.image_url, image_url);
    assert_eq!(payload.content, "<p>Body</p>");
    assert_eq!(payload.image.bytes().as_deref(), Some(&b"\x89PNG"[..]));

    // Same feed again: image refreshed, nothing announced.
    assert!(matches!(
        run_cycle(&ctx).await.unwrap(),
        CycleOutcome::Duplicate { .. }
    ));
}

#[tokio::test]
async fn webhook_receives_new_article() {
    let server = MockServer::start().await;
    let image_url = format!("{}/img/1.png", server.uri());
    mount_feed(&server, sample_rss(&image_url)).await;
    Mock::given(method("GET"))
        .and(path("/img/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.webhook.url = Some(format!("{}/hook", server.uri()));
    let ctx = AppContext::new(&config).unwrap();

    assert!(matches!(
        run_cycle(&ctx).await.unwrap(),
        CycleOutcome::Announced(_)
    ));

    let body = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let requests = server.received_requests().await.unwrap_or_default();
            if let Some(hook) = requests.iter().find(|r| r.url.path() == "/hook") {
                return serde_json::from_slice::<serde_json::Value>(&hook.body).unwrap();
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("webhook was not called");

    assert_eq!(body["event"], "new_article");
    assert_eq!(body["data"]["title"], "Real Story");
    assert_eq!(body["data"]["imageUrl"], image_url.as_str());
    assert_eq!(body["data"]["image"], "bright-article-image");
}

#[tokio::test]
async fn failing_webhook_does_not_block_commit() {
    let server = MockServer::start().await;
    let image_url = format!("{}/img/1.png", server.uri());
    mount_feed(&server, sample_rss(&image_url)).await;
    Mock::given(method("GET"))
        .and(path("/img/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.webhook.url = Some(format!("{}/hook", server.uri()));
    let ctx = AppContext::new(&config).unwrap();

    assert!(matches!(
        run_cycle(&ctx).await.unwrap(),
        CycleOutcome::Announced(_)
    ));
    assert_eq!(
        ctx.last_announced().as_deref(),
        Some("Mon, 21 Oct 2024 07:28:00 +0200")
    );
}

#[tokio::test]
async fn image_error_ends_cycle_before_dedup() {
    let server = MockServer::start().await;
    let image_url = format!("{}/img/missing.png", server.uri());
    mount_feed(&server, sample_rss(&image_url)).await;
    Mock::given(method("GET"))
        .and(path("/img/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ctx = AppContext::new(&config_for(&server)).unwrap();
    let mut rx = ctx.emitter.subscribe();

    let err = run_cycle(&ctx).await.unwrap_err();
    assert!(matches!(err, BrightError::ImageFetch { .. }));
    assert_eq!(ctx.last_announced(), None);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn feed_http_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let ctx = AppContext::new(&config_for(&server)).unwrap();

    let err = run_cycle(&ctx).await.unwrap_err();
    assert!(matches!(err, BrightError::Fetch { .. }));
    assert_eq!(ctx.last_announced(), None);
}

#[tokio::test]
async fn malformed_feed_is_parse_error() {
    let server = MockServer::start().await;
    mount_feed(&server, "<html><body>maintenance</body></html>".to_string()).await;

    let ctx = AppContext::new(&config_for(&server)).unwrap();

    let err = run_cycle(&ctx).await.unwrap_err();
    assert!(matches!(err, BrightError::FeedParse(_)));
}
