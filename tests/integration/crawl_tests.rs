//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the real
//! HTTP fetcher and HTML extractor through complete crawls.

use hostcrawl::config::{Config, CrawlerConfig, UserAgentConfig};
use hostcrawl::crawler::crawl;
use hostcrawl::{CrawlError, Crawler, StopReason};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(workers: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers,
            queue_capacity: 100,
            fetch_timeout_ms: 5_000,
            max_duration_ms: None,
            seed: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: Some("https://example.com/contact".to_string()),
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>t</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

/// Mounts a page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/a">A</a> <a href="b">B</a> <a href="mailto:x@y.z">mail</a>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        html(r#"<a href="/">home</a> <a href="/b">B</a> <a href="/a">self</a>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        html(r#"<a href="/c">C</a> <a href="./a">A</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/c", ResponseTemplate::new(404), 1).await;

    let crawler = Crawler::new(create_test_config(3)).expect("Failed to create crawler");
    let seed = format!("{}/", base_url);
    let report = crawler
        .run(&seed, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(
        report.visited,
        vec![
            format!("{}/", base_url),
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/c", base_url),
        ]
    );
    assert_eq!(report.stats.fetched, 3);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.active_workers, 0);
}

#[tokio::test]
async fn test_out_of_scope_links_not_fetched() {
    let mock_server = MockServer::start().await;
    let port = mock_server.address().port();

    // Same server under another host name: outside the crawl scope.
    let elsewhere = format!("http://localhost:{}/elsewhere", port);
    mount_page(
        &mock_server,
        "/",
        html(&format!(
            r#"<a href="{}">away</a> <a href="https://example.org/">far</a> <a href="/local">local</a>"#,
            elsewhere
        )),
        1,
    )
    .await;
    mount_page(&mock_server, "/local", html(""), 1).await;
    mount_page(&mock_server, "/elsewhere", html(""), 0).await;

    let report = Crawler::new(create_test_config(2))
        .unwrap()
        .run(&mock_server.uri(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.visited.len(), 2);
    assert_eq!(report.stats.out_of_scope, 2);
}

#[tokio::test]
async fn test_non_html_content_not_followed() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/data.json">data</a>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/data.json",
        ResponseTemplate::new(200)
            .set_body_raw(r#"{"html": "<a href=\"/hidden\">x</a>"}"#, "application/json"),
        1,
    )
    .await;
    mount_page(&mock_server, "/hidden", html(""), 0).await;

    let report = Crawler::new(create_test_config(2))
        .unwrap()
        .run(&mock_server.uri(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.stats.fetched, 2);
    assert_eq!(report.stats.non_html, 1);
}

#[tokio::test]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(html(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = Crawler::new(create_test_config(1))
        .unwrap()
        .run(&mock_server.uri(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.stats.fetched, 1);
    assert_eq!(report.stats.failed, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancellation_aborts_slow_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("slow").set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(create_test_config(4)).unwrap();
    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            token.cancel();
        })
    };

    let started = Instant::now();
    let report = crawler.run(&mock_server.uri(), &token).await.unwrap();
    canceller.await.unwrap();

    assert_eq!(report.stop_reason, StopReason::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(report.stats.fetched, 0);
    assert_eq!(report.stats.failed, 0);
    assert_eq!(report.active_workers, 0);
}

#[tokio::test]
async fn test_deadline_ends_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("slow").set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2);
    config.crawler.max_duration_ms = Some(300);

    let started = Instant::now();
    let report = Crawler::new(config)
        .unwrap()
        .run(&mock_server.uri(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::Deadline);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_crawl_uses_configured_seed() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/start", html(r#"<a href="/next">n</a>"#), 1).await;
    mount_page(&mock_server, "/next", html(""), 1).await;

    let mut config = create_test_config(2);
    config.crawler.seed = Some(format!("{}/start", mock_server.uri()));

    let report = crawl(config, &CancellationToken::new()).await.unwrap();

    assert_eq!(report.seed, format!("{}/start", mock_server.uri()));
    assert_eq!(report.visited.len(), 2);
}

#[tokio::test]
async fn test_malformed_seed_fails_before_fetching() {
    let crawler = Crawler::new(create_test_config(1)).unwrap();

    let result = crawler
        .run("not a url", &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CrawlError::InvalidSeed(_))));
}
