//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use sumi_census::config::{parse_config, Config, CrawlerConfig};
use sumi_census::crawler::{
    build_http_client, crawl, fetch_html, http_crawler, CrawlSettings, Crawler, HtmlLinkExtractor,
    HttpFetcher,
};
use sumi_census::output::{format_report, generate_markdown_report};
use sumi_census::FetchError;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given limits
fn create_test_config(max_concurrency: usize, max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler = CrawlerConfig {
        max_concurrency,
        max_pages,
    };
    config.fetch.timeout_secs = 5;
    config
}

/// Returns the page key prefix for the mock server, e.g. "127.0.0.1:43121"
fn authority(mock_server: &MockServer) -> String {
    let url = Url::parse(&mock_server.uri()).expect("Failed to parse base URL");
    format!(
        "{}:{}",
        url.host_str().expect("Failed to extract host"),
        url.port().expect("Mock server has no port")
    )
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(mock_server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .expect(1)
        .mount(mock_server)
        .await;
}

fn seed(mock_server: &MockServer) -> Url {
    Url::parse(&format!("{}/", mock_server.uri())).expect("Failed to parse seed")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let host = authority(&mock_server);

    // Each page must be fetched exactly once, however many links point at it
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">Page 1</a>
           <a href="/page2">Page 2</a>
           <a href="/page2#footer">Page 2 again</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", r#"<a href="/">Home</a>"#).await;
    mount_page(&mock_server, "/page2", r#"<a href="/page1">Page 1</a>"#).await;

    let config = create_test_config(5, 10);
    let report = crawl(&config, seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.total_pages(), 3);
    assert_eq!(report.count_for(&format!("{}/", host)), Some(2));
    assert_eq!(report.count_for(&format!("{}/page1", host)), Some(2));
    assert_eq!(report.count_for(&format!("{}/page2", host)), Some(2));
    assert_eq!(report.statistics.pages_fetched, 3);

    let text = format_report(&report);
    assert!(text.contains(&format!("Found 2 internal links to {}/page1", host)));
}

#[tokio::test]
async fn test_off_host_links_not_requested() {
    let mock_server = MockServer::start().await;
    let port = Url::parse(&mock_server.uri()).unwrap().port().unwrap();

    // "localhost" is a different host from "127.0.0.1" even though it would
    // reach the same server
    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="http://localhost:{}/external">External</a>
               <a href="https://example.org/">Elsewhere</a>"#,
            port
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/external"))
        .respond_with(html_page("should never be fetched"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(2, 10);
    let report = crawl(&config, seed(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.total_pages(), 1);
    assert_eq!(report.statistics.off_host, 2);
}

#[tokio::test]
async fn test_non_html_page_not_expanded() {
    let mock_server = MockServer::start().await;
    let host = authority(&mock_server);

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/document.pdf">PDF Document</a><a href="/missing">Gone</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/document.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x25, 0x50, 0x44, 0x46], "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(3, 10);
    let report = crawl(&config, seed(&mock_server))
        .await
        .expect("Crawl failed");

    // Both pages were registered before their fetch failed
    assert_eq!(report.count_for(&format!("{}/document.pdf", host)), Some(1));
    assert_eq!(report.count_for(&format!("{}/missing", host)), Some(1));
    assert_eq!(report.statistics.fetch_errors, 2);
    assert_eq!(report.statistics.pages_expanded, 1);
}

#[tokio::test]
async fn test_page_budget_with_serial_admission() {
    let mock_server = MockServer::start().await;

    let links: String = (1..=6)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&links))
        .mount(&mock_server)
        .await;

    for i in 1..=6 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(html_page("leaf"))
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(1, 3);
    let report = crawl(&config, seed(&mock_server))
        .await
        .expect("Crawl failed");

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording is disabled");
    assert_eq!(requests.len(), 3);
    assert_eq!(report.total_pages(), 3);
    assert_eq!(report.statistics.budget_stops, 4);
}

#[tokio::test]
async fn test_crawler_with_custom_client() {
    let mock_server = MockServer::start().await;
    let host = authority(&mock_server);

    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", "").await;

    let config = create_test_config(2, 10);
    let client = build_http_client(&config.user_agent, &config.fetch).unwrap();
    let crawler = Crawler::new(
        seed(&mock_server),
        CrawlSettings::from(&config.crawler),
        HttpFetcher::from_client(client),
        HtmlLinkExtractor,
    );

    let report = crawler.run().await;

    assert_eq!(report.count_for(&format!("{}/a", host)), Some(1));
    assert_eq!(crawler.registry().size(), 2);

    let dir = tempfile::tempdir().unwrap();
    let md_path = dir.path().join("census.md");
    generate_markdown_report(&report, &md_path).unwrap();
    let markdown = std::fs::read_to_string(&md_path).unwrap();
    assert!(markdown.contains(&format!("| {}/a | 1 |", host)));
}

#[tokio::test]
async fn test_http_crawler_from_config() {
    let mock_server = MockServer::start().await;
    let host = authority(&mock_server);

    mount_page(&mock_server, "/", r#"<a href="/a">A</a><a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", "").await;

    let config = create_test_config(200, 10);
    let crawler = http_crawler(&config, seed(&mock_server)).expect("Failed to build crawler");
    assert_eq!(crawler.seed(), &seed(&mock_server));

    let report = crawler.run().await;

    assert_eq!(report.count_for(&format!("{}/a", host)), Some(2));
    assert_eq!(report.statistics.pages_fetched, 2);
}

#[tokio::test]
async fn test_fetch_html_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(1, 1);
    let client = build_http_client(&config.user_agent, &config.fetch).unwrap();
    let result = fetch_html(&client, &format!("{}/broken", mock_server.uri())).await;

    assert!(matches!(
        result,
        Err(FetchError::HttpStatus { code: 500, .. })
    ));
}

#[tokio::test]
async fn test_fetch_html_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<p>hi</p>", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(1, 1);
    let client = build_http_client(&config.user_agent, &config.fetch).unwrap();

    let json = fetch_html(&client, &format!("{}/data.json", mock_server.uri())).await;
    assert!(matches!(
        json,
        Err(FetchError::UnsupportedContentType { .. })
    ));

    let page = fetch_html(&client, &format!("{}/page", mock_server.uri()))
        .await
        .expect("HTML page should be fetched");
    assert_eq!(page, "<p>hi</p>");
}

#[tokio::test]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::header(
            "user-agent",
            "CensusBot/0.1 (+https://example.com/bot)",
        ))
        .respond_with(html_page(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = parse_config(
        r#"
[user-agent]
crawler-name = "CensusBot"
crawler-version = "0.1"
contact-url = "https://example.com/bot"
"#,
    )
    .unwrap();

    let report = crawl(&config, seed(&mock_server))
        .await
        .expect("Crawl failed");
    assert_eq!(report.statistics.pages_expanded, 1);
}
