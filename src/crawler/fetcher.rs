//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests to fetch page content
//! - Error classification into transport, status, and content-type failures
//!
//! There is no retry: a failed fetch ends only the task that issued it.

use crate::config::{FetchConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Source of page bodies for the crawl engine
///
/// The engine only depends on this seam, so tests can substitute an in-memory
/// site for the network.
pub trait PageFetcher: Send + Sync + 'static {
    /// Fetches `url` and returns its HTML body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`PageFetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(user_agent: &UserAgentConfig, fetch: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, fetch)?,
        })
    }

    /// Wraps an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fetch_html(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetch` - Timeout configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_census::config::{FetchConfig, UserAgentConfig};
/// use sumi_census::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .connect_timeout(Duration::from_secs(fetch.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body if it is an HTML page
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Connection, DNS, timeout, body read | `Transport` |
/// | Any non-2xx status | `HttpStatus` |
/// | Content-Type without `text/html` | `UnsupportedContentType` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            code: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return Err(FetchError::UnsupportedContentType {
            url: url.to_string(),
            content_type,
        });
    }

    response.text().await.map_err(|e| transport_error(url, &e))
}

/// Classifies a reqwest failure as a transport error
fn transport_error(url: &str, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}
