//! HTML parser for extracting links
//!
//! Links are returned as a sequence, not a set: duplicates and self-references
//! are kept in document order because every occurrence counts as a reference.

use crate::ExtractError;
use scraper::{Html, Selector};
use url::Url;

/// Turns an HTML document into the absolute links it references
pub trait LinkExtractor: Send + Sync + 'static {
    /// Extracts absolute link URLs from `html`, resolving against `base_url`
    fn extract_links(&self, html: &str, base_url: &str) -> Result<Vec<String>, ExtractError>;
}

/// [`LinkExtractor`] that reads `<a href>` elements with `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, html: &str, base_url: &str) -> Result<Vec<String>, ExtractError> {
        extract_links(html, base_url)
    }
}

/// Extracts every anchor link from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - every `<a href="...">`, resolved against `base_url`
/// - duplicates, self-references (`href=""`, `href="."`) and fragments, verbatim
///
/// **Skip (with a warning):**
/// - hrefs whose scheme is neither `http` nor `https` (`mailto:`, `javascript:`, ...)
/// - hrefs that cannot be resolved to a URL
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Absolute URLs in document order
/// * `Err(ExtractError::InvalidBaseUrl)` - `base_url` is empty, unparsable, or not http(s)
///
/// # Example
///
/// ```
/// use sumi_census::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/page">Link</a><a href="/page">Again</a></body></html>"#;
/// let links = extract_links(html, "https://example.com/").unwrap();
/// assert_eq!(links, vec!["https://example.com/page", "https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &str) -> Result<Vec<String>, ExtractError> {
    let base = parse_base_url(base_url)?;
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, &base) {
                    links.push(absolute_url);
                }
            }
        }
    }

    Ok(links)
}

/// Parses and checks the base URL used for resolution
fn parse_base_url(base_url: &str) -> Result<Url, ExtractError> {
    if base_url.is_empty() {
        return Err(ExtractError::InvalidBaseUrl(base_url.to_string()));
    }

    let base =
        Url::parse(base_url).map_err(|_| ExtractError::InvalidBaseUrl(base_url.to_string()))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ExtractError::InvalidBaseUrl(base_url.to_string()));
    }

    Ok(base)
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the href is malformed or resolves to a non-HTTP(S) URL.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                tracing::warn!(
                    "Skipping href with unsupported scheme '{}': {}",
                    absolute_url.scheme(),
                    href
                );
                None
            }
        }
        Err(e) => {
            tracing::warn!("Error parsing href '{}': {}", href, e);
            None
        }
    }
}
