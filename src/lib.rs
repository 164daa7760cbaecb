//! Sumi-Census: a same-host link census
//!
//! This crate walks every page reachable from a seed URL on the seed's own host,
//! counting how often each normalized page is referenced, until a page budget is
//! exhausted.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Census operations
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Link extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only errors that end a run; they are raised before any page is
/// visited.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors produced while normalizing a URL
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Malformed URL: {0}")]
    Malformed(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors produced while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {code} for {url}")]
    HttpStatus { url: String, code: u16 },

    #[error("Unsupported content type '{content_type}' for {url}")]
    UnsupportedContentType { url: String, content_type: String },
}

/// Errors produced while extracting links from a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid or empty base URL: '{0}'")]
    InvalidBaseUrl(String),
}

/// Result type alias for Sumi-Census operations
pub type Result<T> = std::result::Result<T, CensusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, CrawlSettings, VisitedRegistry};
pub use output::{CrawlReport, PageCount};
pub use state::TaskOutcome;
pub use crate::url::{normalize_url, page_authority};
