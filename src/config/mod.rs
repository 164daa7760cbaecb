//! Configuration module for Sumi-Census
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every field has a default, so a crawl can run from the
//! command line alone.
//!
//! # Example
//!
//! ```no_run
//! use sumi_census::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("census.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_seed_url};
