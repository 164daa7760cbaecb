//! URL handling module for Sumi-Census
//!
//! This module provides URL normalization and the host/authority helpers used
//! to keep a crawl on its seed's host.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{is_same_host, page_authority};
pub use normalize::normalize_url;
