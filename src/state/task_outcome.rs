//! Terminal outcome definitions for crawl tasks
//!
//! A task moves Admitted → HostFiltered → Normalized → Registered → Fetched →
//! Extracted → SpawnedChildren, collapsing to one of these outcomes at the
//! first step that stops it.

use crate::{ExtractError, FetchError, UrlError};
use std::fmt;

/// Represents how a single crawl task ended
#[derive(Debug)]
pub enum TaskOutcome {
    // ===== Stop States =====
    /// The crawl was cancelled before the task did any work
    Cancelled,

    /// The registry already held as many pages as the budget allows
    BudgetExhausted,

    // ===== Filter States =====
    /// The URL points at a host other than the seed's
    OffHost,

    /// The page had already been registered; its count was bumped
    RepeatVisit,

    // ===== Error States =====
    /// The raw URL could not be parsed
    InvalidUrl { message: String },

    /// The URL parsed but could not be normalized
    NormalizeFailed(UrlError),

    /// The page could not be fetched
    FetchFailed(FetchError),

    /// Links could not be extracted from the fetched page
    ExtractFailed(ExtractError),

    // ===== Success State =====
    /// The page was fetched and one child task was spawned per extracted link
    Expanded { children: usize },
}

impl TaskOutcome {
    /// Returns true if the page was fetched and its links followed
    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded { .. })
    }

    /// Returns true if this outcome represents a failure local to the task
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. }
                | Self::NormalizeFailed(_)
                | Self::FetchFailed(_)
                | Self::ExtractFailed(_)
        )
    }

    /// Returns true if the task reached the fetch step
    pub fn attempted_fetch(&self) -> bool {
        matches!(
            self,
            Self::Expanded { .. } | Self::FetchFailed(_) | Self::ExtractFailed(_)
        )
    }

    /// Short stable label for the outcome
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::BudgetExhausted => "budget_exhausted",
            Self::OffHost => "off_host",
            Self::RepeatVisit => "repeat_visit",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::NormalizeFailed(_) => "normalize_failed",
            Self::FetchFailed(_) => "fetch_failed",
            Self::ExtractFailed(_) => "extract_failed",
            Self::Expanded { .. } => "expanded",
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { message } => write!(f, "invalid url: {}", message),
            Self::NormalizeFailed(e) => write!(f, "normalize failed: {}", e),
            Self::FetchFailed(e) => write!(f, "fetch failed: {}", e),
            Self::ExtractFailed(e) => write!(f, "extract failed: {}", e),
            Self::Expanded { children } => write!(f, "expanded into {} links", children),
            other => f.write_str(other.label()),
        }
    }
}
