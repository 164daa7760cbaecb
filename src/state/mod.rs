//! State module for tracking crawl task progress
//!
//! Every crawl task walks the same short pipeline and ends in exactly one
//! terminal [`TaskOutcome`]. The engine returns the outcome instead of logging
//! inline, so the control flow can be tested without capturing log output.

mod task_outcome;

// Re-export main types
pub use task_outcome::TaskOutcome;
