//! Visited-page registry shared by all crawl tasks
//!
//! The registry is the only state mutated by more than one task. It is the
//! sole deduplication mechanism: a page is fetched and expanded if and only if
//! [`VisitedRegistry::register_visit`] returned true for its key.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Concurrency-safe map from normalized page key to visit count
///
/// Every read and write goes through one mutex; the raw map is never handed
/// out, so callers cannot bypass the first-visit contract.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    pages: Mutex<HashMap<String, u32>>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one visit to `key`
    ///
    /// Inserts the key with a count of 1 and returns true on the first visit;
    /// increments the count and returns false on every later visit.
    pub fn register_visit(&self, key: &str) -> bool {
        let mut pages = self.lock();
        match pages.get_mut(key) {
            Some(count) => {
                *count = count.saturating_add(1);
                false
            }
            None => {
                pages.insert(key.to_string(), 1);
                true
            }
        }
    }

    /// Number of distinct keys registered so far
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    /// Visit count for a single key
    pub fn count(&self, key: &str) -> Option<u32> {
        self.lock().get(key).copied()
    }

    /// Point-in-time copy of every key and its count
    pub fn snapshot(&self) -> HashMap<String, u32> {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, u32>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
