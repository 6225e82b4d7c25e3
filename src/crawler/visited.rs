//! Visited-URL cache
//!
//! Records every URL that has been scheduled during a run. The cache only grows:
//! there is no eviction and no removal, so memory is proportional to the number
//! of distinct URLs on the mirrored site.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Concurrency-safe set of claimed URLs
#[derive(Debug, Default)]
pub struct VisitedCache {
    urls: Mutex<HashSet<String>>,
}

impl VisitedCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks for `url` and inserts it if absent
    ///
    /// Returns true only for the first caller with a given URL; every later call,
    /// from any thread, returns false. Membership test and insertion happen under
    /// the same lock.
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_mirror::crawler::VisitedCache;
    ///
    /// let cache = VisitedCache::new();
    /// assert!(cache.try_claim("https://example.com/"));
    /// assert!(!cache.try_claim("https://example.com/"));
    /// ```
    pub fn try_claim(&self, url: &str) -> bool {
        // A poisoned lock still holds a consistent set: inserts cannot be half-done
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    /// Returns the number of claimed URLs
    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
