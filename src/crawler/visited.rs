//! Visited set: the single source of truth for "has this URL been scheduled"
//!
//! Membership test and insertion happen in one step, so two workers can never
//! both see a URL as new. The set only grows during a run.

use dashmap::DashSet;
use std::collections::HashSet;

/// Concurrency-safe set of canonical URL strings
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited and reports whether this call was the first
    ///
    /// Returns `true` exactly once per URL for the lifetime of the set, no
    /// matter how many workers race on it.
    pub fn check_and_mark(&self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        // insert reports "was new" under the shard write lock
        self.urls.insert(url.to_string())
    }

    /// Read-only membership hint
    ///
    /// A `false` here can be stale by the time the caller acts on it; only
    /// [`check_and_mark`](Self::check_and_mark) decides whether a URL is fetched.
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Copies the current contents out of the set
    pub fn snapshot(&self) -> HashSet<String> {
        self.urls.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    #[test]
    fn test_first_mark_wins() {
        let visited = VisitedSet::new();
        assert!(visited.check_and_mark("https://example.com/"));
        assert!(!visited.check_and_mark("https://example.com/"));
        assert!(!visited.check_and_mark("https://example.com/"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_byte_equality_only() {
        let visited = VisitedSet::new();
        assert!(visited.check_and_mark("https://example.com/a"));
        assert!(visited.check_and_mark("https://example.com/a/"));
        assert!(visited.check_and_mark("https://example.com/a#top"));
        assert_eq!(visited.len(), 3);
    }

    #[test]
    fn test_contains_is_read_only() {
        let visited = VisitedSet::new();
        assert!(!visited.contains("https://example.com/"));
        assert!(visited.is_empty());
        assert!(visited.check_and_mark("https://example.com/"));
        assert!(visited.contains("https://example.com/"));
    }

    #[test]
    fn test_snapshot() {
        let visited = VisitedSet::new();
        visited.check_and_mark("https://example.com/1");
        visited.check_and_mark("https://example.com/2");

        let snapshot = visited.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains("https://example.com/1"));
        assert!(snapshot.contains("https://example.com/2"));
    }

    #[test]
    fn test_concurrent_marks_single_winner() {
        const THREADS: usize = 32;

        for round in 0..20 {
            let visited = Arc::new(VisitedSet::new());
            let barrier = Arc::new(Barrier::new(THREADS));
            let winners = Arc::new(AtomicUsize::new(0));
            let url = format!("https://example.com/race/{}", round);

            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let visited = Arc::clone(&visited);
                    let barrier = Arc::clone(&barrier);
                    let winners = Arc::clone(&winners);
                    let url = url.clone();
                    std::thread::spawn(move || {
                        barrier.wait();
                        if visited.check_and_mark(&url) {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(winners.load(Ordering::SeqCst), 1);
            assert_eq!(visited.len(), 1);
        }
    }
}
