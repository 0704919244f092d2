// src/crawl/registry.rs
// =============================================================================
// The visited registry: which URLs have been claimed for fetching in this
// crawl, and how each fetch ended.
//
// Every URL moves through:
//
//     absent -> InProgress -> Success | Failed
//
// Success and Failed are final. Entries are never removed; the whole
// registry is dropped when the crawl ends.
//
// One Mutex guards the whole map. It is only ever held for a lookup or an
// insert, never across an .await, so slow fetches don't block other tasks.
//
// Rust concepts:
// - std::sync::Mutex: fine in async code as long as the guard never lives
//   across an .await
// - HashMap::entry: check-and-insert in one step
// =============================================================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Where a URL is in its fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Claimed by a visit; the fetch hasn't finished yet
    InProgress,
    /// Fetched; `links` is how many links the page had
    Success { links: usize },
    /// The fetch failed with this error message
    Failed(String),
}

impl Outcome {
    /// True for Success and Failed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Counts of entries by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub in_progress: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Shared record of claimed URLs for one crawl run.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    entries: Mutex<HashMap<String, Outcome>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic in another task while holding the lock leaves the map itself
    // intact (every update is a single insert), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Outcome>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `url` for fetching.
    ///
    /// Returns `true` if this call inserted the InProgress marker, and
    /// `false` if the URL already had an entry. The check and the insert
    /// happen under one lock, so exactly one of any number of concurrent
    /// callers for the same URL gets `true`.
    pub fn claim(&self, url: &str) -> bool {
        match self.lock().entry(url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Outcome::InProgress);
                true
            }
        }
    }

    /// Stores the final outcome of a claimed URL.
    ///
    /// Only InProgress entries can be finished. Recording for an unclaimed
    /// or already finished URL is ignored and returns `false`.
    pub fn record(&self, url: &str, outcome: Outcome) -> bool {
        let mut entries = self.lock();
        match entries.get_mut(url) {
            Some(current) if *current == Outcome::InProgress && outcome.is_terminal() => {
                *current = outcome;
                true
            }
            current => {
                warn!(url = %url, current = ?current, new = ?outcome, "ignoring invalid registry transition");
                false
            }
        }
    }

    /// The current outcome for `url`, if it was ever claimed.
    pub fn outcome(&self, url: &str) -> Option<Outcome> {
        self.lock().get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        self.lock()
            .values()
            .fold(RegistryStats::default(), |mut stats, outcome| {
                match outcome {
                    Outcome::InProgress => stats.in_progress += 1,
                    Outcome::Success { .. } => stats.succeeded += 1,
                    Outcome::Failed(_) => stats.failed += 1,
                }
                stats
            })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Mutex and not a RwLock?
//    - Almost every access (claim, record) writes
//    - A RwLock would add overhead without letting more readers through
//
// 2. Why is claim() one lock instead of "contains" then "insert"?
//    - Between two separate lock calls another task could claim the URL
//    - Both tasks would then see "not present" and fetch the same page
//    - entry() does the lookup and the insert under the same guard
//
// 3. What is lock poisoning?
//    - If a thread panics while holding a std Mutex, the Mutex is "poisoned"
//    - lock() then returns Err so callers can decide whether data is safe
//    - into_inner() on the error gives us the guard anyway
//
// 4. What does fold() do in stats()?
//    - Walks every value, carrying an accumulator (the counts) along
//    - Like reduce() in JavaScript
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_claim_once() {
        let registry = VisitedRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.claim("https://example.com"));
        assert!(!registry.claim("https://example.com"));
        assert_eq!(registry.outcome("https://example.com"), Some(Outcome::InProgress));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_claim_after_finish_is_refused() {
        let registry = VisitedRegistry::new();
        assert!(registry.claim("a"));
        assert!(registry.record("a", Outcome::Success { links: 3 }));
        assert!(!registry.claim("a"));
        assert_eq!(registry.outcome("a"), Some(Outcome::Success { links: 3 }));
    }

    #[test]
    fn test_terminal_outcome_is_final() {
        let registry = VisitedRegistry::new();
        registry.claim("a");
        assert!(registry.record("a", Outcome::Failed("boom".to_string())));
        assert!(!registry.record("a", Outcome::Success { links: 1 }));
        assert!(!registry.record("a", Outcome::InProgress));
        assert_eq!(registry.outcome("a"), Some(Outcome::Failed("boom".to_string())));
    }

    #[test]
    fn test_record_without_claim_is_refused() {
        let registry = VisitedRegistry::new();
        assert!(!registry.record("never-claimed", Outcome::Success { links: 0 }));
        assert_eq!(registry.outcome("never-claimed"), None);
    }

    #[test]
    fn test_stats() {
        let registry = VisitedRegistry::new();
        for url in ["a", "b", "c", "d"] {
            registry.claim(url);
        }
        registry.record("a", Outcome::Success { links: 2 });
        registry.record("b", Outcome::Success { links: 0 });
        registry.record("c", Outcome::Failed("HTTP 500".to_string()));

        assert_eq!(
            registry.stats(),
            RegistryStats {
                in_progress: 1,
                succeeded: 2,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let registry = Arc::new(VisitedRegistry::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.claim("https://contested.example"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }
}
