// src/crawl/crawler.rs
// =============================================================================
// This module implements the concurrent, depth-limited crawl.
//
// How a visit works:
// 1. Report the URL as found (always, even if nothing else happens)
// 2. Stop if no depth is left
// 3. Claim the URL in the registry; stop if someone already claimed it
// 4. Fetch the page (no lock held)
// 5. Record success or failure in the registry
// 6. On failure, stop: that branch is pruned
// 7. Spawn one task per link, with one less depth
// 8. Wait for all of those tasks before returning
//
// Because of step 8, when the top-level visit returns the whole crawl is
// done. No task outlives it.
//
// Rust concepts:
// - Arc<Self>: each spawned task needs its own handle to the crawler
// - BoxFuture: an async fn can't call itself directly, its future type would
//   be infinitely large. Boxing the future gives it a fixed size.
// - JoinSet: a group of spawned tasks we can wait on together
// =============================================================================

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::{CrawlEvent, EventSender, Outcome, VisitedRegistry};
use crate::fetch::{FetchError, Fetcher};

/// Runs visits for one crawl and owns that crawl's registry.
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    registry: VisitedRegistry,
    events: Option<EventSender>,
    cancel: CancellationToken,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            registry: VisitedRegistry::new(),
            events: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Sends crawl events to `events`.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Stops fetching and fanning out once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn registry(&self) -> &VisitedRegistry {
        &self.registry
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver just means nobody is listening anymore
            let _ = events.send(event);
        }
    }

    /// Visits `url` with `depth` hops left, then everything it links to.
    ///
    /// The returned future completes only after every task spawned for this
    /// URL's links has completed.
    pub fn visit(self: Arc<Self>, url: String, depth: usize) -> BoxFuture<'static, ()> {
        async move {
            // Step 1: always report, even for repeats and depth-0 visits
            self.emit(CrawlEvent::Found {
                url: url.clone(),
                depth,
            });

            // Step 2: out of hops, so report only
            if depth == 0 {
                trace!(url = %url, "depth exhausted");
                return;
            }

            if self.cancel.is_cancelled() {
                trace!(url = %url, "crawl cancelled, not claiming");
                return;
            }

            // Step 3: claim before any I/O. If two branches find the same URL
            // at once, only one of them gets past this line.
            if !self.registry.claim(&url) {
                trace!(url = %url, "already claimed");
                return;
            }

            // Step 4: fetch with no lock held. `biased` polls the cancel
            // branch first, so the fetch is never polled after cancellation.
            debug!(url = %url, depth, "fetching");
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(FetchError::Cancelled(url.clone())),
                result = self.fetcher.fetch(&url) => result,
            };

            // Steps 5 and 6: record the outcome; a failure ends this branch
            // here and is never passed up to the parent
            let links = match result {
                Ok(links) => {
                    self.registry.record(&url, Outcome::Success { links: links.len() });
                    self.emit(CrawlEvent::Fetched {
                        url: url.clone(),
                        links: links.len(),
                    });
                    links
                }
                Err(e) => {
                    warn!(url = %url, error = %e, timeout = e.is_timeout(), "fetch failed");
                    self.registry.record(&url, Outcome::Failed(e.to_string()));
                    self.emit(CrawlEvent::Failed {
                        url,
                        error: e.to_string(),
                    });
                    return;
                }
            };

            if self.cancel.is_cancelled() {
                return;
            }

            // Step 7: one task per link, duplicates included. The registry
            // sorts out which of them actually fetch.
            let mut children = JoinSet::new();
            for link in links {
                children.spawn(Arc::clone(&self).visit(link, depth - 1));
            }

            // Step 8: wait for every child. A panicked child counts as done.
            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    warn!(parent = %url, error = %e, "child visit panicked");
                }
            }
        }
        .boxed()
    }
}

/// Crawls from `seed`, following links up to `max_depth` hops.
///
/// Returns once everything reachable within the depth limit has been
/// visited. Failed fetches only prune their own branch, so this can't fail.
pub async fn crawl(
    seed: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
    events: Option<EventSender>,
) {
    crawl_with_cancel(seed, max_depth, fetcher, events, CancellationToken::new()).await
}

/// Like [`crawl`], but stops early when `cancel` fires.
pub async fn crawl_with_cancel(
    seed: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
    events: Option<EventSender>,
    cancel: CancellationToken,
) {
    let mut crawler = Crawler::new(fetcher).with_cancel(cancel);
    if let Some(events) = events {
        crawler = crawler.with_events(events);
    }
    let crawler = Arc::new(crawler);

    info!(seed = %seed, max_depth, "crawl started");
    Arc::clone(&crawler).visit(seed.to_string(), max_depth).await;

    let stats = crawler.registry().stats();
    info!(
        fetched = stats.succeeded,
        failed = stats.failed,
        "crawl finished"
    );
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does visit take `self: Arc<Self>`?
//    - tokio::spawn needs a future that owns everything it uses ('static)
//    - A plain &self borrow can't outlive the caller, but an Arc can
//    - Arc::clone only bumps a reference count, it doesn't copy the crawler
//
// 2. Why BoxFuture instead of `async fn visit`?
//    - An async fn's future contains the futures of everything it awaits
//    - A recursive async fn would contain itself, which has no finite size
//    - .boxed() puts the future on the heap behind a pointer of known size
//
// 3. What is JoinSet?
//    - A collection of spawned tasks
//    - join_next() returns each task's result as it finishes
//    - Returns None once every task has been joined, which ends our loop
//
// 4. What does tokio::select! do?
//    - Polls several futures and runs the branch of the first one to finish
//    - The other futures are dropped (here: the fetch is abandoned)
//
// 5. Why `let _ = events.send(...)`?
//    - send() fails only if the receiver was dropped
//    - Nobody listening is not a reason to stop crawling
// -----------------------------------------------------------------------------
