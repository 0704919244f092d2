// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Depth-limited: links are followed at most N hops from the seed
// - Concurrent: every discovered link gets its own task
// - Each URL is fetched at most once per crawl, however many pages link to it
// - A failed fetch only prunes its own branch
//
// Submodules:
// - registry: which URLs were claimed, and how their fetch ended
// - event: what the crawl reports while it runs
// - crawler: the visit algorithm and the crawl() entry point
// =============================================================================

mod crawler;
mod event;
mod registry;

pub use crawler::{crawl, crawl_with_cancel, Crawler};
pub use event::{event_channel, CrawlEvent, EventReceiver, EventSender};
pub use registry::{Outcome, RegistryStats, VisitedRegistry};
