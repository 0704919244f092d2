// src/fetch/mod.rs
// =============================================================================
// This module is everything the crawler needs to turn a URL into a list of
// links.
//
// Submodules:
// - error: FetchError, the ways a fetch can fail
// - http: HttpFetcher, the reqwest-backed implementation
// - links: link extraction from a page body (regex or HTML)
//
// The crawler only ever sees the Fetcher trait, so tests can swap in a
// fake that serves pages from memory.
// =============================================================================

mod error;
mod http;
mod links;

use async_trait::async_trait;

pub use error::FetchError;
pub use http::{FetchConfig, HttpFetcher};
pub use links::{extract_links, ExtractMode};

/// Turns a URL into the links found on that page.
///
/// Implementations hold no crawl state. The crawler guarantees `fetch` is
/// called at most once per URL in a run, so implementations don't need to
/// deduplicate. The returned links keep the order they appear in the page
/// and may contain duplicates.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError>;
}
