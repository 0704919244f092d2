// src/lib.rs
// =============================================================================
// link-crawler as a library.
//
// Modules:
// - fetch: the Fetcher trait and the HTTP implementation
// - crawl: the concurrent, depth-limited crawl
//
// Example:
//   let fetcher = Arc::new(HttpFetcher::new(&FetchConfig::default())?);
//   let (tx, mut rx) = event_channel();
//   crawl("https://example.com", 2, fetcher, Some(tx)).await;
//   while let Some(event) = rx.recv().await { ... }
// =============================================================================

pub mod crawl;
pub mod fetch;
