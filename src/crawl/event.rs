// src/crawl/event.rs
// =============================================================================
// Events the crawler reports while it runs.
//
// The crawl has no return value. What it found is reported as a stream of
// events on a channel, in whatever order concurrent branches produce them.
//
// #[serde(tag = "event")] turns
//     CrawlEvent::Found { url: "https://a", depth: 1 }
// into
//     {"event":"found","url":"https://a","depth":1}
// =============================================================================

use serde::Serialize;
use tokio::sync::mpsc;

/// Something that happened during a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// A visit reached this URL. Sent for every visit, including ones that
    /// end up skipped because the URL was already claimed or no depth is left.
    Found {
        url: String,
        /// Remaining depth at this visit
        depth: usize,
    },
    /// The page was fetched and had this many links
    Fetched { url: String, links: usize },
    /// The fetch failed; nothing below this URL is crawled
    Failed { url: String, error: String },
}

impl CrawlEvent {
    pub fn url(&self) -> &str {
        match self {
            CrawlEvent::Found { url, .. }
            | CrawlEvent::Fetched { url, .. }
            | CrawlEvent::Failed { url, .. } => url,
        }
    }
}

/// Sending half of the event stream.
pub type EventSender = mpsc::UnboundedSender<CrawlEvent>;

/// Receiving half of the event stream.
pub type EventReceiver = mpsc::UnboundedReceiver<CrawlEvent>;

/// Creates a new event stream.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an unbounded channel?
//    - send() on an unbounded channel never waits
//    - A slow printer can't stall the crawl (the events just queue up)
//
// 2. When does the receiver stop?
//    - recv() returns None once every sender has been dropped
//    - Each running visit holds the crawler, and the crawler holds a sender,
//      so the stream ends exactly when the last visit finishes
//
// 3. What does the `|` in the url() match do?
//    - It matches several variants in one arm
//    - Each variant must bind the same names with the same types
// -----------------------------------------------------------------------------
