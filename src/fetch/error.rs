// src/fetch/error.rs
// =============================================================================
// Errors a fetcher can report for a single page.
//
// A FetchError never stops a crawl. The crawler records it against the URL
// and stops following links from that page, nothing more.
//
// Rust concepts:
// - thiserror: derive Display and Error for an enum
// - #[from]: automatic conversion so `?` works on reqwest errors
// =============================================================================

use thiserror::Error;

/// Why fetching a page failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or no response arrived (DNS, TLS, timeout...)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response started but the body could not be read
    #[error("reading body of {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The crawl was cancelled while this page was in flight
    #[error("fetch of {0} cancelled")]
    Cancelled(String),

    /// Anything else (used by non-HTTP fetchers)
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// True when the error came from a timeout on the HTTP client.
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Request { source, .. } | FetchError::Body { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.com/missing returned HTTP 404");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_cancelled_message() {
        let err = FetchError::Cancelled("https://example.com".to_string());
        assert_eq!(err.to_string(), "fetch of https://example.com cancelled");
    }
}
