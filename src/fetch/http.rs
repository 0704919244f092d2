// src/fetch/http.rs
// =============================================================================
// The real fetcher: downloads a page over HTTP and extracts its links.
//
// Steps for one URL:
// 1. GET the URL (one attempt, no retries)
// 2. Treat any non-2xx status as a failure
// 3. Read the whole body as text
// 4. Extract links with the configured mode
//
// The reqwest Client is built once and shared. It keeps a connection pool,
// so concurrent fetches to the same host reuse connections.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, trace};

use super::{extract_links, ExtractMode, FetchError, Fetcher};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`HttpFetcher`], filled in from the command line.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout for the whole request, body included
    pub timeout: Duration,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// How links are found in a body
    pub mode: ExtractMode,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            mode: ExtractMode::default(),
        }
    }
}

/// Fetches pages with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    mode: ExtractMode,
}

impl HttpFetcher {
    /// Builds the HTTP client. Fails only if the TLS backend can't be set up.
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            mode: config.mode,
        })
    }

    // GET + status check + body read, without link extraction
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError> {
        trace!(url = %url, "GET");
        let body = self.fetch_body(url).await?;

        let links = extract_links(&body, url, self.mode);
        debug!(url = %url, bytes = body.len(), links = links.len(), "page fetched");

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Serves `response` verbatim to every connection and returns the base URL
    async fn serve(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/", addr)
    }

    fn fetcher(mode: ExtractMode) -> HttpFetcher {
        let config = FetchConfig {
            timeout: Duration::from_secs(5),
            mode,
            ..FetchConfig::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_extracts_text_links() {
        let url = serve(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 45\r\nConnection: close\r\n\r\nsee https://a.example/ and https://b.example/",
        )
        .await;

        let links = fetcher(ExtractMode::Text).fetch(&url).await.unwrap();
        assert_eq!(links, vec!["https://a.example/", "https://b.example/"]);
    }

    #[tokio::test]
    async fn test_fetch_extracts_html_links() {
        let url = serve(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 26\r\nConnection: close\r\n\r\n<a href=\"/next\">next</a>\r\n",
        )
        .await;

        let links = fetcher(ExtractMode::Html).fetch(&url).await.unwrap();
        assert_eq!(links, vec![format!("{}next", url)]);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let url = serve("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;

        let err = fetcher(ExtractMode::Text).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop a listener so nothing is listening on the port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher(ExtractMode::Text)
            .fetch(&format!("http://{}/", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("link-crawler/"));
        assert_eq!(config.mode, ExtractMode::Text);
    }
}
