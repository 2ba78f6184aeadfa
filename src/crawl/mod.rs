//! Single-page fetching and HTML extraction.
//!
//! Nothing here holds state between calls: a [`Fetcher`] owns only an HTTP
//! client and its limits, and the extractors are plain functions over a body.

pub mod extract;
pub mod fetch;

pub use extract::{extract_links, extract_text, extract_title};
pub use fetch::{parse_url, Fetcher};

use std::time::Duration;
use url::Url;

/// A fetched page, consumed by the extractors and then dropped.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: Url,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrawlError {
    #[error("invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with HTTP {status}")]
    Http { status: u16 },

    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("failed to process page: {0}")]
    Extraction(String),
}

/// Fetch `input` and run `extract` over the page on the blocking pool.
///
/// Parsing a large document is CPU-bound, so it stays off the async workers
/// that serve the gateway and other commands.
pub async fn crawl_with<T, F>(fetcher: &Fetcher, input: &str, extract: F) -> Result<T, CrawlError>
where
    F: FnOnce(Page) -> T + Send + 'static,
    T: Send + 'static,
{
    let page = fetcher.fetch(input).await?;
    tokio::task::spawn_blocking(move || extract(page))
        .await
        .map_err(|e| CrawlError::Extraction(e.to_string()))
}

impl CrawlError {
    /// Short text suitable for a chat reply.
    pub fn user_message(&self) -> String {
        match self {
            CrawlError::InvalidUrl { reason, .. } => {
                format!("Invalid URL ({reason}). Use a full http:// or https:// address.")
            }
            CrawlError::Timeout(after) => {
                format!("The page took longer than {}s to respond.", after.as_secs_f32())
            }
            CrawlError::Network(cause) => format!("Could not reach the page: {cause}"),
            CrawlError::Http { status } => format!("The server responded with HTTP {status}."),
            CrawlError::TooLarge { limit } => {
                format!("The page is larger than the {limit} byte limit.")
            }
            CrawlError::Extraction(_) => "The page could not be processed.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_name_the_failure_kind() {
        let invalid = CrawlError::InvalidUrl {
            input: "nope".into(),
            reason: "relative URL without a base".into(),
        };
        assert!(invalid.user_message().starts_with("Invalid URL"));
        assert_eq!(
            CrawlError::Timeout(Duration::from_secs(10)).user_message(),
            "The page took longer than 10s to respond."
        );
        assert_eq!(
            CrawlError::Http { status: 404 }.user_message(),
            "The server responded with HTTP 404."
        );
        assert!(CrawlError::Network("connection refused".into())
            .user_message()
            .contains("connection refused"));
    }
}
