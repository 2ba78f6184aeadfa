use super::{CrawlError, Page};
use crate::config::FetchConfig;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Performs exactly one GET per call, bounded by a total timeout and a body size cap.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: u64,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
            max_bytes: config.max_bytes,
        })
    }

    /// Validate `input` and fetch it, returning the body decoded as text.
    ///
    /// The body is decoded with the charset declared in `Content-Type`,
    /// falling back to UTF-8. Non-2xx responses are errors.
    pub async fn fetch(&self, input: &str) -> Result<Page, CrawlError> {
        let url = parse_url(input)?;
        debug!(url = %url, "Fetching page");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Page returned non-success status");
            return Err(CrawlError::Http {
                status: status.as_u16(),
            });
        }

        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            warn!(url = %url, limit = self.max_bytes, "Declared body exceeds limit");
            return Err(CrawlError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let final_url = response.url().clone();
        let encoding = declared_encoding(response.headers());

        // Read chunk by chunk so an endless body stops at the cap, not at the timeout.
        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.classify(&url, e))?
        {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                warn!(url = %url, limit = self.max_bytes, "Body exceeds limit");
                return Err(CrawlError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        let (body, _, _) = encoding.decode(&bytes);
        debug!(url = %final_url, bytes = bytes.len(), encoding = encoding.name(), "Fetched page");

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            body: body.into_owned(),
        })
    }

    fn classify(&self, url: &Url, err: reqwest::Error) -> CrawlError {
        if err.is_timeout() {
            warn!(url = %url, "Fetch timed out");
            return CrawlError::Timeout(self.timeout);
        }
        let cause = root_cause(&err);
        warn!(url = %url, error = %cause, "Fetch failed");
        CrawlError::Network(cause)
    }
}

/// Encoding named by the `charset` parameter of `Content-Type`, or UTF-8.
fn declared_encoding(headers: &HeaderMap) -> &'static Encoding {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value.split(';').skip(1).find_map(|param| {
                let (name, label) = param.split_once('=')?;
                name.trim()
                    .eq_ignore_ascii_case("charset")
                    .then(|| label.trim().trim_matches('"'))
            })
        })
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Parse chat input into an absolute http(s) URL.
///
/// Surrounding whitespace and a `<...>` wrapper (Discord's link-preview
/// suppression) are removed first.
pub fn parse_url(input: &str) -> Result<Url, CrawlError> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(trimmed);

    let invalid = |reason: String| CrawlError::InvalidUrl {
        input: input.to_string(),
        reason,
    };

    if trimmed.contains(char::is_whitespace) {
        return Err(invalid("URLs cannot contain spaces".into()));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".into()));
    }
    Ok(url)
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}

// reqwest's Display stops at "error sending request"; the useful part
// (DNS, refused, TLS) is at the bottom of the source chain.
fn root_cause(err: &reqwest::Error) -> String {
    let mut cause: &dyn StdError = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(
            parse_url("https://example.com/a?b=c").unwrap().as_str(),
            "https://example.com/a?b=c"
        );
        assert_eq!(
            parse_url("  http://example.com  ").unwrap().as_str(),
            "http://example.com/"
        );
    }

    #[test]
    fn strips_embed_suppression_brackets() {
        assert_eq!(
            parse_url("<https://example.com/page>").unwrap().as_str(),
            "https://example.com/page"
        );
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "example.com", "not a url", "http://", "https://exa mple.com"] {
            let err = parse_url(input).unwrap_err();
            assert!(
                matches!(err, CrawlError::InvalidUrl { .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_other_schemes() {
        for input in ["ftp://example.com/file", "file:///etc/passwd", "javascript:alert(1)"] {
            let err = parse_url(input).unwrap_err();
            assert!(matches!(err, CrawlError::InvalidUrl { ref reason, .. } if reason.contains("scheme")));
        }
    }

    #[test]
    fn trailing_words_are_not_part_of_the_url() {
        let err = parse_url("https://example.com/page please").unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl { ref reason, .. } if reason.contains("spaces")));
    }

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn charset_comes_from_content_type() {
        assert_eq!(
            declared_encoding(&headers_with("text/html; charset=windows-1252")).name(),
            "windows-1252"
        );
        assert_eq!(
            declared_encoding(&headers_with("text/html;Charset=\"ISO-8859-1\"")).name(),
            "windows-1252"
        );
        assert_eq!(
            declared_encoding(&headers_with("text/html; charset=shift_jis")).name(),
            "Shift_JIS"
        );
    }

    #[test]
    fn unknown_or_missing_charset_falls_back_to_utf8() {
        assert_eq!(declared_encoding(&HeaderMap::new()), UTF_8);
        assert_eq!(declared_encoding(&headers_with("text/html")), UTF_8);
        assert_eq!(declared_encoding(&headers_with("text/html; charset=bogus")), UTF_8);
    }

    #[test]
    fn builds_with_default_config() {
        assert!(Fetcher::new(&FetchConfig::default()).is_ok());
    }
}
