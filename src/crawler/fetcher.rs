//! HTTP fetcher implementation
//!
//! One GET per call, with the three failure classes the rest of the engine
//! distinguishes: transport errors, non-2xx statuses, and disallowed
//! content types. All three are per-URL and non-fatal to the worker that
//! hit them.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failure classes for a single fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure: refused, timed out, TLS, DNS.
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status outside the 2xx range.
    #[error("received status {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// The response carried a content type the crawler does not parse.
    #[error("content-type {content_type:?} of {url} is not crawlable")]
    ContentType { url: String, content_type: String },
}

/// Builds the HTTP client shared by all workers.
///
/// # Arguments
///
/// * `user_agent` - User agent string sent with every request
/// * `timeout` - Overall per-request timeout
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the page at `url` and returns its body.
///
/// Succeeds only for 2xx responses whose content type is crawlable
/// (see [`is_valid_content_type`]); every other outcome maps to a
/// [`FetchError`] variant.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
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

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_valid_content_type(&content_type) {
        return Err(FetchError::ContentType {
            url: url.to_string(),
            content_type,
        });
    }

    response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })
}

/// Whether a content-type header names a body the crawler can parse.
///
/// Matched by substring so parameters like `; charset=utf-8` pass through.
pub fn is_valid_content_type(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("text/plain")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("TestBot/1.0", Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_html_content_type_is_valid() {
        assert!(is_valid_content_type("text/html"));
        assert!(is_valid_content_type("text/html; charset=utf-8"));
    }

    #[test]
    fn test_plain_content_type_is_valid() {
        assert!(is_valid_content_type("text/plain"));
    }

    #[test]
    fn test_other_content_types_are_invalid() {
        assert!(!is_valid_content_type("application/octet-stream"));
        assert!(!is_valid_content_type("application/pdf"));
        assert!(!is_valid_content_type("image/png"));
        assert!(!is_valid_content_type(""));
    }

    // Fetch behavior against live responses is covered by the wiremock
    // end-to-end tests in tests/crawl_tests.rs.
}
