//! URL validation for the crawler
//!
//! A URL is crawlable only when it is syntactically absolute, uses the http
//! or https scheme, and carries a host. Everything else a page links to
//! (relative paths, fragments, mailto:, ftp:, malformed strings) is rejected
//! here and discarded by the caller.

use url::Url;

/// Validates a raw string as a crawlable absolute URL.
///
/// Returns the normalized form of the URL when it is absolute with an http
/// or https scheme and a host, `None` otherwise. Relative hrefs fail the
/// parse and are rejected; schemes are matched case-insensitively since the
/// parser lowercases them.
pub fn validate_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return None;
    }

    Some(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_string() {
        assert_eq!(validate_url(""), None);
    }

    #[test]
    fn test_accepts_valid_url() {
        assert_eq!(
            validate_url("https://www.kinglabs.ca/"),
            Some("https://www.kinglabs.ca/".to_string())
        );
    }

    #[test]
    fn test_rejects_url_without_host() {
        assert_eq!(validate_url("https:///"), None);
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        assert_eq!(validate_url("www.kinglabs.ca/"), None);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert_eq!(validate_url("ftp://ftp.kinglabs.ca/"), None);
    }

    #[test]
    fn test_accepts_uppercase_scheme() {
        // The parser lowercases schemes, so HTTPS is still crawlable
        assert_eq!(
            validate_url("HTTPS://example.com/"),
            Some("https://example.com/".to_string())
        );
    }

    #[test]
    fn test_rejects_relative_path() {
        assert_eq!(validate_url("relative/path"), None);
    }

    #[test]
    fn test_rejects_fragment_only() {
        assert_eq!(validate_url("#some-fragment"), None);
    }

    #[test]
    fn test_rejects_mailto() {
        assert_eq!(validate_url("mailto:test@example.com"), None);
    }

    #[test]
    fn test_normalizes_bare_domain() {
        // A bare authority gains its root path during normalization
        assert_eq!(
            validate_url("https://example.com"),
            Some("https://example.com/".to_string())
        );
    }
}
