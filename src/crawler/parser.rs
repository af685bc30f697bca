//! HTML link extraction
//!
//! Pulls the raw `href` value off every anchor element, in document order,
//! with no validation. Deciding which of those strings are crawlable URLs
//! is the validator's job (see [`crate::url`]), not the parser's.

use scraper::{Html, Selector};

/// Extracts every anchor `href` value from an HTML document.
///
/// Returns the raw attribute values in document order, including relative
/// paths, fragments, and javascript: pseudo-links. Malformed markup is
/// tolerated; the parser recovers the way browsers do.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut links = Vec::new();
    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_absolute_href() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extracts_raw_relative_href() {
        let html = r#"<html><body><a href="relative/path">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["relative/path"]);
    }

    #[test]
    fn test_extracts_fragment_href() {
        // Fragments come out raw; the validator rejects them later
        let html = r##"<html><body><a href="#some-fragment">hi</a></body></html>"##;
        assert_eq!(extract_links(html), vec!["#some-fragment"]);
    }

    #[test]
    fn test_preserves_document_order() {
        let html = r#"
            <html><body>
                <a href="https://a.test/">first</a>
                <p><a href="https://b.test/">second</a></p>
                <div><a href="https://c.test/">third</a></div>
            </body></html>
        "#;
        assert_eq!(
            extract_links(html),
            vec!["https://a.test/", "https://b.test/", "https://c.test/"]
        );
    }

    #[test]
    fn test_skips_anchor_without_href() {
        let html = r#"<html><body><a name="top">anchor</a><a href="/page">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/page"]);
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("<html><body>no links</body></html>").is_empty());
    }

    #[test]
    fn test_nested_anchors_in_malformed_markup() {
        let html = r#"<html><body><a href="https://a.test/">one<a href="https://b.test/">two</a></body>"#;
        assert_eq!(
            extract_links(html),
            vec!["https://a.test/", "https://b.test/"]
        );
    }
}
