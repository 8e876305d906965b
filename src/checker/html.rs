// src/checker/html.rs
// =============================================================================
// Page scanning: download a page listed in a sitemap and pull out its links.
//
// `scraper` (html5ever underneath) builds the DOM and runs the `a[href]`
// selector; `url` resolves each href against the page it was found on, the
// way a browser would.
//
// Only responses served as text/html are scanned; PDFs, images or JSON that
// happen to be listed in a sitemap yield no links.
// =============================================================================

use crate::error::{CrawlError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

// "all <a> tags that have an href attribute"; the selector is a constant,
// so parsing it can only fail on a programmer error
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("a[href] is a valid selector"));

// Fetches a page and returns the absolute HTTP(S) links it contains
//
// Failures (network errors, error pages, non-HTML content) are logged and
// produce an empty list: a page we can't read simply contributes no links.
pub async fn fetch_page_links(client: &Client, page_url: &str) -> Vec<String> {
    match fetch_html(client, page_url).await {
        Ok(html) => extract_html_links(&html, page_url),
        Err(e @ CrawlError::NotHtml { .. }) => {
            debug!(url = page_url, "Skipping link extraction: {}", e);
            Vec::new()
        }
        Err(e) => {
            warn!(url = page_url, "Failed to fetch page: {}", e);
            Vec::new()
        }
    }
}

// Downloads a page's HTML
//
// The status code isn't checked: a custom 404 page still has navigation
// links worth validating.
async fn fetch_html(client: &Client, page_url: &str) -> Result<String> {
    let response = client.get(page_url).send().await?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return Err(CrawlError::NotHtml {
            url: page_url.to_string(),
            content_type,
        });
    }

    Ok(response.text().await?)
}

// Parses `html` and returns every <a href> that resolves to an http(s) URL
//
//   <a href="/docs">  on https://example.com/page  ->  https://example.com/docs
//   <a href="mailto:x@y.z">                        ->  (skipped)
//
// Order follows the document; duplicates are kept (the registry drops them).
pub fn extract_html_links(html: &str, page_url: &str) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            warn!(url = page_url, "Page URL doesn't parse, can't resolve its links: {}", e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| absolute_http_link(&base, href))
        .collect()
}

// Joins `href` onto the page URL; None for unparsable hrefs and for
// mailto:, tel:, javascript:, data: and other non-web schemes
fn absolute_http_link(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.into()),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the selector a LazyLock static?
//    - Selector::parse does real work (it's a tiny CSS parser)
//    - Every page scan needs the same selector, so we build it once
//
// 2. Why is Html never held across an .await?
//    - scraper's Html isn't Send (it uses non-atomic reference counts)
//    - fetch_html() finishes all awaiting before extract_html_links() parses,
//      so the future returned by fetch_page_links stays Send and can run on
//      any tokio worker thread
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn test_absolute_href_is_kept() {
        let links = extract_html_links(r#"<a href="https://crates.io">crates</a>"#, "https://example.com");
        assert_eq!(links, vec!["https://crates.io/"]);
    }

    #[test]
    fn test_relative_href_is_resolved() {
        let links = extract_html_links(r#"<p><a href=" guide/intro ">Intro</a></p>"#, "https://example.com/docs/");
        assert_eq!(links, vec!["https://example.com/docs/guide/intro"]);
    }

    #[test]
    fn test_mixed_anchors_keep_document_order() {
        let html = r#"
            <nav>
              <a href="../pricing">Pricing</a>
              <a href="mailto:sales@example.com">Email</a>
              <a name="top">anchor without href</a>
              <a href="javascript:void(0)">Menu</a>
              <a href="HTTP://Partner.example.org/x">Partner</a>
              <a href="tel:+123456">Call</a>
              <a href="/pricing">Pricing again</a>
            </nav>
        "#;
        let links = extract_html_links(html, "https://example.com/docs/page");
        assert_eq!(
            links,
            vec![
                "https://example.com/pricing",
                "http://partner.example.org/x",
                "https://example.com/pricing"
            ]
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let links = extract_html_links(r#"<a href="/x">x</a>"#, "not a url");
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><body><a href="/missing">gone</a><a href="https://other.org/">x</a></body></html>"#,
                "text/html; charset=utf-8",
            ))
            .mount(&server)
            .await;

        let links = fetch_page_links(&Client::new(), &format!("{}/a", server.uri())).await;
        assert_eq!(
            links,
            vec![format!("{}/missing", server.uri()), "https://other.org/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_html_page_has_no_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"href": "/x"}"#, "application/json"))
            .mount(&server)
            .await;

        let links = fetch_page_links(&Client::new(), &format!("{}/data", server.uri())).await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_page_has_no_links() {
        // Nothing listens on port 9 (discard) in the test environment
        let links = fetch_page_links(&Client::new(), "http://127.0.0.1:9/").await;
        assert!(links.is_empty());
    }
}
