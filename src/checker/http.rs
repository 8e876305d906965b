// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Builds the one HTTP client the whole crawl shares
// - Makes HTTP HEAD requests (lightweight, no body download), following
//   redirects
// - Turns a failed probe into a DeadLinkRecord tagged Internal or External
//
// A link is dead when:
// - the request itself fails (DNS, connection refused, timeout, TLS...)
// - the final response status is 400 or above
// Live links produce nothing at all.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Option<T>: "maybe a record" is the natural return type of a check
// - Enums: To represent the probe outcome and the link classification
// =============================================================================

use crate::config::CrawlConfig;
use crate::crawl::{netloc, normalize_url};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// Whether a dead link points inside or outside the audited site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    /// The link's domain contains the root domain (subdomains included)
    Internal,
    /// Anything else
    External,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Internal => write!(f, "Internal"),
            LinkKind::External => write!(f, "External"),
        }
    }
}

// One confirmed-dead link
//
// The serde names double as the CSV header and JSON keys of the reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLinkRecord {
    /// Page (or sitemap) the link was found on, normalized
    #[serde(rename = "Origin Page")]
    pub origin_page: String,
    /// The dead link itself, normalized
    #[serde(rename = "Dead Link")]
    pub dead_link: String,
    /// HTTP status code, or "Error: ..." for transport failures
    #[serde(rename = "Status/Error")]
    pub status_or_error: String,
    /// Host (and port) of the dead link
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Type")]
    pub kind: LinkKind,
}

// What a HEAD probe came back with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Got a response with this status code (after redirects)
    Http(u16),
    /// No response at all; holds the error description
    Failed(String),
}

impl ProbeStatus {
    pub fn is_dead(&self) -> bool {
        match self {
            ProbeStatus::Http(code) => *code >= 400,
            ProbeStatus::Failed(_) => true,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Http(code) => write!(f, "{}", code),
            ProbeStatus::Failed(error) => write!(f, "Error: {}", error),
        }
    }
}

// Creates the HTTP client shared by every fetch and probe
//
// reqwest follows redirects by default (up to 10), for HEAD as well as GET.
pub fn build_client(config: &CrawlConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()
}

// Checks a single link
//
// Parameters:
//   client: shared reqwest client
//   url: the link to probe
//   origin: where the link was found (for the report)
//   root_domain: netloc of the site being audited
//
// Returns: Some(record) if the link is dead, None if it's alive
pub async fn check_link(
    client: &Client,
    url: &str,
    origin: &str,
    root_domain: &str,
) -> Option<DeadLinkRecord> {
    let status = probe(client, url).await;
    debug!(url, status = %status, "Probed link");
    dead_link_record(url, origin, root_domain, &status)
}

// Sends the HEAD request and reduces the outcome to a ProbeStatus
pub async fn probe(client: &Client, url: &str) -> ProbeStatus {
    match client.head(url).send().await {
        Ok(response) => ProbeStatus::Http(response.status().as_u16()),
        Err(e) => ProbeStatus::Failed(e.to_string()),
    }
}

// Builds the report entry for a probe result (None when the link is alive)
pub fn dead_link_record(
    url: &str,
    origin: &str,
    root_domain: &str,
    status: &ProbeStatus,
) -> Option<DeadLinkRecord> {
    if !status.is_dead() {
        return None;
    }

    let dead_link = normalize_url(url);
    let domain = netloc(&dead_link);
    let kind = classify_domain(&domain, root_domain);

    Some(DeadLinkRecord {
        origin_page: normalize_url(origin),
        dead_link,
        status_or_error: status.to_string(),
        domain,
        kind,
    })
}

// Internal when the root domain appears anywhere in the link's domain,
// so "cdn.example.com" is internal to "example.com"
pub fn classify_domain(domain: &str, root_domain: &str) -> LinkKind {
    if domain.contains(root_domain) {
        LinkKind::Internal
    } else {
        LinkKind::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client() -> Client {
        let config = CrawlConfig {
            timeout_secs: 1,
            ..CrawlConfig::default()
        };
        build_client(&config).unwrap()
    }

    #[test]
    fn test_404_on_subdomain_is_internal() {
        let record = dead_link_record(
            "https://cdn.example.com/logo.png",
            "https://example.com/about",
            "example.com",
            &ProbeStatus::Http(404),
        )
        .unwrap();

        assert_eq!(record.kind, LinkKind::Internal);
        assert_eq!(record.status_or_error, "404");
        assert_eq!(record.domain, "cdn.example.com");
        assert_eq!(record.dead_link, "https://cdn.example.com/logo.png");
        assert_eq!(record.origin_page, "https://example.com/about");
    }

    #[test]
    fn test_404_on_other_domain_is_external() {
        let record = dead_link_record(
            "https://other.org/gone",
            "https://example.com/",
            "example.com",
            &ProbeStatus::Http(404),
        )
        .unwrap();

        assert_eq!(record.kind, LinkKind::External);
        assert_eq!(record.domain, "other.org");
        assert_eq!(record.origin_page, "https://example.com");
    }

    #[test]
    fn test_live_statuses_produce_no_record() {
        for code in [200, 204, 301, 304, 399] {
            let status = ProbeStatus::Http(code);
            assert!(dead_link_record("https://example.com/", "https://example.com/", "example.com", &status).is_none());
        }
    }

    #[test]
    fn test_server_error_is_dead() {
        let record = dead_link_record(
            "https://example.com/api",
            "https://example.com/",
            "example.com",
            &ProbeStatus::Http(503),
        );
        assert_eq!(record.map(|r| r.status_or_error), Some("503".to_string()));
    }

    #[test]
    fn test_transport_failure_records_error() {
        let record = dead_link_record(
            "https://nowhere.invalid/Page?x=1",
            "https://example.com/",
            "example.com",
            &ProbeStatus::Failed("dns error".to_string()),
        )
        .unwrap();

        assert_eq!(record.status_or_error, "Error: dns error");
        assert_eq!(record.dead_link, "https://nowhere.invalid/page");
        assert_eq!(record.kind, LinkKind::External);
    }

    #[test]
    fn test_record_serializes_with_report_columns() {
        let record = DeadLinkRecord {
            origin_page: "https://example.com".to_string(),
            dead_link: "https://example.com/missing".to_string(),
            status_or_error: "404".to_string(),
            domain: "example.com".to_string(),
            kind: LinkKind::Internal,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Origin Page"], "https://example.com");
        assert_eq!(json["Dead Link"], "https://example.com/missing");
        assert_eq!(json["Status/Error"], "404");
        assert_eq!(json["Type"], "Internal");
    }

    #[tokio::test]
    async fn test_check_live_link() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/ok", server.uri());
        let record = check_link(&client(), &url, &server.uri(), "127.0.0.1").await;
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_check_dead_link() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/Missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/Missing", server.uri());
        let record = check_link(&client(), &url, &server.uri(), "127.0.0.1")
            .await
            .unwrap();
        assert_eq!(record.status_or_error, "404");
        assert_eq!(record.kind, LinkKind::Internal);
        assert!(record.dead_link.ends_with("/missing"));
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", format!("{}/gone", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let status = probe(&client(), &format!("{}/old", server.uri())).await;
        assert_eq!(status, ProbeStatus::Http(410));
    }

    #[tokio::test]
    async fn test_timeout_is_dead() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let url = format!("{}/slow", server.uri());
        let record = check_link(&client(), &url, &server.uri(), "127.0.0.1")
            .await
            .unwrap();
        assert!(record.status_or_error.starts_with("Error: "));
    }
}
