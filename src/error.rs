// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// None of these errors abort a crawl. They exist so the fetcher, parser and
// extractor can say *why* something was skipped; the scheduler logs them and
// moves on. Only `InvalidUrl` (bad website argument) reaches the user.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{url} answered HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("{url} is not an XML document (content-type: {content_type:?})")]
    NotXml { url: String, content_type: String },

    #[error("{url} is not an HTML page (content-type: {content_type:?})")]
    NotHtml { url: String, content_type: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
