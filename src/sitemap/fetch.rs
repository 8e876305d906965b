// src/sitemap/fetch.rs
// =============================================================================
// Downloads sitemap documents.
//
// A candidate URL only counts as a sitemap when the server answers 200 with
// an XML content type. Anything else (404, an HTML error page, a timeout) just
// means "no sitemap here" and that branch of the crawl is pruned. Nothing in
// this file returns an error to the scheduler.
// =============================================================================

use crate::error::{CrawlError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

// Fetches a sitemap, returning its raw bytes or None
//
// Non-sitemap responses are logged at debug level (most candidate paths
// don't exist on most sites); transport errors are logged as warnings.
pub async fn fetch_sitemap(client: &Client, url: &str) -> Option<Vec<u8>> {
    match try_fetch_sitemap(client, url).await {
        Ok(body) => {
            info!(url, bytes = body.len(), "Downloaded sitemap");
            Some(body)
        }
        Err(e @ (CrawlError::UnexpectedStatus { .. } | CrawlError::NotXml { .. })) => {
            debug!(url, "No sitemap: {}", e);
            None
        }
        Err(e) => {
            warn!(url, "Error downloading sitemap: {}", e);
            None
        }
    }
}

// Same as fetch_sitemap, but says why a URL was rejected
pub async fn try_fetch_sitemap(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CrawlError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("xml") {
        return Err(CrawlError::NotXml {
            url: url.to_string(),
            content_type,
        });
    }

    let body = response.bytes().await?;
    Ok(body.to_vec())
}
