// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Everything the engine needs to know that isn't the website itself lives
// here: how many workers to run, how long a request may take, what to send
// as the User-Agent, where to look for sitemaps, and which URLs count as
// static assets (validated directly instead of scanned for links).
//
// The CLI builds a CrawlConfig from its flags; tests build one with
// CrawlConfig::default() and tweak fields.
// =============================================================================

use std::time::Duration;

/// Well-known places a site keeps its sitemap, probed in this order.
pub const DEFAULT_SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemap/sitemap.xml",
    "/sitemap1.xml",
    "/sitemap/sitemap-index.xml",
];

/// Extensions of URLs that are HEAD-checked but never fetched for links.
pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".pdf", ".css", ".js",
];

pub const DEFAULT_WORKERS: usize = 15;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of concurrent workers (and so the max in-flight requests)
    pub workers: usize,
    /// Per-request timeout in seconds, shared by GET and HEAD
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Sitemap entry paths appended to the website root
    pub sitemap_paths: Vec<String>,
    /// Lower-case suffixes that mark a URL as a static asset
    pub asset_extensions: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sitemap_paths: DEFAULT_SITEMAP_PATHS.iter().map(|p| p.to_string()).collect(),
            asset_extensions: DEFAULT_ASSET_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl CrawlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    // A zero worker count would never drain the queue
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }

    // `url` is expected to be normalized already (lower-case, no query)
    pub fn is_asset(&self, url: &str) -> bool {
        self.asset_extensions.iter().any(|ext| url.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.workers, 15);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.user_agent, "Mozilla/5.0");
        assert_eq!(config.sitemap_paths.len(), 6);
        assert_eq!(config.sitemap_paths[0], "/sitemap.xml");
    }

    #[test]
    fn test_is_asset() {
        let config = CrawlConfig::default();
        assert!(config.is_asset("https://example.com/logo.png"));
        assert!(config.is_asset("https://example.com/app.js"));
        assert!(config.is_asset("https://example.com/docs/guide.pdf"));
        assert!(!config.is_asset("https://example.com/about"));
        assert!(!config.is_asset("https://example.com/json"));
    }

    #[test]
    fn test_worker_count_never_zero() {
        let config = CrawlConfig {
            workers: 0,
            ..CrawlConfig::default()
        };
        assert_eq!(config.worker_count(), 1);
    }
}
