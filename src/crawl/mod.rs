// src/crawl/mod.rs
// =============================================================================
// This module handles sitemap-driven crawling.
//
// Features:
// - Starts from the well-known sitemap locations under a site root
// - Follows sitemap indexes to any depth, never fetching a sitemap twice
// - Scans every listed page for links and HEAD-checks each link exactly once
// - Runs a fixed pool of workers over one shared work queue
//
// Submodules:
// - normalize: canonical URL keys and small URL helpers
// - registry: atomic "first one wins" claim sets
// - queue: the work queue and task types
// - scheduler: the crawler that ties it all together
// =============================================================================

mod normalize;
mod queue;
mod registry;
mod scheduler;

pub use normalize::{netloc, normalize_url};
pub use scheduler::{resolve_base_url, CrawlOutcome, SitemapCrawler};
