// src/sitemap/mod.rs
// =============================================================================
// This module finds and reads sitemaps.
//
// Submodules:
// - fetch: downloads a sitemap document
// - parse: turns the XML into nested sitemap URLs or page URLs
// - archive: saves downloaded sitemaps and the per-sitemap links log
// =============================================================================

mod archive;
mod fetch;
mod parse;

pub use archive::{append_links_log, archive_sitemap, links_log_path};
pub use fetch::fetch_sitemap;
pub use parse::{parse_sitemap, SitemapContents, SitemapKind};
