// src/checker/mod.rs
// =============================================================================
// This module contains the per-URL work of a crawl.
//
// Submodules:
// - http: probes a link with HEAD and classifies dead ones
// - html: fetches a page and extracts the links on it
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::check_link()` instead of
// `checker::http::check_link()`.
// =============================================================================

mod html;
mod http;

pub use html::fetch_page_links;
pub use http::{build_client, check_link, DeadLinkRecord, LinkKind};
