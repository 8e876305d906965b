// src/crawl/registry.rs
// =============================================================================
// Claim registry: "have we already scheduled this?"
//
// Workers discover the same URL from many pages at once. Before any work is
// queued the discoverer must *claim* the key; only the first claimant wins,
// everyone else drops it. The check and the insert happen in one step
// (DashSet::insert), so two workers can't both see "absent" and both win.
//
// A crawl owns two registries:
// - sitemaps, keyed by the raw fetch URL
// - links, keyed by normalize_url()
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct ClaimRegistry {
    claimed: DashSet<String>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true only for the first caller to claim `key`
    pub fn try_claim(&self, key: impl Into<String>) -> bool {
        self.claimed.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }
}
