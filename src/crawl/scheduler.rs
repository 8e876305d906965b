// src/crawl/scheduler.rs
// =============================================================================
// The crawl engine: walks a site's sitemaps and validates every link found.
//
// How it works:
// 1. Every well-known sitemap path under the site root becomes a Sitemap task
// 2. A fixed number of workers pull tasks from one shared WorkQueue
// 3. A Sitemap task downloads and parses the document:
//    - an index pushes one Sitemap task per nested sitemap
//    - a urlset pushes one Page task per listed page
// 4. A Page task either validates the URL directly (images, scripts, PDFs...)
//    or downloads the page and pushes one Validate task per new link on it;
//    with an archive dir, the page and those links also go to the urlset's
//    links-from-<stem>.txt
// 5. A Validate task HEAD-probes the link and records it if it's dead
// 6. When the queue drains and no task is running, the crawl is over
//
// Dedup:
// - sitemaps are claimed by their raw URL before being queued
// - pages and links are claimed by normalize_url() before being queued
// so no sitemap is fetched twice and no link is scanned or probed twice, no
// matter how many pages mention it.
//
// All mutable state lives in a CrawlState built fresh for every crawl() call.
// =============================================================================

use super::normalize::{is_http_url, netloc, normalize_url};
use super::queue::{Task, WorkQueue};
use super::registry::ClaimRegistry;
use crate::checker::{build_client, check_link, fetch_page_links, DeadLinkRecord};
use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::sitemap::{
    append_links_log, archive_sitemap, fetch_sitemap, links_log_path, parse_sitemap, SitemapContents,
    SitemapKind,
};
use futures::future::join_all;
use reqwest::Client;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use url::Url;

// What a finished crawl hands to the reporting layer
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Website root the crawl started from, scheme included
    pub base_url: String,
    /// Host (and port) used for Internal/External classification
    pub root_domain: String,
    /// Every sitemap URL that was fetched successfully
    pub sitemaps: BTreeSet<String>,
    /// Dead links in the order they were confirmed
    pub dead_links: Vec<DeadLinkRecord>,
    /// Pages downloaded for link extraction
    pub pages_scanned: usize,
    /// Links HEAD-probed
    pub links_checked: usize,
}

pub struct SitemapCrawler {
    client: Client,
    config: Arc<CrawlConfig>,
    archive_dir: Option<PathBuf>,
}

impl SitemapCrawler {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self {
            client,
            config: Arc::new(config),
            archive_dir: None,
        })
    }

    /// Save every downloaded sitemap under `dir`
    pub fn with_archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.archive_dir = Some(dir.into());
        self
    }

    // Runs one complete crawl of `website` ("example.com" or a full URL)
    pub async fn crawl(&self, website: &str) -> Result<CrawlOutcome> {
        let base_url = resolve_base_url(website)?;
        let root_domain = netloc(&base_url);
        let workers = self.config.worker_count();

        info!(base_url = %base_url, workers, "Starting sitemap crawl");

        let state = Arc::new(CrawlState {
            client: self.client.clone(),
            config: self.config.clone(),
            archive_dir: self.archive_dir.clone(),
            root_domain,
            queue: WorkQueue::new(),
            sitemaps: ClaimRegistry::new(),
            links: ClaimRegistry::new(),
            found_sitemaps: Mutex::new(BTreeSet::new()),
            links_log_lock: Mutex::new(()),
            dead_links: Mutex::new(Vec::new()),
            pages_scanned: AtomicUsize::new(0),
            links_checked: AtomicUsize::new(0),
        });

        let root = base_url.trim_end_matches('/');
        for path in &self.config.sitemap_paths {
            state.enqueue_sitemap(format!("{}{}", root, path));
        }

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let state = state.clone();
                tokio::spawn(async move { state.work(worker_id).await })
            })
            .collect();

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!("Crawl worker failed: {}", e);
            }
        }

        let outcome = state.outcome(base_url).await;
        info!(
            sitemaps_claimed = state.sitemaps.len(),
            links_claimed = state.links.len(),
            sitemaps = outcome.sitemaps.len(),
            pages = outcome.pages_scanned,
            links = outcome.links_checked,
            dead = outcome.dead_links.len(),
            "Crawl finished"
        );
        Ok(outcome)
    }
}

// Shared state of one crawl, owned jointly by its workers
struct CrawlState {
    client: Client,
    config: Arc<CrawlConfig>,
    archive_dir: Option<PathBuf>,
    root_domain: String,
    queue: WorkQueue,
    sitemaps: ClaimRegistry,
    links: ClaimRegistry,
    found_sitemaps: Mutex<BTreeSet<String>>,
    // Serializes appends to the links-from-<stem>.txt files
    links_log_lock: Mutex<()>,
    dead_links: Mutex<Vec<DeadLinkRecord>>,
    pages_scanned: AtomicUsize,
    links_checked: AtomicUsize,
}

impl CrawlState {
    async fn work(&self, worker_id: usize) {
        debug!(worker_id, "Worker started");

        while let Some(task) = self.queue.next().await {
            // Marks the task done even if it panics
            let _done = self.queue.finish_guard();

            match task {
                Task::Sitemap { url } => self.process_sitemap(&url).await,
                Task::Page {
                    url,
                    origin,
                    links_log,
                } => self.process_page(&url, &origin, links_log.as_deref()).await,
                Task::Validate { url, origin } => self.validate(&url, &origin).await,
            }
        }

        debug!(worker_id, pending = self.queue.pending(), "Worker exiting");
    }

    fn enqueue_sitemap(&self, url: String) {
        if self.sitemaps.try_claim(url.as_str()) {
            self.queue.push(Task::Sitemap { url });
        } else {
            debug!(url = %url, "Sitemap already visited");
        }
    }

    async fn process_sitemap(&self, url: &str) {
        let Some(body) = fetch_sitemap(&self.client, url).await else {
            return;
        };

        self.found_sitemaps.lock().await.insert(url.to_string());

        if let Some(dir) = &self.archive_dir {
            if let Err(e) = archive_sitemap(dir, url, &body).await {
                warn!(url, "Could not archive sitemap: {}", e);
            }
        }

        let contents = match parse_sitemap(&body) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(url, "Error parsing sitemap: {}", e);
                SitemapContents::default()
            }
        };

        match contents.kind() {
            SitemapKind::Index => {
                info!(url, nested = contents.sitemaps.len(), "Found sitemap index");
                for child in contents.sitemaps {
                    self.enqueue_sitemap(child);
                }
            }
            SitemapKind::UrlSet => {
                info!(url, pages = contents.pages.len(), "Found sitemap urlset");
                let links_log = self.archive_dir.as_deref().map(|dir| links_log_path(dir, url));
                for page in contents.pages {
                    if !is_http_url(&page) {
                        debug!(page = %page, "Skipping non-HTTP page");
                        continue;
                    }
                    if self.links.try_claim(normalize_url(&page)) {
                        self.queue.push(Task::Page {
                            url: page,
                            origin: url.to_string(),
                            links_log: links_log.clone(),
                        });
                    }
                }
            }
        }
    }

    async fn process_page(&self, url: &str, origin: &str, links_log: Option<&Path>) {
        let normalized = normalize_url(url);

        if self.config.is_asset(&normalized) {
            self.queue.push(Task::Validate {
                url: url.to_string(),
                origin: origin.to_string(),
            });
            return;
        }

        self.pages_scanned.fetch_add(1, Ordering::Relaxed);
        let inner_links = fetch_page_links(&self.client, url).await;
        debug!(url, links = inner_links.len(), "Scanned page");

        let mut discovered = Vec::new();
        for link in inner_links {
            if !is_http_url(&link) {
                continue;
            }
            let key = normalize_url(&link);
            if self.links.try_claim(key.as_str()) {
                self.queue.push(Task::Validate {
                    url: link,
                    origin: normalized.clone(),
                });
                discovered.push(key);
            }
        }

        if let Some(path) = links_log {
            let _guard = self.links_log_lock.lock().await;
            if let Err(e) = append_links_log(path, &normalized, &discovered).await {
                warn!(path = %path.display(), "Could not write links log: {}", e);
            }
        }
    }

    async fn validate(&self, url: &str, origin: &str) {
        self.links_checked.fetch_add(1, Ordering::Relaxed);

        if let Some(record) = check_link(&self.client, url, origin, &self.root_domain).await {
            info!(
                link = %record.dead_link,
                status = %record.status_or_error,
                kind = %record.kind,
                "Dead link"
            );
            self.dead_links.lock().await.push(record);
        }
    }

    async fn outcome(&self, base_url: String) -> CrawlOutcome {
        CrawlOutcome {
            base_url,
            root_domain: self.root_domain.clone(),
            sitemaps: self.found_sitemaps.lock().await.clone(),
            dead_links: std::mem::take(&mut *self.dead_links.lock().await),
            pages_scanned: self.pages_scanned.load(Ordering::Relaxed),
            links_checked: self.links_checked.load(Ordering::Relaxed),
        }
    }
}

// Adds https:// when the scheme is missing and checks there's a host
pub fn resolve_base_url(website: &str) -> Result<String> {
    let website = website.trim();
    let base_url = if is_http_url(website) {
        website.to_string()
    } else {
        format!("https://{}", website)
    };

    let parsed =
        Url::parse(&base_url).map_err(|e| CrawlError::InvalidUrl(format!("{:?}: {}", website, e)))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(CrawlError::InvalidUrl(format!("{:?} has no host", website)));
    }

    Ok(base_url)
}
