// src/sitemap/archive.rs
// =============================================================================
// On-disk record of the sitemaps a crawl walked.
//
// Every sitemap gets its own folder, named after the file's stem:
//
//   xml/
//     sitemap_index/sitemap_index.xml
//     posts/posts.xml
//     posts/links-from-posts.txt
//
// The links-from-<stem>.txt file is written for urlset sitemaps only. It has
// one block per scanned page: the page on its own line, then one
// "  > <link>" line for each link first discovered on that page. Pages are
// scanned concurrently, so a whole block is appended in one write while the
// caller holds a lock.
// =============================================================================

use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

// Folder name for a sitemap URL: the file name up to its first '.'
//
//   https://example.com/sitemap.xml       -> "sitemap"
//   https://example.com/blog/posts-1.xml  -> "posts-1"
//   https://example.com/                  -> "sitemap"
pub fn sitemap_stem(url: &str) -> String {
    let file_name = sitemap_file_name(url);
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => "sitemap".to_string(),
    }
}

fn sitemap_file_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "sitemap.xml".to_string())
}

// <archive>/<stem>/<file name>
pub fn archive_path(archive_dir: &Path, url: &str) -> PathBuf {
    archive_dir.join(sitemap_stem(url)).join(sitemap_file_name(url))
}

// <archive>/<stem>/links-from-<stem>.txt
pub fn links_log_path(archive_dir: &Path, url: &str) -> PathBuf {
    let stem = sitemap_stem(url);
    archive_dir.join(&stem).join(format!("links-from-{}.txt", stem))
}

// Saves a sitemap's raw bytes under the archive directory
pub async fn archive_sitemap(archive_dir: &Path, url: &str, body: &[u8]) -> Result<PathBuf> {
    let path = archive_path(archive_dir, url);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, body).await?;
    Ok(path)
}

// Appends one page block to a links log, creating the file if needed
pub async fn append_links_log(path: &Path, page: &str, links: &[String]) -> Result<()> {
    let mut block = format!("{}\n", page);
    for link in links {
        block.push_str("  > ");
        block.push_str(link);
        block.push('\n');
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(block.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
