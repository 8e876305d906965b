// src/report.rs
// =============================================================================
// Writes crawl results to disk.
//
// Layout, for a crawl of example.com with --output-dir out:
//
//   out/example.com/
//     xml/                  raw sitemaps, archived during the crawl, plus a
//                           links-from-<stem>.txt per urlset sitemap
//     found_sitemaps.txt    every sitemap fetched, one per line
//     dead_links.csv        \
//     dead_links.json        > only written when dead links were found
//     dead_links.html       /
//
// The domain directory is wiped at the start of each run so stale reports
// from an earlier crawl never mix with new ones.
// =============================================================================

use crate::checker::{DeadLinkRecord, LinkKind};
use crate::crawl::CrawlOutcome;
use anyhow::{Context, Result};
use html_escape::{encode_safe, encode_text};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Directories of one run's output workspace
#[derive(Debug, Clone)]
pub struct OutputDir {
    pub root: PathBuf,
    pub xml: PathBuf,
}

// Recreates <output_root>/<domain>/ and its xml/ archive directory
pub fn prepare_output_dir(output_root: &Path, domain: &str) -> Result<OutputDir> {
    // "127.0.0.1:8080" isn't a portable directory name
    let root = output_root.join(domain.replace(':', "_"));

    if root.exists() {
        fs::remove_dir_all(&root)
            .with_context(|| format!("Failed to clear {}", root.display()))?;
    }

    let xml = root.join("xml");
    fs::create_dir_all(&xml).with_context(|| format!("Failed to create {}", xml.display()))?;

    Ok(OutputDir { root, xml })
}

// Writes every report file; returns the paths written
pub fn write_reports(dir: &Path, outcome: &CrawlOutcome) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let sitemaps_path = dir.join("found_sitemaps.txt");
    write_sitemap_list(&sitemaps_path, outcome)?;
    written.push(sitemaps_path);

    if outcome.dead_links.is_empty() {
        return Ok(written);
    }

    let csv_path = dir.join("dead_links.csv");
    write_csv(&csv_path, &outcome.dead_links)?;
    info!(path = %csv_path.display(), "Dead links report saved");
    written.push(csv_path);

    let json_path = dir.join("dead_links.json");
    write_json(&json_path, &outcome.dead_links)?;
    info!(path = %json_path.display(), "Dead links JSON saved");
    written.push(json_path);

    let html_path = dir.join("dead_links.html");
    fs::write(&html_path, render_html(&outcome.root_domain, &outcome.dead_links))
        .with_context(|| format!("Failed to write {}", html_path.display()))?;
    info!(path = %html_path.display(), "HTML report saved");
    written.push(html_path);

    Ok(written)
}

fn write_sitemap_list(path: &Path, outcome: &CrawlOutcome) -> Result<()> {
    let mut contents = String::new();
    for url in &outcome.sitemaps {
        contents.push_str(url);
        contents.push('\n');
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_csv(path: &Path, records: &[DeadLinkRecord]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, records: &[DeadLinkRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

// Standalone HTML page with a filterable table of dead links
pub fn render_html(domain: &str, records: &[DeadLinkRecord]) -> String {
    let title = format!("Dead Link Report for {}", encode_text(domain));

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; background: #f9f9f9; padding: 20px; }}
        h1 {{ color: #333; }}
        table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
        th, td {{ border: 1px solid #ccc; padding: 8px; text-align: left; }}
        th {{ background: #eee; }}
        tr.internal td {{ background-color: #ffe6e6; }}
        tr.external td {{ background-color: #e6f0ff; }}
        .filter {{ margin-top: 10px; }}
    </style>
    <script>
        function filterTable(type) {{
            document.querySelectorAll("table tbody tr").forEach(row => {{
                row.style.display = (type === 'all' || row.classList.contains(type)) ? '' : 'none';
            }});
        }}
    </script>
</head>
<body>
    <h1>{title}</h1>
    <div class="filter">
        <label><input type="radio" name="filter" onclick="filterTable('all')" checked> Show All</label>
        <label><input type="radio" name="filter" onclick="filterTable('internal')"> Internal Only</label>
        <label><input type="radio" name="filter" onclick="filterTable('external')"> External Only</label>
    </div>
    <table>
        <thead>
            <tr><th>Origin Page</th><th>Dead Link</th><th>Status/Error</th><th>Domain</th><th>Type</th></tr>
        </thead>
        <tbody>
"#
    );

    for record in records {
        let row_class = match record.kind {
            LinkKind::Internal => "internal",
            LinkKind::External => "external",
        };
        // Writing into a String can't fail
        let _ = writeln!(
            html,
            r#"            <tr class="{}"><td><a href="{}" target="_blank">{}</a></td><td><a href="{}" target="_blank">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            row_class,
            encode_safe(&record.origin_page),
            encode_text(&record.origin_page),
            encode_safe(&record.dead_link),
            encode_text(&record.dead_link),
            encode_text(&record.status_or_error),
            encode_text(&record.domain),
            record.kind,
        );
    }

    html.push_str(
        r#"        </tbody>
    </table>
</body>
</html>
"#,
    );

    html
}
