// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is a plain struct and clap generates the
// parsing, --help and --version from the attributes.
// =============================================================================

use crate::config::{CrawlConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_WORKERS};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-guardian",
    version,
    about = "Walk a website's sitemaps and report every dead link",
    long_about = "sitemap-guardian finds a site's sitemaps at the usual locations, follows sitemap \
                  indexes, scans every listed page for links and HEAD-checks each link once. \
                  Dead links are written to CSV, JSON and HTML reports."
)]
pub struct Cli {
    /// Website to audit (e.g., example.com or https://example.com)
    ///
    /// When omitted you'll be prompted for it
    pub website: Option<String>,

    /// Print dead links as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Number of concurrent workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Directory the <domain>/ report folder is created in
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Don't write report files or archive sitemaps
    #[arg(long)]
    pub no_files: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            workers: self.workers,
            timeout_secs: self.timeout,
            user_agent: self.user_agent.clone(),
            ..CrawlConfig::default()
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
