// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (or prompt for the website)
// 2. Set up logging (tracing, to stderr)
// 3. Prepare the output folder, run the sitemap crawl, write the reports
// 4. Print dead links as a table or JSON
// 5. Exit with proper code (0 = no dead links, 1 = dead links, 2 = error)
// =============================================================================

mod checker;
mod cli;
mod config;
mod crawl;
mod error;
mod report;
mod sitemap;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Cli;
use crawl::{netloc, resolve_base_url, CrawlOutcome, SitemapCrawler};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no dead links
//   Ok(1) = dead links found
//   Err = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let website = match &cli.website {
        Some(website) => website.clone(),
        None => prompt_website()?,
    };
    let base_url = resolve_base_url(&website)?;

    if !cli.json {
        println!("🔍 Scanning sitemaps of: {}", base_url);
    }

    let output = if cli.no_files {
        None
    } else {
        Some(report::prepare_output_dir(&cli.output_dir, &netloc(&base_url))?)
    };

    let mut crawler =
        SitemapCrawler::new(cli.crawl_config()).context("Failed to create HTTP client")?;
    if let Some(dir) = &output {
        crawler = crawler.with_archive_dir(dir.xml.clone());
    }

    let outcome = crawler.crawl(&base_url).await?;

    if let Some(dir) = &output {
        for path in report::write_reports(&dir.root, &outcome)? {
            if !cli.json {
                println!("🗂️  Saved {}", path.display());
            }
        }
    }

    print_results(&outcome, cli.json)?;

    if outcome.dead_links.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Logs go to stderr so `--json` output on stdout stays machine-readable
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitemap_guardian={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// Interactive fallback when no website argument was given
fn prompt_website() -> Result<String> {
    print!("Enter website URL (e.g., example.com): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read website from stdin")?;

    let website = line.trim();
    if website.is_empty() {
        bail!("No website given");
    }
    Ok(website.to_string())
}

fn print_results(outcome: &CrawlOutcome, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(&outcome.dead_links)?;
        println!("{}", json_output);
    } else {
        print_table(outcome);
    }
    Ok(())
}

// Prints dead links as a human-readable table in the terminal
fn print_table(outcome: &CrawlOutcome) {
    println!();

    if outcome.dead_links.is_empty() {
        println!("✅ No dead links found!");
    } else {
        println!("{:<60} {:<12} {:<10} {}", "DEAD LINK", "STATUS", "TYPE", "FOUND ON");
        println!("{}", "=".repeat(110));

        for record in &outcome.dead_links {
            println!(
                "{:<60} {:<12} {:<10} {}",
                truncate(&record.dead_link, 57),
                truncate(&record.status_or_error, 12),
                record.kind.to_string(),
                record.origin_page
            );
        }
    }

    println!();
    println!("📊 Summary for {}:", outcome.base_url);
    println!("   🗺️  Sitemaps: {}", outcome.sitemaps.len());
    println!("   📄 Pages scanned: {}", outcome.pages_scanned);
    println!("   🔗 Links checked: {}", outcome.links_checked);
    println!("   ❌ Dead: {}", outcome.dead_links.len());
}

// Shortens long values so the table columns stay aligned
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let kept: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        value.to_string()
    }
}
