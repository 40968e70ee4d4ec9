// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr) and load the tracker rules
// 3. Crawl the site, printing one JSON record per page to stdout as we go
// 4. Exit with proper code (0 = scan completed, 2 = error)
//
// stdout carries nothing but the JSON lines, so the output can be piped
// straight into jq or a file. Progress and warnings go to stderr via `log`.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - fetching, HTML extraction, tracker rules
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - scan settings and constants
mod crawl; // src/crawl/ - frontier, robots.txt, crawl loop
mod domain; // src/domain.rs - registrable-domain helpers
mod error; // src/error.rs - error types
mod report; // src/report.rs - the per-page output record

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use futures::StreamExt;
use report::Note;
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Initialize logging based on verbosity flag
//
// RUST_LOG still wins if set, e.g. RUST_LOG=privacy_scanner=trace
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.scan_config();
    let rules = checker::RuleSet::load_or_empty(&cli.rules);

    let transport = checker::ReqwestTransport::new(&config).map_err(error::ScanError::from)?;
    let crawler = crawl::Crawler::new(&cli.url, config, rules, Arc::new(transport))?;

    log::info!(
        "🔍 Scanning {} (site: {})",
        crawler.seed().url(),
        crawler.seed().registrable_domain().unwrap_or("unknown")
    );

    let stdout = std::io::stdout();
    let mut pages = 0;
    let mut skipped = 0;

    let mut records = Box::pin(crawler.into_stream());
    while let Some(record) = records.next().await {
        let line = record.to_json_line().context("failed to serialize page record")?;

        // Print each record as soon as it's ready; lock per line so a
        // partially written line never shows up in the output
        let mut out = stdout.lock();
        writeln!(out, "{}", line).context("failed to write to stdout")?;
        out.flush().context("failed to flush stdout")?;

        pages += 1;
        if record.has_note(Note::RobotsDisallow) || record.has_note(Note::FetchFailed) {
            skipped += 1;
        }
    }

    log::info!("📊 Scanned {} page(s), {} not fetched", pages, skipped);
    Ok(0)
}
