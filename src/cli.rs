// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Example:
//   privacy-scanner --url https://example.com --max-pages 10 --rules rules.yml
// =============================================================================

use crate::config::ScanConfig;
use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "privacy-scanner",
    version,
    about = "Crawl a website and report privacy-policy links and embedded trackers",
    long_about = "privacy-scanner crawls a website from a seed URL, respecting robots.txt, and prints one \
                  JSON record per page: cookies set, external scripts, tracker matches, and the \
                  privacy policy link (with its HTTP status)."
)]
pub struct Cli {
    /// Seed URL to start crawling from (e.g., https://example.com)
    #[arg(long)]
    pub url: String,

    /// Maximum number of pages to visit
    #[arg(long, default_value_t = 40)]
    pub max_pages: usize,

    /// YAML file with `third_party_domains` and `keywords` lists
    ///
    /// A missing or invalid file disables tracker detection.
    #[arg(long, default_value = "rules.yml")]
    pub rules: PathBuf,

    /// Follow links to other sites too (default: stay on the seed's domain)
    #[arg(long)]
    pub all_domains: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // Overlays the command-line flags on the default configuration
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_pages: self.max_pages,
            same_domain_only: !self.all_domains,
            ..ScanConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["privacy-scanner", "--url", "https://a.example/"]).unwrap();
        assert_eq!(cli.url, "https://a.example/");
        assert_eq!(cli.rules, PathBuf::from("rules.yml"));

        let config = cli.scan_config();
        assert_eq!(config.max_pages, 40);
        assert!(config.same_domain_only);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "privacy-scanner",
            "--url",
            "https://a.example/",
            "--max-pages",
            "3",
            "--all-domains",
        ])
        .unwrap();

        let config = cli.scan_config();
        assert_eq!(config.max_pages, 3);
        assert!(!config.same_domain_only);
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["privacy-scanner"]).is_err());
    }
}
