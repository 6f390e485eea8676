//! CLI module for the parts search client
//!
//! Provides subcommands:
//! - `search`: run one search and print the result envelope
//! - `availability`: print a part's peak availability
//! - `shell`: drive the debounced search pipeline from stdin

pub mod availability;
pub mod search;
pub mod shell;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Parts Search - cached client for the parts search API
#[derive(Parser)]
#[command(name = "parts-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Search API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a single search
    Search(search::SearchArgs),

    /// Show peak availability for a part
    Availability(availability::AvailabilityArgs),

    /// Interactive search session backed by the pipeline
    Shell,
}

/// Loads `.env` and layered config, applies CLI overrides, and starts logging
pub(crate) fn prepare(api_url: Option<String>) -> AppConfig {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();

    if let Some(api_url) = api_url {
        config.api.base_url = api_url;
    }

    logging::init_logging(&config.logging);

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SearchBy, SortDirection};

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "parts-search",
            "--api-url",
            "http://parts.local",
            "search",
            "abc",
            "--by",
            "supplierSku",
            "--branch",
            "NYC",
            "--branch",
            "LA",
            "--only-available",
            "--page",
            "2",
            "--sort",
            "availableQty:desc",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://parts.local"));

        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        let query = args.to_query();

        assert_eq!(query.criteria, "abc");
        assert_eq!(query.by, SearchBy::SupplierSku);
        assert_eq!(query.branches, vec!["NYC".to_string(), "LA".to_string()]);
        assert!(query.only_available);
        assert_eq!(query.page, Some(2));
        assert_eq!(query.size, None);
        assert_eq!(query.sort.map(|s| s.direction), Some(SortDirection::Desc));
    }

    #[test]
    fn test_parse_rejects_unknown_search_field() {
        let result = Cli::try_parse_from(["parts-search", "search", "abc", "--by", "colour"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_availability_and_shell() {
        let cli = Cli::try_parse_from(["parts-search", "availability", "ABC-1"]).unwrap();
        assert!(matches!(cli.command, Command::Availability(ref a) if a.part_number == "ABC-1"));

        let cli = Cli::try_parse_from(["parts-search", "shell"]).unwrap();
        assert!(matches!(cli.command, Command::Shell));
    }
}
