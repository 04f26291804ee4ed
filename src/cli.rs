//! Command-line interface parsing for storeview
//!
//! This module handles parsing of CLI arguments using clap. Every option can
//! also be set through an environment variable.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::data::catalog::{DEFAULT_BASE_URL, DEFAULT_CATEGORIES_PATH};
use crate::data::SortOrder;
use crate::logging;
use crate::store::FilterState;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The sort value is not one of asc, desc
    #[error("Invalid sort order: '{0}'. Valid values: asc, desc")]
    InvalidSort(String),

    /// The base URL cannot have endpoint paths appended
    #[error("Invalid base URL: '{0}'. Expected an http(s) URL")]
    InvalidBaseUrl(String),

    /// A zero staleness window would refetch on every request
    #[error("Invalid staleness window: must be at least 1 second")]
    InvalidStaleTime,
}

/// storeview - Browse a product catalog in the terminal
#[derive(Parser, Debug)]
#[command(name = "storeview")]
#[command(about = "Browse a product catalog with category filters and sort order")]
#[command(version)]
pub struct Cli {
    /// Base URL of the catalog API
    #[arg(long, env = "STOREVIEW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the category list endpoint, relative to the base URL
    #[arg(long, env = "STOREVIEW_CATEGORIES_PATH", default_value = DEFAULT_CATEGORIES_PATH)]
    pub categories_path: String,

    /// Category selected at startup (empty for all categories)
    ///
    /// Examples:
    ///   storeview --category electronics
    ///   storeview --category "men's clothing" --sort desc
    #[arg(long, env = "STOREVIEW_CATEGORY", default_value = "")]
    pub category: String,

    /// Sort order at startup: asc or desc (empty for unsorted)
    #[arg(long, env = "STOREVIEW_SORT", default_value = "", value_name = "ORDER")]
    pub sort: String,

    /// Seconds a loaded product list is reused before it is fetched again
    #[arg(long, env = "STOREVIEW_STALE_SECS", default_value_t = 120, value_name = "SECONDS")]
    pub stale_secs: u64,

    /// Log file location (defaults to the platform cache directory)
    #[arg(long, env = "STOREVIEW_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Base URL of the catalog API
    pub base_url: Url,
    /// Category list path relative to the base URL
    pub categories_path: String,
    /// Initial filter selection
    pub initial_filters: FilterState,
    /// Staleness window of the query cache
    pub stale_time: Duration,
    /// Where log output goes, if anywhere
    pub log_file: Option<PathBuf>,
}

/// Parses a sort argument into a SortOrder.
///
/// # Returns
/// * `Ok(SortOrder)` for `""`, `asc` or `desc` (any case)
/// * `Err(CliError::InvalidSort)` otherwise
pub fn parse_sort_arg(s: &str) -> Result<SortOrder, CliError> {
    s.parse()
        .map_err(|_| CliError::InvalidSort(s.to_string()))
}

/// Parses and checks a base URL argument.
pub fn parse_base_url_arg(s: &str) -> Result<Url, CliError> {
    let url = Url::parse(s).map_err(|_| CliError::InvalidBaseUrl(s.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::InvalidBaseUrl(s.to_string()));
    }
    Ok(url)
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if a value is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let base_url = parse_base_url_arg(&cli.base_url)?;
        let sort_order = parse_sort_arg(&cli.sort)?;
        if cli.stale_secs == 0 {
            return Err(CliError::InvalidStaleTime);
        }

        Ok(StartupConfig {
            base_url,
            categories_path: cli.categories_path.clone(),
            initial_filters: FilterState {
                selected_category: cli.category.trim().to_string(),
                sort_order,
                has_loaded_categories: false,
            },
            stale_time: Duration::from_secs(cli.stale_secs),
            log_file: cli.log_file.clone().or_else(logging::default_log_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["storeview"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_parse_sort_arg() {
        assert_eq!(parse_sort_arg("").unwrap(), SortOrder::Unsorted);
        assert_eq!(parse_sort_arg("asc").unwrap(), SortOrder::Asc);
        assert_eq!(parse_sort_arg("Desc").unwrap(), SortOrder::Desc);
    }

    #[test]
    fn test_parse_sort_arg_invalid() {
        let err = parse_sort_arg("random").unwrap_err();
        assert!(err.to_string().contains("Invalid sort order"));
        assert!(err.to_string().contains("random"));
    }

    #[test]
    fn test_parse_base_url_arg() {
        assert!(parse_base_url_arg("https://fakestoreapi.com").is_ok());
        assert!(parse_base_url_arg("http://127.0.0.1:3000/api/").is_ok());
        assert!(parse_base_url_arg("not a url").is_err());
        assert!(parse_base_url_arg("mailto:shop@example.com").is_err());
        assert!(parse_base_url_arg("ftp://example.com").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.categories_path, DEFAULT_CATEGORIES_PATH);
        assert_eq!(cli.category, "");
        assert_eq!(cli.sort, "");
        assert_eq!(cli.stale_secs, 120);
    }

    #[test]
    fn test_startup_config_defaults() {
        let config = StartupConfig::from_cli(&parse(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "https://fakestoreapi.com/");
        assert_eq!(config.initial_filters, FilterState::default());
        assert_eq!(config.stale_time, Duration::from_secs(120));
    }

    #[test]
    fn test_startup_config_with_filters() {
        let cli = parse(&["--category", "jewelery", "--sort", "desc", "--stale-secs", "30"]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.initial_filters.selected_category, "jewelery");
        assert_eq!(config.initial_filters.sort_order, SortOrder::Desc);
        assert!(!config.initial_filters.has_loaded_categories);
        assert_eq!(config.stale_time, Duration::from_secs(30));
    }

    #[test]
    fn test_startup_config_explicit_log_file() {
        let cli = parse(&["--log-file", "/tmp/storeview-test.log"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/storeview-test.log")));
    }

    #[test]
    fn test_startup_config_invalid_sort() {
        let result = StartupConfig::from_cli(&parse(&["--sort", "sideways"]));
        assert!(matches!(result, Err(CliError::InvalidSort(_))));
    }

    #[test]
    fn test_startup_config_invalid_base_url() {
        let result = StartupConfig::from_cli(&parse(&["--base-url", "nope"]));
        assert!(matches!(result, Err(CliError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_startup_config_zero_stale_time() {
        let result = StartupConfig::from_cli(&parse(&["--stale-secs", "0"]));
        assert!(matches!(result, Err(CliError::InvalidStaleTime)));
    }
}
