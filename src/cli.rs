//! Command-line interface definitions for feedforge.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the feedforge application.
///
/// Which feeds to generate and how to extract them lives in the YAML
/// configuration file; the CLI only decides where inputs and outputs live
/// and which configured feeds this run covers.
///
/// # Examples
///
/// ```sh
/// # Generate every configured feed into ./feeds
/// feedforge -c feeds.yaml -o ./feeds
///
/// # Regenerate a single feed and keep a JSON dump of the records
/// feedforge -c feeds.yaml -o ./feeds -j ./json -f wire
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML feed configuration file
    #[arg(short, long, default_value = "feeds.yaml")]
    pub config: String,

    /// Directory where the RSS feed files are written
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Optional directory for JSON dumps of the extracted records
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Only process the named feed (repeatable); default is all configured feeds
    #[arg(short = 'f', long = "feed")]
    pub feeds: Vec<String>,

    /// HTTP timeout in seconds for page fetches
    #[arg(long, env = "FEEDFORGE_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["feedforge"]);
        assert_eq!(cli.config, "feeds.yaml");
        assert_eq!(cli.output_dir, ".");
        assert_eq!(cli.json_output_dir, None);
        assert!(cli.feeds.is_empty());
        assert_eq!(cli.timeout_secs, 15);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "feedforge", "-c", "/tmp/feeds.yaml", "-o", "/tmp/out", "-j", "/tmp/json",
        ]);
        assert_eq!(cli.config, "/tmp/feeds.yaml");
        assert_eq!(cli.output_dir, "/tmp/out");
        assert_eq!(cli.json_output_dir, Some("/tmp/json".to_string()));
    }

    #[test]
    fn test_cli_repeatable_feed_filter() {
        let cli = Cli::parse_from(["feedforge", "-f", "wire", "--feed", "briefing"]);
        assert_eq!(cli.feeds, vec!["wire".to_string(), "briefing".to_string()]);
    }
}
