// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - crawl: crawl from a seed URL to a fixed depth, printing every URL found
// - links: fetch one page and print the links extracted from it
//
// All configuration comes from flags; there is no config file.
// =============================================================================

use clap::{Args, Parser, Subcommand};

use link_crawler::fetch::ExtractMode;

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl pages concurrently to a fixed depth, fetching each URL at most once",
    long_about = "link-crawler starts from a seed URL, fetches it, extracts its links and \
                  follows each of them concurrently until the depth limit is reached. \
                  Every URL is fetched at most once per run."
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a seed URL, printing each URL as it is found
    ///
    /// Example: link-crawler crawl https://example.com --max-depth 2
    Crawl {
        /// URL to start from
        seed_url: String,

        /// How many link hops to follow from the seed
        ///
        /// 0 = report the seed without fetching it
        /// 1 = fetch the seed and report its links
        /// 2 = also fetch those links and report theirs
        #[arg(long, default_value_t = 2)]
        max_depth: usize,

        /// Print events as JSON lines instead of "Found: <url>"
        #[arg(long)]
        json: bool,

        /// Also print pages whose fetch failed
        #[arg(long)]
        show_errors: bool,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Fetch a single page and print the links found on it
    ///
    /// Example: link-crawler links https://example.com --mode html
    Links {
        /// Page to fetch
        url: String,

        /// Print the links as a JSON array
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

/// HTTP and extraction settings shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// How links are found in a page
    #[arg(long, value_enum, default_value_t = ExtractMode::Text)]
    pub mode: ExtractMode,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::parse_from(["link-crawler", "crawl", "https://example.com"]);
        match cli.command {
            Commands::Crawl {
                seed_url,
                max_depth,
                json,
                show_errors,
                fetch,
            } => {
                assert_eq!(seed_url, "https://example.com");
                assert_eq!(max_depth, 2);
                assert!(!json);
                assert!(!show_errors);
                assert_eq!(fetch.mode, ExtractMode::Text);
                assert_eq!(fetch.timeout_secs, 10);
                assert!(fetch.user_agent.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_links_with_flags() {
        let cli = Cli::parse_from([
            "link-crawler",
            "links",
            "https://example.com",
            "--mode",
            "html",
            "--timeout-secs",
            "3",
            "--json",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Links { url, json, fetch } => {
                assert_eq!(url, "https://example.com");
                assert!(json);
                assert_eq!(fetch.mode, ExtractMode::Html);
                assert_eq!(fetch.timeout_secs, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["link-crawler", "links", "https://example.com", "--mode", "xml"]);
        assert!(result.is_err());
    }
}
