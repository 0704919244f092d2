// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout only carries crawl output)
// 3. Dispatch to the subcommand handler
// 4. Exit with proper code (0 = success, 2 = error, 130 = interrupted)
// =============================================================================

// The crawl and fetch modules live in the library (src/lib.rs);
// only argument parsing is private to the binary.
mod cli; // src/cli.rs - command-line parsing

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use cli::{Cli, Commands, FetchArgs};
use link_crawler::crawl::{crawl_with_cancel, event_channel, CrawlEvent};
use link_crawler::fetch::{FetchConfig, Fetcher, HttpFetcher};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins if set; otherwise info, or debug with --verbose
fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,link_crawler=debug"
    } else {
        "warn,link_crawler=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Crawl {
            seed_url,
            max_depth,
            json,
            show_errors,
            fetch,
        } => handle_crawl(seed_url, max_depth, json, show_errors, &fetch).await,
        Commands::Links { url, json, fetch } => handle_links(&url, json, &fetch).await,
    }
}

fn build_fetcher(args: &FetchArgs) -> Result<HttpFetcher> {
    let mut config = FetchConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        mode: args.mode,
        ..FetchConfig::default()
    };
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = user_agent.clone();
    }

    HttpFetcher::new(&config).context("failed to build HTTP client")
}

fn validate_url(url: &str) -> Result<()> {
    Url::parse(url).with_context(|| format!("invalid URL '{}'", url))?;
    Ok(())
}

// Handles the 'crawl' subcommand
//
// The crawl runs in its own task while this function prints events as they
// arrive. The event channel closes once the crawl and every task it spawned
// are finished, which ends the print loop.
async fn handle_crawl(
    seed_url: String,
    max_depth: usize,
    json: bool,
    show_errors: bool,
    args: &FetchArgs,
) -> Result<i32> {
    validate_url(&seed_url)?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(build_fetcher(args)?);

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, finishing in-flight visits");
                cancel.cancel();
            }
        })
    };

    let (tx, mut rx) = event_channel();
    let crawl_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            crawl_with_cancel(&seed_url, max_depth, fetcher, Some(tx), cancel).await;
        })
    };

    let mut summary = Summary::default();
    while let Some(event) = rx.recv().await {
        summary.count(&event);
        print_event(&event, json, show_errors)?;
    }

    crawl_task.await.context("crawl task failed")?;
    ctrl_c.abort();

    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   🔎 Found: {}", summary.found);
    eprintln!("   ✅ Fetched: {}", summary.fetched);
    eprintln!("   ❌ Failed: {}", summary.failed);

    if cancel.is_cancelled() {
        Ok(130)
    } else {
        Ok(0)
    }
}

// Handles the 'links' subcommand
async fn handle_links(url: &str, json: bool, args: &FetchArgs) -> Result<i32> {
    validate_url(url)?;
    let fetcher = build_fetcher(args)?;

    let links = fetcher.fetch(url).await?;
    info!(url = %url, links = links.len(), "page fetched");

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        for link in &links {
            println!("{}", link);
        }
    }
    Ok(0)
}

// Prints one crawl event to stdout
//
// Text output only shows "Found:" lines (and "Failed:" with --show-errors);
// JSON output shows fetches too.
fn print_event(event: &CrawlEvent, json: bool, show_errors: bool) -> Result<()> {
    if matches!(event, CrawlEvent::Failed { .. }) && !show_errors {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    match event {
        CrawlEvent::Found { url, .. } => println!("Found: {}", url),
        CrawlEvent::Failed { url, error } => println!("Failed: {} ({})", url, error),
        CrawlEvent::Fetched { .. } => {}
    }
    Ok(())
}

// Event counts for the end-of-crawl summary
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    found: usize,
    fetched: usize,
    failed: usize,
}

impl Summary {
    fn count(&mut self, event: &CrawlEvent) {
        match event {
            CrawlEvent::Found { .. } => self.found += 1,
            CrawlEvent::Fetched { .. } => self.fetched += 1,
            CrawlEvent::Failed { .. } => self.failed += 1,
        }
    }
}
