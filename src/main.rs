//! Blogdex-Crawl main entry point
//!
//! This is the command-line interface for the Blogdex-Crawl title harvester.

use anyhow::Context;
use blogdex_crawl::config::{load_config_with_hash, Config};
use blogdex_crawl::crawler::{CrawlTarget, Harvester, PlatformHint};
use blogdex_crawl::output::{print_report, to_json};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Blogdex-Crawl: finds the articles on a site and extracts their titles
///
/// Discovery uses the platform listing API for known blog hosts, otherwise
/// the site's sitemap, otherwise a shallow crawl from the homepage.
#[derive(Parser, Debug)]
#[command(name = "blogdex-crawl")]
#[command(version)]
#[command(about = "Discover a site's articles and extract their titles", long_about = None)]
struct Cli {
    /// Site or blog URL (https:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of titles to extract
    #[arg(short = 'n', long, default_value_t = 100)]
    max_items: usize,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Validate config and show what would be harvested without any network access
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let target = CrawlTarget::new(&cli.url, cli.max_items, &config.platform)
        .with_context(|| format!("Cannot harvest '{}'", cli.url))?;

    if cli.dry_run {
        handle_dry_run(&config, &target);
        return Ok(());
    }

    handle_harvest(config, &target, cli.json).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("blogdex_crawl=info,warn"),
            1 => EnvFilter::new("blogdex_crawl=debug,info"),
            2 => EnvFilter::new("blogdex_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings and the plan
fn handle_dry_run(config: &Config, target: &CrawlTarget) {
    println!("=== Blogdex-Crawl Dry Run ===\n");

    println!("Target:");
    println!("  URL: {}", target.base_url());
    println!("  Host: {}", target.host());
    println!("  Max items: {}", target.max_items());
    match target.platform_hint() {
        PlatformHint::NaverBlog => {
            println!("  Strategy: platform listing API ({})", config.platform.api_base);
            println!(
                "  Pages: up to {} of {} entries, {}ms apart",
                config.platform.max_pages, config.platform.page_size, config.platform.page_delay_ms
            );
        }
        PlatformHint::Generic => {
            println!("  Strategy: sitemap, then homepage crawl");
            println!("  Sitemap probes:");
            for path in &config.sitemap.paths {
                println!("    * {}{}", target.root(), path);
            }
        }
    }

    println!("\nCrawler Configuration:");
    println!("  Batch width: {}", config.crawler.batch_width);
    println!("  Batch delay: {}ms", config.crawler.batch_delay_ms);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!("  Homepage crawl depth: {}", config.crawler.crawl_depth);
    println!("  Frontier cap: {}", config.crawler.frontier_cap);
    println!(
        "  Candidates considered: {}",
        target
            .max_items()
            .saturating_mul(config.crawler.candidate_multiplier)
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nSkip Patterns ({}):", config.filter.skip_patterns.len());
    println!("  {}", config.filter.skip_patterns.join(" "));

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, target: &CrawlTarget, json: bool) -> anyhow::Result<()> {
    let mut harvester = Harvester::new(config).context("Failed to initialize harvester")?;

    let cancel = harvester.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current batch");
            cancel.cancel();
        }
    });

    let report = match harvester.run(target).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Harvest completed: {} of {} candidate(s) yielded titles",
        report.extracted_count,
        report.total_candidates
    );

    if json {
        println!("{}", to_json(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
