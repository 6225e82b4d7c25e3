//! Sumi-Mirror main entry point
//!
//! This is the command-line interface for the Sumi-Mirror static site mirror.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use sumi_mirror::config::{read_config_with_hash, validate, Config};
use sumi_mirror::crawler::run_mirror;
use sumi_mirror::output::print_statistics;
use sumi_mirror::robots::mirror_robots;
use tracing_subscriber::EnvFilter;

/// Sumi-Mirror: a static mirror for dynamic websites
///
/// Sumi-Mirror crawls a single site, saves every page and asset it links to,
/// and rewrites absolute links so the copy can be served from anywhere.
#[derive(Parser, Debug)]
#[command(name = "sumi-mirror")]
#[command(version)]
#[command(about = "A static mirror for dynamic websites", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true, env = "SUMI_MIRROR_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mirror the site into the output directory
    Scrape(ScrapeArgs),

    /// Save the site's robots.txt, rewritten for the replacement URL
    Robots(RobotsArgs),
}

/// Flags shared by every subcommand
#[derive(Args, Debug)]
struct SiteArgs {
    /// URL of the site to mirror
    #[arg(long, env = "SUMI_MIRROR_URL")]
    url: Option<String>,

    /// Directory to save downloaded files
    #[arg(long, env = "SUMI_MIRROR_DIR")]
    dir: Option<PathBuf>,

    /// Replace origin links with this URL instead of making them relative
    #[arg(long, env = "SUMI_MIRROR_REPLACE_URL")]
    replace_url: Option<String>,
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Fetch several resources at once
    #[arg(long)]
    parallel: bool,

    /// Fetch one resource at a time, overriding `parallel = true` in the config file
    #[arg(long, conflicts_with = "parallel")]
    no_parallel: bool,

    /// Upper bound on in-flight fetches with --parallel
    #[arg(long, value_name = "N")]
    max_concurrent_fetches: Option<usize>,

    /// Save bodies verbatim instead of rewriting origin links
    #[arg(long)]
    no_replace: bool,

    /// Skip the HEAD request before each download
    #[arg(long)]
    no_check_head: bool,

    /// Additional page to crawl (repeatable)
    #[arg(long = "extra-page", value_name = "URL")]
    extra_pages: Vec<String>,

    /// Validate the configuration and show what would be mirrored without fetching
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct RobotsArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Output robots file name
    #[arg(long)]
    file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Scrape(args) => {
            apply_scrape_args(&mut config, &args);
            validate(&config).context("Invalid configuration")?;

            if args.dry_run {
                handle_dry_run(&config);
                Ok(())
            } else {
                handle_scrape(config).await
            }
        }
        Command::Robots(args) => {
            apply_site_args(&mut config, &args.site);
            if let Some(file) = args.file {
                config.robots.file = file;
            }
            validate(&config).context("Invalid configuration")?;
            handle_robots(&config).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_mirror=info,warn"),
            1 => EnvFilter::new("sumi_mirror=debug,info"),
            2 => EnvFilter::new("sumi_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn apply_site_args(config: &mut Config, site: &SiteArgs) {
    if let Some(url) = &site.url {
        config.mirror.url = url.clone();
    }
    if let Some(dir) = &site.dir {
        config.mirror.dir = dir.clone();
    }
    if let Some(replace_url) = &site.replace_url {
        config.mirror.replace_url = Some(replace_url.clone());
    }
}

fn apply_scrape_args(config: &mut Config, args: &ScrapeArgs) {
    apply_site_args(config, &args.site);

    if args.parallel {
        config.mirror.parallel = true;
    }
    if args.no_parallel {
        config.mirror.parallel = false;
    }
    if let Some(max) = args.max_concurrent_fetches {
        config.mirror.max_concurrent_fetches = max;
    }
    if args.no_replace {
        config.mirror.replace = false;
    }
    if args.no_check_head {
        config.mirror.check_head = false;
    }
    config.mirror.extra_pages.extend(args.extra_pages.iter().cloned());
}

/// Handles the --dry-run mode: shows what would be mirrored
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Mirror Dry Run ===\n");

    println!("Mirror:");
    println!("  Site: {}", config.mirror.url);
    println!("  Output directory: {}", config.mirror.dir.display());
    println!(
        "  Rewrite links: {}",
        match (config.mirror.replace, config.mirror.replacement()) {
            (false, _) => "off".to_string(),
            (true, Some(replacement)) => format!("to {}", replacement),
            (true, None) => "to relative".to_string(),
        }
    );
    println!("  Concurrent fetches: {}", config.mirror.concurrency());
    println!("  HEAD check: {}", config.mirror.check_head);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    for (name, value) in &config.http.headers {
        println!("  Header: {}: {}", name, value);
    }

    println!(
        "\nBootstrap Probes ({}):",
        config.mirror.bootstrap_probes.len()
    );
    for probe in &config.mirror.bootstrap_probes {
        println!("  - {}", probe);
    }

    println!("\nExtra Pages ({}):", config.mirror.extra_pages.len());
    for page in &config.mirror.extra_pages {
        println!("  - {}", page);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main mirror operation
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    let site = config.mirror.url.clone();
    let stats = run_mirror(config)
        .await
        .with_context(|| format!("Mirror of {} failed", site))?;

    println!();
    print_statistics(&stats);
    Ok(())
}

/// Handles the robots subcommand
async fn handle_robots(config: &Config) -> anyhow::Result<()> {
    let mirrored = mirror_robots(config)
        .await
        .with_context(|| format!("Failed to mirror robots.txt for {}", config.mirror.url))?;

    println!("{}", mirrored.content);
    Ok(())
}
