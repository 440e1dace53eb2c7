//! Site Auditor main entry point
//!
//! This is the command-line interface for the site auditor.

use anyhow::Context;
use clap::Parser;
use site_auditor::config::{load_config_with_hash, validate, Config};
use site_auditor::crawler::run_audit_crawl;
use site_auditor::noise::NoisePolicy;
use site_auditor::output::{
    print_statistics, write_all, AuditReport, AuditStatistics, MarkdownSummary, SqliteExporter,
};
use site_auditor::performance::PerformanceAugmenter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site Auditor: a bounded breadth-first website auditor
///
/// Crawls one site from a start URL, records every page's SEO signals,
/// builds the internal link graph, groups exact duplicates and flags
/// title, description and image problems. Results are exported to SQLite
/// and summarized in markdown.
#[derive(Parser, Debug)]
#[command(name = "site-auditor")]
#[command(version)]
#[command(about = "A bounded breadth-first website auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be audited without crawling
    #[arg(long)]
    dry_run: bool,

    /// Override the configured start URL
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Override the performance API key
    #[arg(long, value_name = "KEY", conflicts_with = "no_performance")]
    psi_key: Option<String>,

    /// Skip the performance pass even if a key is configured
    #[arg(long)]
    no_performance: bool,

    /// Override the noise policy
    #[arg(long, value_name = "POLICY")]
    noise_policy: Option<NoisePolicy>,

    /// Print statistics after the export
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration after command-line overrides")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_audit(config, config_hash, cli.stats).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_auditor=info,warn"),
            1 => EnvFilter::new("site_auditor=debug,info"),
            2 => EnvFilter::new("site_auditor=trace,debug"),
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

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(policy) = cli.noise_policy {
        config.crawler.noise_policy = policy;
    }
    if let Some(key) = &cli.psi_key {
        config.performance.api_key = Some(key.clone());
    }
    if cli.no_performance {
        config.performance.api_key = None;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Site Auditor Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Delay: {}ms", config.crawler.delay_ms);
    println!("  Same host only: {}", config.crawler.same_host);
    println!("  Keep query params: {}", config.crawler.include_params);
    println!("  Noise policy: {}", config.crawler.noise_policy);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nLimits:");
    let limits = &config.limits;
    println!("  Title: {}-{} chars", limits.title_min, limits.title_max);
    println!("  Meta description: {}-{} chars", limits.meta_min, limits.meta_max);
    println!("  Image alt: {}-{} chars", limits.alt_min, limits.alt_max);

    println!("\nPerformance:");
    if config.performance.api_key.is_some() {
        let strategies: Vec<&str> = config.performance.strategies.iter().map(|s| s.as_str()).collect();
        println!("  Top {} pages, strategies: {}", config.performance.max_urls, strategies.join(", "));
    } else {
        println!("  Disabled (no API key)");
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main audit: crawl, score, assemble, export
async fn handle_audit(config: Config, config_hash: String, show_stats: bool) -> anyhow::Result<()> {
    let started_at = chrono::Utc::now();

    let mut session = run_audit_crawl(&config).await.context("crawl failed to start")?;

    let augmenter = PerformanceAugmenter::new(&config.performance, &config.user_agent)
        .context("failed to build performance client")?;
    augmenter.augment(&mut session).await;

    let mut report = AuditReport::build(&session, &config.limits, config.crawler.noise_policy);
    report.run.config_hash = config_hash;
    report.run.started_at = started_at;
    report.run.finished_at = chrono::Utc::now();

    let sqlite = SqliteExporter::new(&config.output.database_path);
    let markdown = MarkdownSummary::new(&config.output.summary_path);
    write_all(&report, &[&sqlite, &markdown]).context("failed to write audit output")?;

    tracing::info!(
        "Audit complete: {} pages exported, {} with issues",
        report.pages.len(),
        report.issues.len()
    );

    if show_stats {
        print_statistics(&AuditStatistics::from_report(&report));
    }

    Ok(())
}
