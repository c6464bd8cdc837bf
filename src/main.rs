//! Main entry point for the automatch service
//!
//! Runs matching passes over a pool of seeks, either once from the command
//! line or periodically as a long-running service with health endpoints.

use anyhow::{anyhow, Context, Result};
use automatch::config::AppConfig;
use automatch::matching::{GroupAssembler, MatchRecord};
use automatch::requirement::load_seeks;
use automatch::service::{AppState, HealthCheck};
use automatch::utils::match_rng;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing::{error, info, warn};

/// Automatch - groups waiting seeks into hosted games
#[derive(Parser)]
#[command(
    name = "automatch",
    version,
    about = "Periodic matchmaking for waiting game seeks",
    long_about = "Automatch groups players' open seeks into games. Each pass tries rating tiers \
                 in priority order and party sizes from largest to smallest, sampling random \
                 candidate groups and keeping those with a legal host."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Seek file to load into the pool
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON array of seek records to load into the pool"
    )]
    seeks: Option<PathBuf>,

    /// Run a single pass and print the matches
    #[arg(long, help = "Run one pass over the seek file, print matches as JSON, and exit")]
    once: bool,

    /// Random seed override
    #[arg(long, value_name = "SEED", help = "Seed the pass random source")]
    seed: Option<u64>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP port override
    #[arg(long, value_name = "PORT", help = "Override health and metrics port")]
    http_port: Option<u16>,

    /// Pass interval override
    #[arg(long, value_name = "SECONDS", help = "Override seconds between passes")]
    interval_seconds: Option<u64>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Output of a one-shot pass
#[derive(Serialize)]
struct OnceReport {
    matches: Vec<MatchRecord>,
    unmatched: Vec<String>,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(port) = args.http_port {
        config.service.http_port = port;
    }
    if let Some(interval) = args.interval_seconds {
        config.scheduler.pass_interval_seconds = interval;
    }
    if let Some(seed) = args.seed {
        config.scheduler.rng_seed = Some(seed);
    }
    if let Some(seeks) = &args.seeks {
        config.scheduler.seek_file = Some(seeks.clone());
    }

    automatch::config::validate_config(&config)?;
    Ok(config)
}

/// Run a single pass and print the result to stdout
fn run_once(config: &AppConfig) -> Result<()> {
    let path = config
        .scheduler
        .seek_file
        .as_ref()
        .ok_or_else(|| anyhow!("--once needs a seek file (--seeks or SEEK_FILE)"))?;

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seek file {}", path.display()))?;
    let seeks = load_seeks(&contents)?;

    let assembler = GroupAssembler::new(config.matching.clone());
    let mut rng = match_rng(config.scheduler.rng_seed);
    let outcome = assembler.run_pass(&seeks, &mut rng);

    info!(
        "Pass complete - {} seeks, {} matches, {} unmatched",
        seeks.len(),
        outcome.matches.len(),
        outcome.unmatched.len()
    );

    let report = OnceReport {
        matches: outcome.matches.iter().map(|m| m.to_record()).collect(),
        unmatched: outcome
            .unmatched
            .iter()
            .map(|s| s.player.name.clone())
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Log service health periodically
async fn health_check_task(app_state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));

    while app_state.is_running().await {
        interval.tick().await;

        match HealthCheck::check(app_state.clone()).await {
            Ok(health) => {
                info!(
                    "Health check: {} - {} seeks waiting, {} passes, {} matches",
                    health.status,
                    health.stats.seeks_waiting,
                    health.stats.passes_run,
                    health.stats.matches_formed
                );
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
            }
        }
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("🚀 Automatch Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   HTTP port: {}", config.service.http_port);
    info!(
        "   Pass interval: {}s",
        config.scheduler.pass_interval_seconds
    );
    info!(
        "   Tiers: {:?}, sizes: {:?}, trials: {}",
        config.matching.tier_priority, config.matching.party_sizes, config.matching.max_trials
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    if args.once {
        return run_once(&config);
    }

    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::new(config.clone()).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app_state.start().await {
        error!("Failed to start service: {}", e);
        std::process::exit(1);
    }

    let health_task = {
        let app_state = app_state.clone();
        tokio::spawn(async move {
            health_check_task(app_state).await;
        })
    };

    info!("✅ Automatch service is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    wait_for_shutdown_signal().await;

    info!("🛑 Shutdown signal received, beginning graceful shutdown...");
    health_task.abort();

    match tokio::time::timeout(config.shutdown_timeout(), app_state.shutdown()).await {
        Ok(Ok(())) => info!("✅ Graceful shutdown completed successfully"),
        Ok(Err(e)) => warn!("Shutdown finished with errors: {}", e),
        Err(_) => warn!("⚠️  Shutdown timeout exceeded, forcing exit"),
    }

    info!("🛑 Automatch service stopped");
    Ok(())
}
