//! VocabAssess - SPARQL vocabulary field-usage assessor
//!
//! A CLI tool that walks the entities of a set of concept classes on a
//! SPARQL endpoint, counts how often each property occurs on them, and
//! prints running bar-chart reports of field usage.
//!
//! Exit codes:
//!   0 - Success (all concept classes assessed)
//!   1 - Runtime error (connection, config, malformed results, etc.)

mod cli;
mod config;
mod driver;
mod error;
mod models;
mod report;
mod sparql;
mod stats;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::Config;
use driver::RunOptions;
use models::AggregateState;
use sparql::SparqlClient;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("VocabAssess v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the assessment
    match run_assessment(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Assessment failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .vocabassess.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".vocabassess.toml");

    if path.exists() {
        eprintln!("⚠️  .vocabassess.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .vocabassess.toml")?;

    println!("✅ Created .vocabassess.toml with default settings.");
    println!("   Edit it to customize the endpoint, pacing, and concept classes.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete assessment workflow.
async fn run_assessment(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let statistics_mode = if args.reset_per_concept {
        "per-class (reset between classes)"
    } else {
        "cumulative"
    };

    println!("🔎 Assessing {} concept classes", config.concepts.len());
    println!("   Endpoint: {}", config.endpoint.url);
    println!(
        "   Pacing: {}ms before listings, {}ms before each entity",
        config.pacing.list_delay_ms, config.pacing.entity_delay_ms
    );
    println!("   Report interval: {} records", config.report.interval);
    println!("   Statistics: {}", statistics_mode);
    println!();

    // Build the endpoint client once; it is read-only for the whole run
    let client = SparqlClient::new(&config.endpoint)?;

    let options = RunOptions {
        report_interval: config.report.interval,
        list_delay: Duration::from_millis(config.pacing.list_delay_ms),
        entity_delay: Duration::from_millis(config.pacing.entity_delay_ms),
        max_entities: args.max_entities,
        reset_per_concept: args.reset_per_concept,
        show_progress: !args.quiet,
    };

    // The single shared aggregate for the whole run
    let mut state = AggregateState::new();

    let summary = driver::run(&client, &config.concepts, &mut state, &options).await?;

    let duration = start_time.elapsed().as_secs_f64();

    println!("\n📊 Assessment Summary:");
    println!("   Concept classes: {}", summary.concepts_processed);
    println!("   Records assessed: {}", summary.records_processed);
    println!("   Distinct fields: {}", summary.distinct_fields);
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Assessment complete at {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .vocabassess.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
