//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// VocabAssess - field-usage assessment for SPARQL vocabulary endpoints
///
/// Walk the entities of a set of concept classes on a SPARQL endpoint,
/// count how often each property occurs, and print running bar-chart
/// reports of field usage.
///
/// Examples:
///   vocabassess
///   vocabassess --endpoint http://localhost:3030/ds/sparql --concept http://example.org/Thing
///   vocabassess --max-entities 100 --report-interval 25
///   vocabassess --reset-per-concept
///   vocabassess --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// SPARQL endpoint URL to query
    ///
    /// Can also be set via VOCABASSESS_ENDPOINT env var or
    /// .vocabassess.toml config.
    #[arg(
        short,
        long,
        value_name = "URL",
        default_value = "http://vocab.getty.edu/sparql",
        env = "VOCABASSESS_ENDPOINT"
    )]
    pub endpoint: String,

    /// Path to configuration file
    ///
    /// If not specified, looks for .vocabassess.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Concept class IRI to assess (repeatable)
    ///
    /// Overrides the configured concept classes. When omitted, the four
    /// Getty concept classes are assessed.
    #[arg(long = "concept", value_name = "IRI")]
    pub concepts: Vec<String>,

    /// Emit a state dump and bar report every N records
    #[arg(long, default_value = "500", value_name = "COUNT")]
    pub report_interval: u64,

    /// Delay before each entity-listing query, in milliseconds
    #[arg(long, default_value = "250", value_name = "MS")]
    pub list_delay_ms: u64,

    /// Delay before each per-entity usage query, in milliseconds
    ///
    /// Keep this generous: the default endpoint is a shared service.
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub entity_delay_ms: u64,

    /// Maximum number of entities to assess per concept class
    ///
    /// Useful for bounded test runs against a slow endpoint.
    #[arg(long, value_name = "COUNT")]
    pub max_entities: Option<usize>,

    /// Clear the aggregate before each concept class
    ///
    /// Default is cumulative statistics across all classes; with this
    /// flag each class is reported in isolation.
    #[arg(long)]
    pub reset_per_concept: bool,

    /// Request timeout in seconds
    ///
    /// Overrides the config file setting.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .vocabassess.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate endpoint URL format
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err("Endpoint URL must start with 'http://' or 'https://'".to_string());
        }

        // Validate report interval
        if self.report_interval == 0 {
            return Err("Report interval must be at least 1".to_string());
        }

        // Validate max entities if provided
        if let Some(max_entities) = self.max_entities {
            if max_entities == 0 {
                return Err("Max entities must be at least 1".to_string());
            }
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Concept classes must be absolute IRIs
        for concept in &self.concepts {
            if !concept.contains(':') || concept.contains(char::is_whitespace) {
                return Err(format!("Not an absolute IRI: '{}'", concept));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
