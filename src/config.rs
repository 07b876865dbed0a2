//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.vocabassess.toml` files, and holds the namespace constants used
//! to build the default concept-class list.

use crate::models::ConceptClass;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Getty Vocabulary Program ontology namespace.
pub const GVP_NS: &str = "http://vocab.getty.edu/ontology#";
/// schema.org namespace.
pub const SCHEMA_NS: &str = "http://schema.org/";
/// W3C WGS84 geo positioning namespace.
pub const WGS_NS: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint settings.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Request pacing settings.
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Concept classes to assess, in order.
    #[serde(default = "default_concepts")]
    pub concepts: Vec<ConceptClass>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            pacing: PacingConfig::default(),
            report: ReportConfig::default(),
            concepts: default_concepts(),
        }
    }
}

/// SPARQL endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint URL.
    #[serde(default = "default_endpoint_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_endpoint_url() -> String {
    "http://vocab.getty.edu/sparql".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("vocabassess/{}", env!("CARGO_PKG_VERSION"))
}

/// Fixed delays inserted before remote calls. The shared endpoint is
/// rate-limited by convention, not by the protocol, so the delays are
/// plain sleeps rather than anything adaptive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Delay before each entity-listing query, in milliseconds.
    #[serde(default = "default_list_delay_ms")]
    pub list_delay_ms: u64,

    /// Delay before each per-entity usage query, in milliseconds.
    #[serde(default = "default_entity_delay_ms")]
    pub entity_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            list_delay_ms: default_list_delay_ms(),
            entity_delay_ms: default_entity_delay_ms(),
        }
    }
}

fn default_list_delay_ms() -> u64 {
    250
}

fn default_entity_delay_ms() -> u64 {
    1000
}

/// Progress reporting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Emit a state dump and bar report every this many records. Tuned
    /// to the pacing so operators see progress during long runs.
    #[serde(default = "default_report_interval")]
    pub interval: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval: default_report_interval(),
        }
    }
}

fn default_report_interval() -> u64 {
    500
}

/// The four Getty concept classes, each paired with the schema class of
/// its real-world counterpart (documentation only).
fn default_concepts() -> Vec<ConceptClass> {
    vec![
        ConceptClass::paired(
            &format!("{GVP_NS}AdminPlaceConcept"),
            &format!("{SCHEMA_NS}Place"),
        ),
        ConceptClass::paired(
            &format!("{GVP_NS}PersonConcept"),
            &format!("{SCHEMA_NS}Person"),
        ),
        ConceptClass::paired(
            &format!("{GVP_NS}GroupConcept"),
            &format!("{SCHEMA_NS}Organization"),
        ),
        ConceptClass::paired(
            &format!("{GVP_NS}PhysPlaceConcept"),
            &format!("{WGS_NS}SpatialThing"),
        ),
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".vocabassess.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Endpoint and pacing - always override since they have defaults in CLI
        self.endpoint.url = args.endpoint.clone();
        self.pacing.list_delay_ms = args.list_delay_ms;
        self.pacing.entity_delay_ms = args.entity_delay_ms;
        self.report.interval = args.report_interval;

        // Timeout - only override if explicitly provided via CLI
        if let Some(timeout) = args.timeout {
            self.endpoint.timeout_seconds = timeout;
        }

        // Concepts - only override if provided; CLI-supplied classes
        // carry no real-world pairing
        if !args.concepts.is_empty() {
            self.concepts = args
                .concepts
                .iter()
                .map(|concept| ConceptClass::bare(concept))
                .collect();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
