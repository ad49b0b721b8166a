// Build script to generate JSON schema for configuration

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Re-define the Config struct with JsonSchema derive
// These mirror src/config.rs, src/baseline.rs and src/payload.rs field for field; the
// config_examples tests compare the generated schema with the library types

/// A Configuration structure
#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct Config {
    /// Fixtures to check
    #[serde(default)]
    pub fixtures: Vec<FixtureDef>,
    /// Report output
    #[serde(default)]
    pub report: ReportConf,
}

/// A fixture file and the contract it has to hold
#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct FixtureDef {
    /// Fixture name used in reports
    pub name: String,
    /// File path or glob pattern, relative to the configuration file
    pub path: String,
    /// Exact number of records
    pub expected_records: Option<usize>,
    /// Friends every record lists (default: 3)
    #[serde(default = "default_friends_per_record")]
    pub friends_per_record: usize,
    /// Run per-field format checks (default: true)
    #[serde(default = "default_check_formats")]
    pub check_formats: bool,
    /// Expected encoded size
    pub baseline: Option<SizeBaseline>,
    /// Pinned hex SHA-256 of the compact encoding
    pub fingerprint: Option<String>,
    /// Request body limit of the consumer
    pub payload_limit: Option<PayloadLimit>,
}

/// JSON layout a baseline is measured on
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Compact,
    Pretty,
}

/// Expected encoded size of a fixture
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct SizeBaseline {
    /// Expected byte length
    pub bytes: u64,
    /// Allowed drift in percent of `bytes` (default: 5)
    #[serde(default = "default_tolerance_pct")]
    pub tolerance_pct: f64,
    /// Encoding the length is measured on (default: compact)
    #[serde(default)]
    pub encoding: Encoding,
}

/// Maximum accepted request body size
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema)]
pub struct PayloadLimit {
    /// Limit in bytes
    pub max_bytes: u64,
}

/// Report output configuration
#[derive(Clone, Debug, Default, Deserialize, JsonSchema)]
pub struct ReportConf {
    /// Output format (default: text)
    #[serde(default)]
    pub format: ReportFormat,
}

/// Supported report formats
#[derive(Clone, Copy, Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per fixture and violation
    #[default]
    Text,
    /// Reports as a JSON array
    Json,
}

fn default_friends_per_record() -> usize {
    3
}

fn default_check_formats() -> bool {
    true
}

fn default_tolerance_pct() -> f64 {
    5.0
}

fn main() {
    println!("cargo:rerun-if-changed=src/config.rs");
    println!("cargo:rerun-if-changed=src/baseline.rs");
    println!("cargo:rerun-if-changed=src/payload.rs");

    // Generate JSON schema
    let schema = schema_for!(Config);
    let schema_json = serde_json::to_string_pretty(&schema).expect("Failed to serialize schema");

    // Create doc/schemas directory if it doesn't exist
    let schemas_dir = Path::new("doc/schemas");
    if !schemas_dir.exists() {
        fs::create_dir_all(schemas_dir).expect("Failed to create doc/schemas directory");
    }

    // Write schema to file
    let schema_path = schemas_dir.join("config-schema.json");
    fs::write(&schema_path, schema_json).expect("Failed to write config-schema.json");

    println!("Generated JSON schema at: {:?}", schema_path);
}
