//! Fixture checker configuration
//!
//! # Example configuration
//! ```yaml
//! ---
//! fixtures:
//!   - name: json-515kb
//!     path: fixtures/json-515kb.json
//!     expected_records: 720
//!     friends_per_record: 3
//!     baseline:
//!       bytes: 516627
//!       tolerance_pct: 2.0
//!       encoding: compact
//!     payload_limit:
//!       max_bytes: 1048576
//! report:
//!   format: text
//! ```

use glob::glob;

use schemars::JsonSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use config::{Environment, File};

use crate::baseline::SizeBaseline;
use crate::contract::ContractOptions;
use crate::payload::PayloadLimit;
use crate::types::FixtureError;

/// A Configuration structure
#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct Config {
    /// Fixtures to check
    #[serde(default)]
    pub fixtures: Vec<FixtureDef>,
    /// Report output
    #[serde(default)]
    pub report: ReportConf,
    /// Directory relative fixture paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Returns a configuration object from a yaml config file path with merged values from
    /// environment variables prefixed with "JF". When setting values in the environment variables
    /// use "__" for sublements separator.
    pub fn new(config_file: &str) -> Result<Self, FixtureError> {
        let path = Path::new(config_file)
            .canonicalize()
            .map_err(|source| FixtureError::Io {
                path: PathBuf::from(config_file),
                source,
            })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut s = config::Config::builder()
            // Start off by merging in the requested configuration file
            .add_source(File::from(path.as_path()));

        // Read and merge conf.d config parts
        let configs_glob = format!("{}/conf.d/*.yaml", base_dir.display());
        tracing::trace!("Analyzing {:?} as conf.d parts", configs_glob);
        let parts = glob(configs_glob.as_str()).map_err(|e| FixtureError::Pattern {
            pattern: configs_glob.clone(),
            reason: e.to_string(),
        })?;
        for entry in parts {
            tracing::debug!("Add {:?} config part file", entry);
            if let Ok(path) = entry {
                s = s.add_source(File::from(path.as_path()));
            }
        }

        // merge environment variables (subelements separated by "__")
        // JF_REPORT__FORMAT goes to report.format
        s = s.add_source(
            Environment::with_prefix("JF")
                .prefix_separator("_")
                .separator("__"),
        );

        let mut config: Config = s.build()?.try_deserialize()?;
        config.base_dir = base_dir;
        Ok(config)
    }

    /// Returns a configuration object from a string representing configuration file. Relative
    /// fixture paths resolve against the current directory.
    pub fn from_config_str(data: &str) -> Result<Self, FixtureError> {
        let s = config::Config::builder()
            .add_source(File::from_str(data, config::FileFormat::Yaml))
            .build()?;
        let mut config: Config = s.try_deserialize()?;
        config.base_dir = PathBuf::from(".");
        Ok(config)
    }

    /// Absolute or base_dir relative location of a fixture path
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
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

impl FixtureDef {
    pub fn contract_options(&self) -> ContractOptions {
        ContractOptions {
            friends_per_record: self.friends_per_record,
            expected_records: self.expected_records,
            check_formats: self.check_formats,
        }
    }
}

fn default_friends_per_record() -> usize {
    3
}

fn default_check_formats() -> bool {
    true
}

/// Report output configuration
#[derive(Clone, Debug, Default, Deserialize, JsonSchema)]
pub struct ReportConf {
    /// Output format (default: text)
    #[serde(default)]
    pub format: ReportFormat,
}

/// Supported report formats
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, JsonSchema, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per fixture and violation
    #[default]
    Text,
    /// Reports as a JSON array
    Json,
}
