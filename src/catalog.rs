//! Fixture catalog
//!
//! Resolves the fixtures listed in the configuration to files on disk and runs the complete
//! contract over each of them: field-set homogeneity on the raw document first, then the typed
//! invariants, a JSON round trip, size baseline, pinned fingerprint and payload limit.
use crate::baseline::{check_fingerprint, fingerprint};
use crate::codec::{round_trip, JsonCodec};
use crate::config::{Config, FixtureDef};
use crate::contract::{check_records, check_schema, ContractReport, Violation};
use crate::store::FixtureStore;
use crate::types::FixtureError;
use glob::glob;
use std::path::{Path, PathBuf};

/// Fixture file resolved from a [`FixtureDef`]
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub name: String,
    pub path: PathBuf,
    pub def: FixtureDef,
}

impl CatalogEntry {
    /// Read the fixture text
    pub fn source(&self) -> Result<String, FixtureError> {
        std::fs::read_to_string(&self.path).map_err(|source| FixtureError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Decode the fixture
    pub fn store(&self) -> Result<FixtureStore, FixtureError> {
        FixtureStore::from_path(&self.name, &self.path)
    }

    /// Run every configured check. A fixture that cannot be read or decoded is reported as
    /// [`Violation::Unreadable`].
    pub fn check(&self) -> ContractReport {
        self.run_checks().unwrap_or_else(|e| {
            let mut report = ContractReport::new(&self.name, 0);
            report.push(Violation::Unreadable {
                reason: e.to_string(),
            });
            report
        })
    }

    fn run_checks(&self) -> Result<ContractReport, FixtureError> {
        let source = self.source()?;
        let schema_violations = check_schema(&self.name, &source)?;
        if !schema_violations.is_empty() {
            // The typed decode rejects any record with a foreign field set
            let mut report = ContractReport::new(&self.name, count_items(&source));
            report.extend(schema_violations);
            return Ok(report);
        }

        let store = FixtureStore::from_json(&self.name, &source)?;
        let records = store.records();
        let mut report = check_records(&self.name, records, &self.def.contract_options());

        report.extend(round_trip(&JsonCodec::compact(), records)?.violation());
        if let Some(baseline) = &self.def.baseline {
            report.extend(baseline.check(records)?.violation());
        }
        if let Some(pinned) = &self.def.fingerprint {
            report.extend(check_fingerprint(records, pinned)?);
        }
        report.fingerprint = Some(fingerprint(records)?);
        if let Some(limit) = &self.def.payload_limit {
            report.extend(limit.check(&JsonCodec::compact(), records)?);
        }
        tracing::info!(
            "Checked fixture {} ({} records): {} violations",
            self.name,
            report.records,
            report.violations.len()
        );
        Ok(report)
    }
}

fn count_items(source: &str) -> usize {
    serde_json::from_str::<Vec<serde_json::Value>>(source)
        .map(|items| items.len())
        .unwrap_or_default()
}

/// Fixtures resolved from configuration
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Resolve configured fixtures. Paths containing glob characters expand to one entry per
    /// matching file, named `<name>/<file stem>`.
    pub fn from_config(config: &Config) -> Result<Self, FixtureError> {
        let mut entries = Vec::new();
        for def in config.fixtures.iter() {
            let path = config.resolve(&def.path);
            if !is_pattern(&def.path) {
                entries.push(CatalogEntry {
                    name: def.name.clone(),
                    path,
                    def: def.clone(),
                });
                continue;
            }
            let pattern = path.display().to_string();
            let matches = glob(&pattern).map_err(|e| FixtureError::Pattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            let mut matched = 0;
            for entry in matches {
                match entry {
                    Ok(file) => {
                        tracing::debug!("Fixture pattern {} matched {:?}", pattern, file);
                        entries.push(CatalogEntry {
                            name: format!("{}/{}", def.name, file_stem(&file)),
                            path: file,
                            def: def.clone(),
                        });
                        matched += 1;
                    }
                    Err(e) => tracing::warn!("Skipping unreadable fixture path: {}", e),
                }
            }
            if matched == 0 {
                return Err(FixtureError::Pattern {
                    pattern,
                    reason: "matched no files".to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Check every fixture in catalog order, one report per entry
    pub fn check(&self) -> Vec<ContractReport> {
        self.entries.iter().map(CatalogEntry::check).collect()
    }
}

fn is_pattern(path: &str) -> bool {
    path.contains(|c: char| matches!(c, '*' | '?' | '['))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
