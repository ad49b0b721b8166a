//! Fixture store
//!
//! Holds a decoded fixture. The bundled `json-515kb` fixture is embedded into the library and
//! decoded once on first access; every later [`load`] returns the same instance.
use crate::types::{FixtureError, UserRecord};
use once_cell::sync::Lazy;
use std::path::Path;
use std::time::Instant;

/// Name of the bundled fixture
pub const BUNDLED_NAME: &str = "json-515kb";

/// Number of records in the bundled fixture
pub const BUNDLED_RECORDS: usize = 720;

/// Size of the compact JSON encoding of the bundled fixture
pub const BUNDLED_BASELINE_BYTES: u64 = 516_627;

static BUNDLED_JSON: &str = include_str!("../fixtures/json-515kb.json");

static BUNDLED: Lazy<Result<FixtureStore, FixtureError>> =
    Lazy::new(|| FixtureStore::from_json(BUNDLED_NAME, BUNDLED_JSON));

/// Return the bundled fixture.
///
/// The fixture is decoded on the first call only. A decode failure is returned on every call
/// and means the crate was built with a broken data file.
pub fn load() -> Result<&'static FixtureStore, &'static FixtureError> {
    BUNDLED.as_ref()
}

/// Raw text of the bundled fixture as it was embedded
pub fn bundled_source() -> &'static str {
    BUNDLED_JSON
}

/// Immutable, decoded fixture
#[derive(Clone, Debug, PartialEq)]
pub struct FixtureStore {
    name: String,
    records: Vec<UserRecord>,
    source_len: usize,
}

impl FixtureStore {
    /// Decode fixture from its JSON text
    pub fn from_json(name: &str, data: &str) -> Result<Self, FixtureError> {
        let started = Instant::now();
        let records: Vec<UserRecord> =
            serde_json::from_str(data).map_err(|source| FixtureError::Decode {
                name: name.to_string(),
                source,
            })?;
        tracing::debug!(
            "Decoded fixture {} ({} records, {} bytes) in {:?}",
            name,
            records.len(),
            data.len(),
            started.elapsed()
        );
        Ok(Self {
            name: name.to_string(),
            records,
            source_len: data.len(),
        })
    }

    /// Read and decode fixture file
    pub fn from_path(name: &str, path: &Path) -> Result<Self, FixtureError> {
        let data = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(name, &data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All records in fixture order
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Byte length of the text the fixture was decoded from
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Record at the given position
    pub fn get(&self, index: usize) -> Option<&UserRecord> {
        self.records.get(index)
    }

    /// Record with the given `_id`
    pub fn find_by_id(&self, id: &str) -> Option<&UserRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}
