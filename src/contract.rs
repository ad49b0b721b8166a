//! Fixture contract checks
//!
//! A fixture is only useful as stable test input while a handful of invariants hold: record
//! positions and `index` agree, `_id` values are unique, every record carries the same field
//! set and every record lists the same number of friends with ids `0..n`. Checks never fail
//! fast; they collect every [`Violation`] into a [`ContractReport`].
use crate::types::{FixtureError, UserRecord, FIELD_NAMES};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

static OBJECT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{24}$").expect("object id pattern"));
static BALANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\$\d{1,3}(,\d{3})*\.\d{2}$").expect("balance pattern")
});
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[a-z]+$").expect("email pattern"));

/// A single broken invariant
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    RecordCount {
        expected: usize,
        actual: usize,
    },
    IndexMismatch {
        position: usize,
        index: usize,
    },
    DuplicateId {
        id: String,
        positions: Vec<usize>,
    },
    SchemaMismatch {
        position: usize,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    FriendCount {
        position: usize,
        expected: usize,
        actual: usize,
    },
    FriendIds {
        position: usize,
        ids: Vec<u32>,
    },
    Format {
        position: usize,
        field: &'static str,
        value: String,
    },
    NotIdempotent,
    RoundTripMismatch {
        codec: String,
        position: Option<usize>,
    },
    SizeDrift {
        encoding: String,
        baseline: u64,
        actual: u64,
        tolerance_pct: f64,
    },
    FingerprintMismatch {
        expected: String,
        actual: String,
    },
    PayloadTooLarge {
        limit: u64,
        actual: u64,
    },
    /// The fixture could not be read or decoded at all
    Unreadable {
        reason: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Violation::RecordCount { expected, actual } => {
                write!(f, "expected {} records, found {}", expected, actual)
            }
            Violation::IndexMismatch { position, index } => {
                write!(f, "record at position {} has index {}", position, index)
            }
            Violation::DuplicateId { id, positions } => {
                write!(f, "_id {} used at positions {:?}", id, positions)
            }
            Violation::SchemaMismatch {
                position,
                missing,
                unexpected,
            } => write!(
                f,
                "record at position {} has missing fields {:?} and unexpected fields {:?}",
                position, missing, unexpected
            ),
            Violation::FriendCount {
                position,
                expected,
                actual,
            } => write!(
                f,
                "record at position {} has {} friends, expected {}",
                position, actual, expected
            ),
            Violation::FriendIds { position, ids } => {
                write!(f, "record at position {} has friend ids {:?}", position, ids)
            }
            Violation::Format {
                position,
                field,
                value,
            } => write!(
                f,
                "record at position {} has malformed {}: {:?}",
                position, field, value
            ),
            Violation::NotIdempotent => write!(f, "loading twice produced different records"),
            Violation::RoundTripMismatch { codec, position } => match position {
                Some(p) => write!(f, "{} round trip changed record at position {}", codec, p),
                None => write!(f, "{} round trip changed the number of records", codec),
            },
            Violation::SizeDrift {
                encoding,
                baseline,
                actual,
                tolerance_pct,
            } => write!(
                f,
                "{} encoding is {} bytes, baseline {} bytes (tolerance {}%)",
                encoding, actual, baseline, tolerance_pct
            ),
            Violation::FingerprintMismatch { expected, actual } => {
                write!(f, "fingerprint {} does not match pinned {}", actual, expected)
            }
            Violation::PayloadTooLarge { limit, actual } => {
                write!(f, "payload of {} bytes exceeds limit of {} bytes", actual, limit)
            }
            Violation::Unreadable { reason } => write!(f, "fixture is unreadable: {}", reason),
        }
    }
}

/// Knobs for [`check_records`]
#[derive(Clone, Debug)]
pub struct ContractOptions {
    /// Number of friends each record must list
    pub friends_per_record: usize,
    /// Exact record count, when known
    pub expected_records: Option<usize>,
    /// Run the per-field format checks
    pub check_formats: bool,
}

impl Default for ContractOptions {
    fn default() -> Self {
        ContractOptions {
            friends_per_record: 3,
            expected_records: None,
            check_formats: true,
        }
    }
}

/// Result of checking a single fixture
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ContractReport {
    pub fixture: String,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub violations: Vec<Violation>,
}

impl ContractReport {
    pub fn new(fixture: &str, records: usize) -> Self {
        Self {
            fixture: fixture.to_string(),
            records,
            fingerprint: None,
            violations: Vec::new(),
        }
    }

    /// True when no invariant is broken
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn push(&mut self, violation: Violation) {
        tracing::warn!("Fixture {}: {}", self.fixture, violation);
        self.violations.push(violation);
    }

    pub fn extend<I: IntoIterator<Item = Violation>>(&mut self, violations: I) {
        for violation in violations {
            self.push(violation);
        }
    }
}

/// Check the typed invariants of a record set
pub fn check_records(
    fixture: &str,
    records: &[UserRecord],
    opts: &ContractOptions,
) -> ContractReport {
    let mut report = ContractReport::new(fixture, records.len());

    if let Some(expected) = opts.expected_records {
        if expected != records.len() {
            report.push(Violation::RecordCount {
                expected,
                actual: records.len(),
            });
        }
    }
    report.extend(check_indexes(records));
    report.extend(check_unique_ids(records));
    report.extend(check_friends(records, opts.friends_per_record));
    if opts.check_formats {
        report.extend(
            records
                .iter()
                .enumerate()
                .flat_map(|(position, record)| check_formats(position, record)),
        );
    }
    tracing::debug!(
        "Checked {} records of {}: {} violations",
        records.len(),
        fixture,
        report.violations.len()
    );
    report
}

/// `index` must equal the array position, which makes the range contiguous and unique
pub fn check_indexes(records: &[UserRecord]) -> Vec<Violation> {
    records
        .iter()
        .enumerate()
        .filter(|(position, record)| record.index != *position)
        .map(|(position, record)| Violation::IndexMismatch {
            position,
            index: record.index,
        })
        .collect()
}

/// `_id` values must be pairwise distinct
pub fn check_unique_ids(records: &[UserRecord]) -> Vec<Violation> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| (record.id.as_str(), position))
        .into_group_map()
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .sorted_by_key(|(_, positions)| positions[0])
        .map(|(id, positions)| Violation::DuplicateId {
            id: id.to_string(),
            positions,
        })
        .collect()
}

/// Every record lists exactly `per_record` friends with ids `0..per_record`
pub fn check_friends(records: &[UserRecord], per_record: usize) -> Vec<Violation> {
    let expected_ids: Vec<u32> = (0..per_record as u32).collect();
    let mut violations = Vec::new();
    for (position, record) in records.iter().enumerate() {
        if record.friends.len() != per_record {
            violations.push(Violation::FriendCount {
                position,
                expected: per_record,
                actual: record.friends.len(),
            });
            continue;
        }
        let ids: Vec<u32> = record.friends.iter().map(|f| f.id).sorted().collect();
        if ids != expected_ids {
            violations.push(Violation::FriendIds {
                position,
                ids: record.friends.iter().map(|f| f.id).collect(),
            });
        }
    }
    violations
}

/// Shape checks of the scalar fields
pub fn check_formats(position: usize, record: &UserRecord) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut malformed = |field: &'static str, value: String| {
        violations.push(Violation::Format {
            position,
            field,
            value,
        })
    };
    if !OBJECT_ID.is_match(&record.id) {
        malformed("_id", record.id.clone());
    }
    if uuid::Uuid::parse_str(&record.guid).is_err() {
        malformed("guid", record.guid.clone());
    }
    if !BALANCE.is_match(&record.balance) {
        malformed("balance", record.balance.clone());
    }
    if !EMAIL.is_match(&record.email) {
        malformed("email", record.email.clone());
    }
    if record.registered_at().is_none() {
        malformed("registered", record.registered.clone());
    }
    if !(-90.0..=90.0).contains(&record.latitude) {
        malformed("latitude", record.latitude.to_string());
    }
    if !(-180.0..=180.0).contains(&record.longitude) {
        malformed("longitude", record.longitude.to_string());
    }
    violations
}

/// Check that every element of a raw JSON fixture carries exactly [`FIELD_NAMES`].
///
/// Works on the untyped document so a drifting fixture is reported record by record instead
/// of failing the typed decode on the first odd field.
pub fn check_schema(fixture: &str, data: &str) -> Result<Vec<Violation>, FixtureError> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|source| FixtureError::Decode {
            name: fixture.to_string(),
            source,
        })?;
    let items = value
        .as_array()
        .ok_or_else(|| FixtureError::NotAnArray(fixture.to_string()))?;
    let expected: HashSet<&str> = FIELD_NAMES.iter().copied().collect();

    let mut violations = Vec::new();
    for (position, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| FixtureError::NotAnArray(fixture.to_string()))?;
        let missing: Vec<String> = FIELD_NAMES
            .iter()
            .filter(|field| !object.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        let unexpected: Vec<String> = object
            .keys()
            .filter(|key| !expected.contains(key.as_str()))
            .cloned()
            .sorted()
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            tracing::trace!("Schema mismatch in {} at {}", fixture, position);
            violations.push(Violation::SchemaMismatch {
                position,
                missing,
                unexpected,
            });
        }
    }
    Ok(violations)
}

/// Load twice and compare the results structurally
pub fn check_idempotent<T, F>(load: F) -> Result<Option<Violation>, FixtureError>
where
    T: PartialEq,
    F: Fn() -> Result<T, FixtureError>,
{
    let first = load()?;
    let second = load()?;
    if first == second {
        Ok(None)
    } else {
        Ok(Some(Violation::NotIdempotent))
    }
}
