// Test helper functions and custom assertions
//
// Provides record builders, writers for on-disk fixtures and configurations, and assertions
// with clearer failure messages

use json_fixtures::contract::{ContractReport, Violation};
use json_fixtures::types::{Friend, UserRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// Creates a well-formed record at the given position
///
/// # Example
/// ```
/// let record = sample_record(3);
/// assert_eq!(record.index, 3);
/// ```
pub fn sample_record(index: usize) -> UserRecord {
    UserRecord {
        id: format!("{:024x}", 0x5a1b_0000 + index),
        index,
        guid: format!("185a6ee1-222b-47ac-aaef-{:012x}", index),
        is_active: index % 2 == 0,
        balance: "$1,234.56".to_string(),
        picture: "http://placehold.it/32x32".to_string(),
        age: 20 + (index % 20) as u32,
        eye_color: "brown".to_string(),
        name: "Ida Barlow".to_string(),
        gender: "female".to_string(),
        company: "QUONATA".to_string(),
        email: "idabarlow@quonata.com".to_string(),
        phone: "+1 (934) 512-3344".to_string(),
        address: "433 Amber Street, Vale, Utah, 8821".to_string(),
        registered: "2016-11-02T10:41:07 +02:00".to_string(),
        latitude: -33.5 + index as f64,
        longitude: 120.25,
        tags: vec!["esse".to_string(), "esse".to_string(), "anim".to_string()],
        friends: (0..3)
            .map(|id| Friend {
                id,
                name: format!("Friend {}", id),
            })
            .collect(),
        greeting: "Hello, Ida Barlow! You have 4 unread messages.".to_string(),
        favorite_fruit: "apple".to_string(),
    }
}

/// Creates `count` well-formed records
pub fn sample_records(count: usize) -> Vec<UserRecord> {
    (0..count).map(sample_record).collect()
}

/// Writes records as compact JSON and returns the path
pub fn write_fixture(dir: &Path, file_name: &str, records: &[UserRecord]) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, serde_json::to_vec(records).unwrap()).expect("Failed to write fixture");
    path
}

/// Writes raw fixture text and returns the path
pub fn write_raw_fixture(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Writes `config.yaml` into `dir` and returns its path as string
pub fn write_config(dir: &Path, content: &str) -> String {
    let path = dir.join("config.yaml");
    fs::write(&path, content).expect("Failed to write config");
    path.to_str().unwrap().to_string()
}

/// Compact JSON length of records
pub fn compact_len(records: &[UserRecord]) -> u64 {
    serde_json::to_vec(records).unwrap().len() as u64
}

/// Custom assertion for a clean contract report
///
/// # Panics
/// Panics listing every violation if the report is not clean
pub fn assert_clean(report: &ContractReport) {
    assert!(
        report.is_ok(),
        "Fixture {} expected to be clean, got violations: {:#?}",
        report.fixture,
        report.violations
    );
}

/// Custom assertion that a report contains a violation matching `predicate`
///
/// # Arguments
/// * `report` - Report to inspect
/// * `context` - Description of the expected violation
/// * `predicate` - Matcher for the expected violation
pub fn assert_has_violation<F>(report: &ContractReport, context: &str, predicate: F)
where
    F: Fn(&Violation) -> bool,
{
    assert!(
        report.violations.iter().any(predicate),
        "Fixture {} expected a {} violation, got: {:#?}",
        report.fixture,
        context,
        report.violations
    );
}
