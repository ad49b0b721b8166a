// Configuration fixtures for catalog and checker tests
//
// Each function renders a YAML configuration pointing at fixture files relative to the
// configuration directory.

/// Single fixture with the full contract enabled
pub fn full_contract_config(path: &str, records: usize, baseline_bytes: u64) -> String {
    format!(
        r#"
fixtures:
  - name: sample
    path: {path}
    expected_records: {records}
    friends_per_record: 3
    baseline:
      bytes: {baseline_bytes}
      tolerance_pct: 1.0
      encoding: compact
report:
  format: json
"#
    )
}

/// Single fixture with a pinned fingerprint
pub fn pinned_config(path: &str, fingerprint: &str) -> String {
    format!(
        r#"
fixtures:
  - name: pinned
    path: {path}
    fingerprint: {fingerprint}
"#
    )
}

/// Fixture pattern expanding to several files
pub fn pattern_config(pattern: &str) -> String {
    format!(
        r#"
fixtures:
  - name: batch
    path: "{pattern}"
    check_formats: false
"#
    )
}

/// Two fixtures checked in order
pub fn two_fixture_config(first: &str, second: &str) -> String {
    format!(
        r#"
fixtures:
  - name: first
    path: {first}
  - name: second
    path: {second}
    expected_records: 3
"#
    )
}

/// Single fixture posted to a consumer with a body limit
pub fn payload_limit_config(path: &str, max_bytes: u64) -> String {
    format!(
        r#"
fixtures:
  - name: limited
    path: {path}
    payload_limit:
      max_bytes: {max_bytes}
"#
    )
}

/// The bundled fixture, addressed by absolute path
pub fn bundled_config() -> String {
    format!(
        r#"
fixtures:
  - name: json-515kb
    path: {}/fixtures/json-515kb.json
    expected_records: 720
    baseline:
      bytes: 516627
      tolerance_pct: 2.0
"#,
        env!("CARGO_MANIFEST_DIR")
    )
}
