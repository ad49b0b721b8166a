//! Size baseline and content fingerprint
//!
//! A fixture named after its size is expected to keep that size. [`SizeBaseline`] pins the
//! encoded byte length with a tolerance, [`fingerprint`] pins the exact content.
use crate::codec::{Codec, JsonCodec};
use crate::contract::Violation;
use crate::store::BUNDLED_BASELINE_BYTES;
use crate::types::{FixtureError, UserRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// JSON layout a baseline is measured on
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Compact,
    Pretty,
}

impl Encoding {
    pub fn codec(&self) -> JsonCodec {
        match self {
            Encoding::Compact => JsonCodec::compact(),
            Encoding::Pretty => JsonCodec::pretty(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Encoding::Compact => write!(f, "compact"),
            Encoding::Pretty => write!(f, "pretty"),
        }
    }
}

/// Expected encoded size of a fixture
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
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

fn default_tolerance_pct() -> f64 {
    5.0
}

impl SizeBaseline {
    /// Baseline of the bundled fixture
    pub fn bundled() -> Self {
        SizeBaseline {
            bytes: BUNDLED_BASELINE_BYTES,
            tolerance_pct: default_tolerance_pct(),
            encoding: Encoding::Compact,
        }
    }

    /// Encoded length of the records
    pub fn measure(&self, records: &[UserRecord]) -> Result<u64, FixtureError> {
        Ok(self.encoding.codec().encode(records)?.len() as u64)
    }

    /// True when `actual` is within tolerance of the baseline
    pub fn within(&self, actual: u64) -> bool {
        drift_pct(self.bytes, actual).abs() <= self.tolerance_pct
    }

    pub fn check(&self, records: &[UserRecord]) -> Result<SizeReport, FixtureError> {
        let actual = self.measure(records)?;
        let report = SizeReport {
            encoding: self.encoding,
            baseline: self.bytes,
            actual,
            drift_pct: drift_pct(self.bytes, actual),
            tolerance_pct: self.tolerance_pct,
        };
        tracing::debug!(
            "Size of {} encoding: {} bytes (baseline {}, drift {:.3}%)",
            report.encoding,
            report.actual,
            report.baseline,
            report.drift_pct
        );
        Ok(report)
    }
}

/// Measured size against a baseline
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SizeReport {
    pub encoding: Encoding,
    pub baseline: u64,
    pub actual: u64,
    /// Signed drift in percent of the baseline
    pub drift_pct: f64,
    pub tolerance_pct: f64,
}

impl SizeReport {
    pub fn is_within(&self) -> bool {
        self.drift_pct.abs() <= self.tolerance_pct
    }

    pub fn violation(&self) -> Option<Violation> {
        if self.is_within() {
            return None;
        }
        Some(Violation::SizeDrift {
            encoding: self.encoding.to_string(),
            baseline: self.baseline,
            actual: self.actual,
            tolerance_pct: self.tolerance_pct,
        })
    }
}

fn drift_pct(baseline: u64, actual: u64) -> f64 {
    if baseline == 0 {
        return if actual == 0 { 0.0 } else { f64::INFINITY };
    }
    (actual as f64 - baseline as f64) * 100.0 / baseline as f64
}

/// Hex SHA-256 of the compact JSON encoding
pub fn fingerprint(records: &[UserRecord]) -> Result<String, FixtureError> {
    let encoded = JsonCodec::compact().encode(records)?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare against a pinned fingerprint
pub fn check_fingerprint(
    records: &[UserRecord],
    pinned: &str,
) -> Result<Option<Violation>, FixtureError> {
    let actual = fingerprint(records)?;
    if actual.eq_ignore_ascii_case(pinned.trim()) {
        Ok(None)
    } else {
        Ok(Some(Violation::FingerprintMismatch {
            expected: pinned.to_string(),
            actual,
        }))
    }
}
