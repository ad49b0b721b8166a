//! Codecs and round trips
//!
//! The serializers a fixture is pushed through live outside this crate. [`Codec`] is the seam a
//! consumer plugs them into; the JSON and YAML implementations here only wrap `serde_json` and
//! `serde_yaml`.
use crate::contract::Violation;
use crate::types::{FixtureError, UserRecord};
use serde::Serialize;

/// Encode/decode pair a fixture is round-tripped through
pub trait Codec: Send + Sync {
    /// Short name used in reports
    fn name(&self) -> &'static str;
    fn encode(&self, records: &[UserRecord]) -> Result<Vec<u8>, FixtureError>;
    fn decode(&self, data: &[u8]) -> Result<Vec<UserRecord>, FixtureError>;
}

/// JSON through `serde_json`
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        if self.pretty {
            "json-pretty"
        } else {
            "json"
        }
    }

    fn encode(&self, records: &[UserRecord]) -> Result<Vec<u8>, FixtureError> {
        let res = if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        };
        res.map_err(|e| FixtureError::Codec {
            codec: self.name(),
            reason: e.to_string(),
        })
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<UserRecord>, FixtureError> {
        serde_json::from_slice(data).map_err(|e| FixtureError::Codec {
            codec: self.name(),
            reason: e.to_string(),
        })
    }
}

/// YAML through `serde_yaml`
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn encode(&self, records: &[UserRecord]) -> Result<Vec<u8>, FixtureError> {
        serde_yaml::to_string(records)
            .map(String::into_bytes)
            .map_err(|e| FixtureError::Codec {
                codec: self.name(),
                reason: e.to_string(),
            })
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<UserRecord>, FixtureError> {
        serde_yaml::from_slice(data).map_err(|e| FixtureError::Codec {
            codec: self.name(),
            reason: e.to_string(),
        })
    }
}

/// Outcome of `decode(encode(records))`
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RoundTrip {
    pub codec: &'static str,
    pub encoded_len: usize,
    pub records: usize,
    pub decoded_records: usize,
    /// First position where the decoded record differs from the original
    pub first_mismatch: Option<usize>,
}

impl RoundTrip {
    /// True when the decoded records equal the originals
    pub fn is_exact(&self) -> bool {
        self.first_mismatch.is_none()
    }

    pub fn violation(&self) -> Option<Violation> {
        if self.is_exact() {
            return None;
        }
        let position = self.first_mismatch.filter(|_| self.decoded_records == self.records);
        Some(Violation::RoundTripMismatch {
            codec: self.codec.to_string(),
            position,
        })
    }
}

/// Push records through a codec and compare
pub fn round_trip(codec: &dyn Codec, records: &[UserRecord]) -> Result<RoundTrip, FixtureError> {
    let encoded = codec.encode(records)?;
    let decoded = codec.decode(&encoded)?;
    let first_mismatch = first_mismatch(records, &decoded);
    tracing::debug!(
        "Round trip through {}: {} records, {} bytes, mismatch at {:?}",
        codec.name(),
        records.len(),
        encoded.len(),
        first_mismatch
    );
    Ok(RoundTrip {
        codec: codec.name(),
        encoded_len: encoded.len(),
        records: records.len(),
        decoded_records: decoded.len(),
        first_mismatch,
    })
}

fn first_mismatch(original: &[UserRecord], decoded: &[UserRecord]) -> Option<usize> {
    original
        .iter()
        .zip(decoded.iter())
        .position(|(a, b)| a != b)
        .or_else(|| {
            // Equal prefix, differing length: the first missing or extra record
            (original.len() != decoded.len()).then(|| original.len().min(decoded.len()))
        })
}

/// Codecs provided by this crate
pub fn builtin_codecs() -> Vec<Box<dyn Codec>> {
    vec![
        Box::new(JsonCodec::compact()),
        Box::new(JsonCodec::pretty()),
        Box::new(YamlCodec),
    ]
}
