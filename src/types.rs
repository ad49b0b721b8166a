//! Fixture record types
//!
//! Typed view of the synthetic user records stored in a fixture. Field names on the wire are
//! kept exactly as the fixture writes them (`_id`, camelCase) and are serialized in the same
//! order, so re-encoding a decoded fixture produces the same shape.
use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Field set every record of a fixture carries, in wire order.
pub const FIELD_NAMES: [&str; 21] = [
    "_id",
    "index",
    "guid",
    "isActive",
    "balance",
    "picture",
    "age",
    "eyeColor",
    "name",
    "gender",
    "company",
    "email",
    "phone",
    "address",
    "registered",
    "latitude",
    "longitude",
    "tags",
    "friends",
    "greeting",
    "favoriteFruit",
];

/// Timestamp layout of the `registered` field (`2014-03-15T07:25:21 -05:00`).
pub const REGISTERED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S %:z";

/// A single synthetic user record
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UserRecord {
    /// Opaque record identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Position of the record in the fixture
    pub index: usize,
    pub guid: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    /// Currency formatted balance (`$3,637.42`)
    pub balance: String,
    pub picture: String,
    pub age: u32,
    #[serde(rename = "eyeColor")]
    pub eye_color: String,
    pub name: String,
    pub gender: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Registration timestamp with UTC offset, see [`REGISTERED_FORMAT`]
    pub registered: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Ordered tags, duplicates allowed
    pub tags: Vec<String>,
    pub friends: Vec<Friend>,
    pub greeting: String,
    #[serde(rename = "favoriteFruit")]
    pub favorite_fruit: String,
}

impl UserRecord {
    /// Parsed `registered` timestamp, `None` when it does not follow [`REGISTERED_FORMAT`]
    pub fn registered_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(&self.registered, REGISTERED_FORMAT).ok()
    }
}

/// Friend sub-record
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Friend {
    pub id: u32,
    pub name: String,
}

/// Errors raised while loading, encoding or configuring fixtures
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode fixture {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("fixture {0} is not a JSON array of objects")]
    NotAnArray(String),
    #[error("{codec} codec failed: {reason}")]
    Codec { codec: &'static str, reason: String },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid fixture path pattern {pattern}: {reason}")]
    Pattern { pattern: String, reason: String },
}
