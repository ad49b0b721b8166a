//! Request body limits
//!
//! Large fixtures are posted as request bodies to services whose JSON body parser enforces a
//! size limit (1 MiB for the default JSON body parser of the consuming service).
//! [`PayloadLimit`] answers whether an encoded fixture still fits.
use crate::codec::Codec;
use crate::contract::Violation;
use crate::types::{FixtureError, UserRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum accepted request body size
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
pub struct PayloadLimit {
    /// Limit in bytes
    pub max_bytes: u64,
}

impl PayloadLimit {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn accepts(&self, len: u64) -> bool {
        len <= self.max_bytes
    }

    /// Bytes left below the limit, negative when the payload is too large. Saturates at the
    /// `i64` bounds.
    pub fn headroom(&self, len: u64) -> i64 {
        let max = i64::try_from(self.max_bytes).unwrap_or(i64::MAX);
        let len = i64::try_from(len).unwrap_or(i64::MAX);
        max.saturating_sub(len)
    }

    /// Encode records with `codec` and check the body against the limit
    pub fn check(
        &self,
        codec: &dyn Codec,
        records: &[UserRecord],
    ) -> Result<Option<Violation>, FixtureError> {
        let len = codec.encode(records)?.len() as u64;
        tracing::debug!(
            "{} payload of {} bytes, headroom {} bytes",
            codec.name(),
            len,
            self.headroom(len)
        );
        if self.accepts(len) {
            Ok(None)
        } else {
            Ok(Some(Violation::PayloadTooLarge {
                limit: self.max_bytes,
                actual: len,
            }))
        }
    }
}
