//! Stable block identifiers.
//!
//! Every block-level node (statement, heading, blockquote, code) is stamped
//! with an id at build time. Ids survive normalization and structural
//! commands; the change-tracking overlay keys its records on them.

use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Length of a generated block id, in characters.
pub const BLOCK_ID_LEN: usize = 8;

/// A stable identifier for a block-level node.
///
/// Generated ids are 8 random alphanumeric characters. Ids deserialized
/// from a hydration payload are kept verbatim, whatever their length.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(SmolStr);

impl BlockId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let raw = Alphanumeric.sample_string(&mut rand::rng(), BLOCK_ID_LEN);
        Self(SmolStr::new(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<SmolStr> for BlockId {
    fn from(s: SmolStr) -> Self {
        Self(s)
    }
}

impl PartialEq<&str> for BlockId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
