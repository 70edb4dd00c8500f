//! Shared identifier and payload types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-byte blake3 digest
pub type Hash = [u8; 32];

/// GraphQL operation variables (key-sorted)
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// Page props handed to the render layer
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Identity of a query: digest of its operation name and canonical variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey(Hash);

impl QueryKey {
    pub fn from_bytes(bytes: Hash) -> Self {
        QueryKey(bytes)
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// First 8 bytes as hex, for log fields.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
