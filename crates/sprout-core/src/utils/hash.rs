//! Blake3 fingerprints over dependency sets.
//!
//! A fingerprint identifies the exact key/version content of a dependency
//! set independent of insertion order, so a cached classpath can be reused
//! only while the declared dependencies stay the same.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SproutError, SproutResult};
use crate::types::DependencySet;

/// A Blake3 digest of a canonicalized dependency set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint {
    /// The raw hash bytes (32 bytes for Blake3)
    bytes: [u8; 32],
}

impl Fingerprint {
    /// Create a fingerprint from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Convert fingerprint to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a fingerprint from hexadecimal text
    pub fn from_hex(hex_str: &str) -> SproutResult<Self> {
        let bytes = hex::decode(hex_str.trim()).map_err(|e| SproutError::ConfigValidation {
            field: "fingerprint".to_string(),
            reason: format!("invalid hex: {}", e),
        })?;

        let bytes: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            SproutError::ConfigValidation {
                field: "fingerprint".to_string(),
                reason: format!("expected 32 bytes, got {}", bytes.len()),
            }
        })?;

        Ok(Self { bytes })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = SproutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.to_hex()
    }
}

/// Compute the fingerprint of a dependency set.
///
/// Pairs are fed in lexicographic key order. Every key and version is
/// prefixed with its byte length, so no two distinct sets share an input
/// stream whatever characters the strings contain.
pub fn fingerprint(deps: &DependencySet) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    for (key, version) in deps.sorted() {
        update_field(&mut hasher, key.as_bytes());
        update_field(&mut hasher, version.as_bytes());
    }
    Fingerprint::new(*hasher.finalize().as_bytes())
}

fn update_field(hasher: &mut blake3::Hasher, field: &[u8]) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field);
}
