//! correlation.rs - Deterministic identifiers for sensitive values.
//!
//! Lets records that share a sensitive value be correlated without
//! exposing the value itself.
//!
//! License: MIT OR APACHE 2.0

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const HASH_ID_LEN: usize = 12;

/// First [`HASH_ID_LEN`] hex characters of SHA-256(`data` followed by `salt`).
pub fn hash_id(data: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hasher.update(salt.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(HASH_ID_LEN);
    id
}
