//! Stable content hashing for configs and artifacts.

use serde::Serialize;
use sha2::{Digest, Sha256};
use toksweep_core::{ErrorInfo, SweepError};

/// Computes a stable hexadecimal SHA-256 hash for the provided serializable
/// payload.
///
/// Serialization goes through `serde_json`, which emits struct fields in
/// declaration order and `BTreeMap` keys sorted, so equal values always hash
/// equal.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, SweepError> {
    let bytes = serde_json::to_vec(value).map_err(|err| {
        SweepError::Serde(ErrorInfo::new("hash-serialize", err.to_string()))
    })?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn equal_values_hash_equal() {
        let mut a = BTreeMap::new();
        a.insert("x", 1u32);
        a.insert("y", 2u32);
        let mut b = BTreeMap::new();
        b.insert("y", 2u32);
        b.insert("x", 1u32);
        assert_eq!(
            stable_hash_string(&a).unwrap(),
            stable_hash_string(&b).unwrap()
        );
    }

    #[test]
    fn different_values_hash_differently() {
        assert_ne!(
            stable_hash_string(&"one").unwrap(),
            stable_hash_string(&"two").unwrap()
        );
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = stable_hash_string(&42u32).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
