//! Canonical serialization and fingerprinting.
//!
//! Tree snapshots and analysis results are fingerprinted so that callers can
//! cheaply detect "nothing changed" across repeated invocations and so tests
//! can assert determinism without comparing whole structures.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Vectors serialize in index order
//! - Maps in fingerprinted data must be `BTreeMap`, never `HashMap`

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Seed for all kernel fingerprints. Changing it invalidates every cached
/// analysis, so it moves only together with the schema version.
const FINGERPRINT_SEED: u64 = 0;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical serialization failed")
}

/// 64-bit fingerprint of a serializable value.
pub fn fingerprint64<T: Serialize>(value: &T) -> u64 {
    xxh64(&canonical_bytes(value), FINGERPRINT_SEED)
}

/// Fingerprint as a fixed-width hex string.
pub fn fingerprint_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", fingerprint64(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_fingerprint_is_stable() {
        let value = vec!["Pump A".to_string(), "Pump B".to_string()];
        assert_eq!(fingerprint64(&value), fingerprint64(&value));
    }

    #[test]
    fn test_fingerprint_sees_order() {
        let ab = vec!["A", "B"];
        let ba = vec!["B", "A"];
        assert_ne!(fingerprint64(&ab), fingerprint64(&ba));
    }

    #[test]
    fn test_btreemap_iterates_canonically() {
        let mut m1 = BTreeMap::new();
        m1.insert("b", 2);
        m1.insert("a", 1);
        let mut m2 = BTreeMap::new();
        m2.insert("a", 1);
        m2.insert("b", 2);
        assert_eq!(fingerprint_hex(&m1), fingerprint_hex(&m2));
    }
}
