//! Surrogate item ids for prescriptions.
//!
//! Prescriptions carry no numeric item code, so the catalog derives one from
//! the (drug, route) natural key. SHA-256 keeps the id identical across runs
//! and machines; the digest is truncated to 64 bits and reduced into
//! `[0, SURROGATE_MODULUS)`. Distinct pairs may collide.

use sha2::{Digest, Sha256};

pub const SURROGATE_MODULUS: u64 = 1_000_000_000;

/// Category shown for prescriptions without a recorded route.
pub const UNSPECIFIED_ROUTE: &str = "Unspecified";

/// Normalization applied to both halves of the natural key.
///
/// Matches SQLite's single-argument `TRIM`, which only strips spaces, so the
/// store can group on the same normalized values.
pub fn normalize_key_part(part: &str) -> &str {
    part.trim_matches(' ')
}

/// Deterministic surrogate id for a (drug, route) pair.
///
/// A missing route and an empty route are different keys.
pub fn surrogate_item_id(drug: &str, route: Option<&str>) -> i64 {
    let drug = normalize_key_part(drug);
    let mut hasher = Sha256::new();
    hasher.update((drug.len() as u64).to_be_bytes());
    hasher.update(drug.as_bytes());
    match route {
        Some(route) => {
            hasher.update([1u8]);
            hasher.update(normalize_key_part(route).as_bytes());
        }
        None => hasher.update([0u8]),
    }
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % SURROGATE_MODULUS) as i64
}
