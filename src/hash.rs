//! Double hashing for the Bloom-backed membership testers.
//!
//! Two independent 32-bit hashes (murmur3 and FNV-1a) are combined as
//! `h1 + i * h2 (mod bit_len)` to derive the `i`-th bit index for a token,
//! the usual Kirsch-Mitzenmacher construction. All testers in this crate
//! share this scheme so a token always maps to the same bit pattern for a
//! given slice geometry.

use fnv::FnvHasher;
use murmur3::murmur3_32;
use std::hash::Hasher;
use std::io::Cursor;

pub(crate) fn hash_murmur32(token: &[u8]) -> u32 {
    let mut cursor = Cursor::new(token);
    murmur3_32(&mut cursor, 0).expect("Failed to compute Murmur3 hash")
}

pub(crate) fn hash_fnv32(token: &[u8]) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(token);
    hasher.finish() as u32
}

/// Computes `num_hashes` bit indices for `token`, each in `[0, bit_len)`.
pub(crate) fn bit_indices(
    token: &[u8],
    num_hashes: usize,
    bit_len: usize,
) -> Vec<u32> {
    let h1 = hash_murmur32(token);
    let h2 = hash_fnv32(token);
    (0..num_hashes)
        .map(|i| h1.wrapping_add((i as u32).wrapping_mul(h2)) % bit_len as u32)
        .collect()
}

/// Optimal bit vector length for `n` expected elements at false positive
/// rate `fpr`.
pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as usize
}

/// Optimal number of hash functions for `n` elements in `m` bits.
pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    ((m as f64 / n as f64) * std::f64::consts::LN_2).round() as usize
}
