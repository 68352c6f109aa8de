//! Hash primitives and bit position derivation
//!
//! Positions come from two 32-bit hashes of the element: `a` seeded with a
//! fixed constant and `b` seeded with `a`. Position `i` is
//! `(a + i * b) mod m`, computed with wrapping 32-bit arithmetic so that
//! images stay portable between producers.

use std::io::Cursor;

/// Seed of the first hash; the second hash is seeded with the first's output
pub const BASE_SEED: u32 = 0x9747_b28c;

/// Seedable 32-bit hash function used to address filter bits
///
/// Implementations must be deterministic: the same bytes and seed always
/// produce the same value, across runs and machines.
pub trait HashPrimitive {
    fn hash(&self, bytes: &[u8], seed: u32) -> u32;
}

/// MurmurHash3 x86 32-bit, backed by the `murmur3` crate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Murmur3;

impl HashPrimitive for Murmur3 {
    fn hash(&self, bytes: &[u8], seed: u32) -> u32 {
        let mut cursor = Cursor::new(bytes);
        // Reading from an in-memory slice cannot fail
        murmur3::murmur3_32(&mut cursor, seed).unwrap_or(0)
    }
}

/// MurmurHash2 32-bit (Appleby), little-endian block reads
///
/// Use this to read or extend bit images written by MurmurHash2-based
/// producers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Murmur2;

impl HashPrimitive for Murmur2 {
    fn hash(&self, bytes: &[u8], seed: u32) -> u32 {
        const M: u32 = 0x5bd1_e995;
        const R: u32 = 24;

        let mut h = seed ^ (bytes.len() as u32);

        let mut chunks = bytes.chunks_exact(4);
        for chunk in &mut chunks {
            let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            k = k.wrapping_mul(M);
            k ^= k >> R;
            k = k.wrapping_mul(M);

            h = h.wrapping_mul(M);
            h ^= k;
        }

        let tail = chunks.remainder();
        if !tail.is_empty() {
            if tail.len() >= 3 {
                h ^= u32::from(tail[2]) << 16;
            }
            if tail.len() >= 2 {
                h ^= u32::from(tail[1]) << 8;
            }
            h ^= u32::from(tail[0]);
            h = h.wrapping_mul(M);
        }

        h ^= h >> 13;
        h = h.wrapping_mul(M);
        h ^= h >> 15;
        h
    }
}

/// Compute the two base hashes `(a, b)` for an element
pub fn base_hashes<H: HashPrimitive + ?Sized>(hasher: &H, element: &[u8]) -> (u32, u32) {
    let a = hasher.hash(element, BASE_SEED);
    let b = hasher.hash(element, a);
    (a, b)
}

/// Iterate the `hash_count` bit positions derived from `(a, b)`
///
/// `bit_count` must be non-zero and fit in `u32`; filter sizing guarantees
/// both.
///
/// # Panics
///
/// Panics on a remainder by zero if `bit_count` is 0. Larger counts than
/// `u32::MAX` are truncated in release builds and rejected by a debug
/// assertion otherwise.
pub fn bit_positions(
    a: u32,
    b: u32,
    hash_count: u32,
    bit_count: usize,
) -> impl Iterator<Item = usize> {
    debug_assert!(bit_count > 0 && bit_count <= u32::MAX as usize);
    let m = bit_count as u32;
    (0..hash_count).map(move |i| (a.wrapping_add(i.wrapping_mul(b)) % m) as usize)
}
