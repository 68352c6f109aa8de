//! Core Bloom filter
//!
//! INVARIANTS:
//! - No false negatives: after `add(e)`, `check(e)` returns true until the
//!   filter is released.
//! - Bits only ever go from 0 to 1.
//!
//! The bit image is stored least-significant-bit first: position `x` lives in
//! byte `x / 8` under mask `1 << (x % 8)`. The raw image is exactly
//! `byte_count` bytes with no header.
//!
//! Not thread-safe. Share a filter across threads only behind an exclusive
//! lock, or shard elements over independent filters.

use std::fmt;

use bitvec::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::estimate::{count_bits, estimate_cardinality, estimate_intersection};
use super::hashing::{base_hashes, bit_positions, HashPrimitive, Murmur3};
use super::params::FilterParams;
use crate::error::{FilterError, InitError};

/// Sizing plus the owned bit buffer of a ready filter
#[derive(Clone, Debug)]
struct Storage {
    params: FilterParams,
    bits: BitVec<u8, Lsb0>,
}

impl Storage {
    fn reserve(byte_count: usize) -> Result<Vec<u8>, InitError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(byte_count)
            .map_err(|_| InitError::AllocationFailed { bytes: byte_count })?;
        Ok(buf)
    }

    fn zeroed(params: FilterParams) -> Result<Self, InitError> {
        let mut buf = Self::reserve(params.byte_count)?;
        buf.resize(params.byte_count, 0);
        Ok(Self::from_vec(params, buf))
    }

    fn copied(params: FilterParams, data: &[u8]) -> Result<Self, InitError> {
        let mut buf = Self::reserve(params.byte_count)?;
        buf.extend_from_slice(data);
        Ok(Self::from_vec(params, buf))
    }

    fn from_vec(params: FilterParams, buf: Vec<u8>) -> Self {
        let mut bits = BitVec::<u8, Lsb0>::from_vec(buf);
        // Length covers the addressable bits; padding stays in the raw image
        bits.truncate(params.bit_count);
        Self { params, bits }
    }
}

/// Bloom filter for probabilistic membership testing
///
/// False positives are possible, false negatives are not. A filter starts
/// either ready (from [`BloomFilter::new`] and friends) or not ready
/// ([`Default`]); [`release`](BloomFilter::release) returns it to not ready.
/// Every operation on a filter that is not ready fails with
/// [`FilterError::NotReady`].
#[derive(Clone, Debug, Default)]
pub struct BloomFilter<H = Murmur3> {
    storage: Option<Storage>,
    hasher: H,
}

impl BloomFilter<Murmur3> {
    /// Create a filter sized for `entries` elements at `error_rate`
    pub fn new(entries: usize, error_rate: f64) -> Result<Self, InitError> {
        Self::with_hasher(entries, error_rate, Murmur3)
    }

    /// Rehydrate a filter from a previously persisted bit image
    ///
    /// `data` must be exactly `byte_count` bytes for the given sizing.
    pub fn from_bits(entries: usize, error_rate: f64, data: &[u8]) -> Result<Self, InitError> {
        Self::from_bits_with_hasher(entries, error_rate, data, Murmur3)
    }
}

impl<H: HashPrimitive> BloomFilter<H> {
    /// Create a filter using a custom hash primitive
    pub fn with_hasher(entries: usize, error_rate: f64, hasher: H) -> Result<Self, InitError> {
        let mut filter = Self {
            storage: None,
            hasher,
        };
        filter.initialize(entries, error_rate)?;
        Ok(filter)
    }

    /// Rehydrate a filter from a bit image using a custom hash primitive
    pub fn from_bits_with_hasher(
        entries: usize,
        error_rate: f64,
        data: &[u8],
        hasher: H,
    ) -> Result<Self, InitError> {
        let mut filter = Self {
            storage: None,
            hasher,
        };
        filter.initialize_from_bits(entries, error_rate, data)?;
        Ok(filter)
    }

    /// (Re)initialize in place with a zeroed buffer
    ///
    /// Any previous buffer is released first. On error the filter is left
    /// not ready.
    pub fn initialize(&mut self, entries: usize, error_rate: f64) -> Result<(), InitError> {
        self.storage = None;

        let params = FilterParams::derive(entries, error_rate)?;
        let storage = Storage::zeroed(params)?;

        debug!(
            entries,
            error_rate,
            bit_count = params.bit_count,
            byte_count = params.byte_count,
            hash_count = params.hash_count,
            "Bloom filter initialized"
        );

        self.storage = Some(storage);
        Ok(())
    }

    /// (Re)initialize in place from a persisted bit image
    ///
    /// The image is copied verbatim. A length other than `byte_count` is
    /// rejected before anything is copied.
    pub fn initialize_from_bits(
        &mut self,
        entries: usize,
        error_rate: f64,
        data: &[u8],
    ) -> Result<(), InitError> {
        self.storage = None;

        let params = FilterParams::derive(entries, error_rate)?;
        if data.len() != params.byte_count {
            return Err(InitError::LengthMismatch {
                expected: params.byte_count,
                actual: data.len(),
            });
        }

        let storage = Storage::copied(params, data)?;

        debug!(
            entries,
            error_rate,
            bit_count = params.bit_count,
            byte_count = params.byte_count,
            hash_count = params.hash_count,
            "Bloom filter restored from bit image"
        );

        self.storage = Some(storage);
        Ok(())
    }

    /// Release the bit buffer
    ///
    /// Idempotent; safe on a filter that was never initialized.
    pub fn release(&mut self) {
        if let Some(storage) = self.storage.take() {
            debug!(
                byte_count = storage.params.byte_count,
                "Bloom filter released"
            );
        }
    }

    pub fn is_ready(&self) -> bool {
        self.storage.is_some()
    }

    /// Sizing of a ready filter
    pub fn params(&self) -> Option<&FilterParams> {
        self.storage.as_ref().map(|s| &s.params)
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Test whether an element might be in the filter
    ///
    /// Returns:
    /// - `true` if every derived bit is set (possibly a false positive)
    /// - `false` if the element was definitely never added
    pub fn check(&self, element: &[u8]) -> Result<bool, FilterError> {
        let storage = self.storage.as_ref().ok_or(FilterError::NotReady)?;
        let (a, b) = base_hashes(&self.hasher, element);

        let all_set = bit_positions(a, b, storage.params.hash_count, storage.params.bit_count)
            .fold(true, |all, pos| all & storage.bits[pos]);
        Ok(all_set)
    }

    /// Add an element, reporting whether it already looked present
    ///
    /// Sets every derived bit that is not yet set. Returns `true` if all of
    /// them were already set before the call. That is a "likely duplicate"
    /// signal only: a different element whose positions collide with bits
    /// set by earlier insertions produces the same `true`.
    pub fn add(&mut self, element: &[u8]) -> Result<bool, FilterError> {
        let storage = self.storage.as_mut().ok_or(FilterError::NotReady)?;
        let (a, b) = base_hashes(&self.hasher, element);
        let hash_count = storage.params.hash_count;

        let mut hits = 0u32;
        for pos in bit_positions(a, b, hash_count, storage.params.bit_count) {
            if storage.bits[pos] {
                hits += 1;
            } else {
                storage.bits.set(pos, true);
            }
        }

        Ok(hits == hash_count)
    }

    /// Raw bit image, exactly `byte_count` bytes
    pub fn as_bytes(&self) -> Result<&[u8], FilterError> {
        self.image().map(|(_, bytes)| bytes)
    }

    /// Consume the filter, returning its raw bit image
    pub fn into_bytes(self) -> Result<Vec<u8>, FilterError> {
        let storage = self.storage.ok_or(FilterError::NotReady)?;
        Ok(storage.bits.into_vec())
    }

    /// Number of set bits in the image
    pub fn bits_set(&self) -> Result<usize, FilterError> {
        self.as_bytes().map(count_bits)
    }

    /// Estimated number of distinct elements added so far
    pub fn estimated_len(&self) -> Result<f64, FilterError> {
        let (params, bytes) = self.image()?;
        Ok(estimate_cardinality(
            params.bit_count,
            params.hash_count,
            count_bits(bytes),
        ))
    }

    /// Estimate the size of the intersection with another filter
    ///
    /// See [`estimate_intersection`].
    pub fn estimate_intersection(&self, other: &BloomFilter<H>) -> Result<f64, FilterError> {
        estimate_intersection(self, other)
    }

    /// Snapshot of the sizing and fill level
    pub fn stats(&self) -> Result<FilterStats, FilterError> {
        let (params, bytes) = self.image()?;
        Ok(FilterStats {
            entries: params.entries,
            error_rate: params.error_rate,
            bit_count: params.bit_count,
            bits_per_entry: params.bits_per_entry,
            byte_count: params.byte_count,
            hash_count: params.hash_count,
            bits_set: count_bits(bytes),
        })
    }

    pub(crate) fn image(&self) -> Result<(&FilterParams, &[u8]), FilterError> {
        let storage = self.storage.as_ref().ok_or(FilterError::NotReady)?;
        Ok((&storage.params, storage.bits.as_raw_slice()))
    }
}

/// Status dump of a ready filter
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterStats {
    pub entries: usize,
    pub error_rate: f64,
    pub bit_count: usize,
    pub bits_per_entry: f64,
    pub byte_count: usize,
    pub hash_count: u32,
    pub bits_set: usize,
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bloom filter")?;
        writeln!(f, " ->entries = {}", self.entries)?;
        writeln!(f, " ->error = {:.6}", self.error_rate)?;
        writeln!(f, " ->bits = {}", self.bit_count)?;
        writeln!(f, " ->bits per elem = {:.6}", self.bits_per_entry)?;
        writeln!(f, " ->bytes = {}", self.byte_count)?;
        writeln!(f, " ->hash functions = {}", self.hash_count)?;
        write!(f, " ->bits set = {}", self.bits_set)
    }
}
