//! # Bloomset
//!
//! Space-efficient probabilistic set membership. A filter is sized from an
//! expected entry count and a target false positive rate; queries answer
//! "possibly present" or "definitely absent".
//!
//! ## Layout
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `FilterParams`: sizing derived from entries and error rate
//!   - `HashPrimitive`: pluggable seeded 32-bit hash (`Murmur3`, `Murmur2`)
//!   - `BloomFilter`: bit buffer with check / add / release
//!   - `estimate_intersection`: inclusion-exclusion over set bit counts
//! - **Config** (`config`): `FilterConfig` with validation and JSON loading
//! - **Errors** (`error`): `InitError`, `FilterError`, `ConfigError`
//!
//! ## Invariants
//!
//! - **No false negatives**: once added, `check()` returns true until release.
//! - **Monotone bits**: bits only go from 0 to 1.
//!
//! ## Persistence
//!
//! The only persisted artifact is the raw bit image (`as_bytes()`), exactly
//! `byte_count` bytes, least-significant bit first within each byte. Rebuild
//! it with [`BloomFilter::from_bits`] using the same entries and error rate.
//!
//! ## Usage Example
//!
//! ```
//! use bloomset::BloomFilter;
//!
//! let mut filter = BloomFilter::new(1000, 0.01)?;
//! filter.add(b"0xABCD")?;
//!
//! assert!(filter.check(b"0xABCD")?);
//!
//! let image = filter.as_bytes()?.to_vec();
//! let restored = BloomFilter::from_bits(1000, 0.01, &image)?;
//! assert!(restored.check(b"0xABCD")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Concurrency
//!
//! Filters are plain owned values with no internal locking. Concurrent
//! mutation requires an external lock or sharding into independent filters.

pub mod config;
pub mod domain;
pub mod error;

// Re-exports for convenience
pub use config::{FilterConfig, FilterConfigBuilder};
pub use domain::{
    estimate_intersection, BloomFilter, FilterParams, FilterStats, HashPrimitive, Murmur2,
    Murmur3,
};
pub use error::{ConfigError, FilterError, InitError};
