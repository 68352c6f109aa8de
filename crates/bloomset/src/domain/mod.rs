//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Sizing derivation
//! - Hash primitives and double-hash position derivation
//! - The Bloom filter itself
//! - Cardinality and intersection estimation
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod estimate;
pub mod filter;
pub mod hashing;
pub mod params;

pub use estimate::{bitwise_or, count_bits, estimate_cardinality, estimate_intersection};
pub use filter::{BloomFilter, FilterStats};
pub use hashing::{base_hashes, bit_positions, HashPrimitive, Murmur2, Murmur3, BASE_SEED};
pub use params::{calculate_fpr, FilterParams};
