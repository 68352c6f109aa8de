//! Error types for the filter
//!
//! Construction failures (`InitError`) are kept apart from failures of a
//! live filter (`FilterError`) so callers can tell a bad parameter set from
//! a misuse of an existing filter.

use thiserror::Error;

/// Errors raised while sizing or allocating a filter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InitError {
    #[error("Invalid filter parameters: entries={entries}, error_rate={error_rate}")]
    InvalidParameters { entries: usize, error_rate: f64 },

    #[error("Filter too large: {bit_count} bits exceeds the 32-bit index space")]
    TooLarge { bit_count: u64 },

    #[error("Failed to allocate {bytes} byte bit buffer")]
    AllocationFailed { bytes: usize },

    #[error("Bit image length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Errors raised by operations on a filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The filter was never initialized or has been released.
    #[error("Filter is not initialized")]
    NotReady,

    #[error(
        "Incompatible filter shapes: {left_bits} bits/{left_hashes} hashes vs \
         {right_bits} bits/{right_hashes} hashes"
    )]
    IncompatibleShape {
        left_bits: usize,
        left_hashes: u32,
        right_bits: usize,
        right_hashes: u32,
    },
}

/// Errors from loading a [`FilterConfig`](crate::config::FilterConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] InitError),
}
