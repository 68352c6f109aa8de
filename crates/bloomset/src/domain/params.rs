//! Filter sizing
//!
//! Formulas:
//! - bits_per_entry = -ln(error_rate) / ln(2)^2
//! - bit_count      = floor(entries * bits_per_entry)
//! - byte_count     = ceil(bit_count / 8)
//! - hash_count     = ceil(ln(2) * bits_per_entry)

use serde::{Deserialize, Serialize};

use crate::error::InitError;

/// ln(2), truncated to the digits libbloom-style producers size with
const LN_2: f64 = 0.693147180559945;

/// ln(2)^2, same truncation
const LN_2_SQUARED: f64 = 0.480453013918201;

/// Derived sizing of a filter
///
/// Two filters with equal `bit_count` and `hash_count` share a shape and can
/// be compared bit for bit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Expected number of elements the filter was sized for
    pub entries: usize,
    /// Target false positive probability
    pub error_rate: f64,
    /// Bits allotted per expected element
    pub bits_per_entry: f64,
    /// Addressable bits (m)
    pub bit_count: usize,
    /// Length of the bit image in bytes
    pub byte_count: usize,
    /// Bit positions probed per element (k)
    pub hash_count: u32,
}

impl FilterParams {
    /// Derive the sizing for `entries` elements at `error_rate`
    ///
    /// Rejects `entries == 0`, rates outside `(0, 1)`, and combinations whose
    /// bit count truncates to zero. The bit count must fit in `u32` because
    /// positions are derived with 32-bit arithmetic.
    pub fn derive(entries: usize, error_rate: f64) -> Result<Self, InitError> {
        let invalid = InitError::InvalidParameters {
            entries,
            error_rate,
        };

        if entries < 1 || !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(invalid);
        }

        let bits_per_entry = -error_rate.ln() / LN_2_SQUARED;

        // Truncating conversion, not rounding.
        let raw_bits = (entries as f64 * bits_per_entry) as u64;
        if raw_bits == 0 {
            return Err(invalid);
        }
        if raw_bits > u64::from(u32::MAX) {
            return Err(InitError::TooLarge {
                bit_count: raw_bits,
            });
        }

        let bit_count = raw_bits as usize;
        let byte_count = bit_count.div_ceil(8);
        let hash_count = (LN_2 * bits_per_entry).ceil() as u32;

        Ok(Self {
            entries,
            error_rate,
            bits_per_entry,
            bit_count,
            byte_count,
            hash_count: hash_count.max(1),
        })
    }

    /// True if `other` has the same bit count and hash count
    pub fn same_shape(&self, other: &FilterParams) -> bool {
        self.bit_count == other.bit_count && self.hash_count == other.hash_count
    }

    /// False positive rate after `n` insertions
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn expected_fpr(&self, n: usize) -> f64 {
        calculate_fpr(self.bit_count, n, self.hash_count)
    }
}

/// Calculate the false positive rate for given parameters
pub fn calculate_fpr(m: usize, n: usize, k: u32) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -f64::from(k) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
