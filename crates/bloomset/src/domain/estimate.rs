//! Cardinality estimation from bit population
//!
//! For a filter with `m` bits, `k` hashes and `x` bits set, the number of
//! inserted elements is estimated as `n = -(m / k) * ln(1 - x / m)`.
//! Intersections follow by inclusion-exclusion over the two filters and
//! their bitwise union.

use tracing::trace;

use super::filter::BloomFilter;
use super::hashing::HashPrimitive;
use crate::error::FilterError;

/// Count set bits across the whole byte buffer, padding bits included
pub fn count_bits(bytes: &[u8]) -> usize {
    bytes.iter().map(|b| b.count_ones() as usize).sum()
}

/// Bitwise OR of two equally long buffers into a new buffer
pub fn bitwise_or(left: &[u8], right: &[u8]) -> Vec<u8> {
    left.iter().zip(right).map(|(l, r)| l | r).collect()
}

/// Estimated element count for `set_bits` bits on in an `m`-bit, `k`-hash filter
///
/// Returns infinity once every bit is set; the estimator has no signal left.
/// Popcounts include padding bits, so a rehydrated image with padding set can
/// report more than `bit_count` bits and the estimate becomes NaN, matching
/// libbloom-style producers.
pub fn estimate_cardinality(bit_count: usize, hash_count: u32, set_bits: usize) -> f64 {
    let m = bit_count as f64;
    let k = f64::from(hash_count);
    -(m / k) * (1.0 - set_bits as f64 / m).ln()
}

/// Estimate how many elements two same-shaped filters have in common
///
/// Computes `n(a) + n(b) - n(a | b)`. The result is an approximation and may
/// be slightly negative for nearly disjoint filters; that noise is returned
/// as is. Neither input is modified; the union lives in a scratch buffer
/// dropped before returning.
pub fn estimate_intersection<H: HashPrimitive>(
    left: &BloomFilter<H>,
    right: &BloomFilter<H>,
) -> Result<f64, FilterError> {
    let (left_params, left_bytes) = left.image()?;
    let (right_params, right_bytes) = right.image()?;

    if !left_params.same_shape(right_params) {
        return Err(FilterError::IncompatibleShape {
            left_bits: left_params.bit_count,
            left_hashes: left_params.hash_count,
            right_bits: right_params.bit_count,
            right_hashes: right_params.hash_count,
        });
    }

    let m = left_params.bit_count;
    let k = left_params.hash_count;

    let union_bits = {
        let union = bitwise_or(left_bytes, right_bytes);
        count_bits(&union)
    };

    let left_bits = count_bits(left_bytes);
    let right_bits = count_bits(right_bytes);

    let n_left = estimate_cardinality(m, k, left_bits);
    let n_right = estimate_cardinality(m, k, right_bits);
    let n_union = estimate_cardinality(m, k, union_bits);
    let estimate = n_left + n_right - n_union;

    trace!(
        bit_count = m,
        hash_count = k,
        left_bits,
        right_bits,
        union_bits,
        estimate,
        "Estimated filter intersection"
    );

    Ok(estimate)
}
