//! # Filter Property Tests
//!
//! Behavioural guarantees of the filter:
//!
//! 1. **No false negatives** - every added element checks true
//! 2. **Monotonicity** - set bits never clear across adds
//! 3. **Sizing determinism** - exact integer parameters
//! 4. **Round-trip** - a restored bit image answers like the original
//! 5. **Rejection** - invalid parameters and image lengths fail
//! 6. **Not-ready guard** - released filters refuse every operation

mod common;

use bloomset::{BloomFilter, FilterError, InitError};
use common::{element, filled_filter, init_tracing};
use proptest::prelude::*;
use rand::Rng;

// =============================================================================
// NO FALSE NEGATIVES
// =============================================================================

#[test]
fn test_no_false_negatives_bulk() {
    init_tracing();
    let filter = filled_filter("address", 0..1000);

    for i in 0..1000 {
        assert!(
            filter.check(&element("address", i)).unwrap(),
            "False negative for element {}",
            i
        );
    }
}

#[test]
fn test_false_positive_rate_bounded() {
    let filter = filled_filter("inserted", 0..1000);

    let mut false_positives = 0;
    for i in 0..100_000 {
        if filter.check(&element("not_inserted", i)).unwrap() {
            false_positives += 1;
        }
    }

    let actual_fpr = false_positives as f64 / 100_000.0;
    // Allow 1.5x statistical tolerance
    assert!(
        actual_fpr <= 0.015,
        "Actual FPR {} exceeds 1.5 * target 0.01",
        actual_fpr
    );
}

#[test]
fn test_random_elements_no_false_negatives() {
    let mut rng = rand::thread_rng();
    let mut filter = BloomFilter::new(500, 0.001).unwrap();

    let elements: Vec<Vec<u8>> = (0..500)
        .map(|_| {
            let len = rng.gen_range(0..64);
            (0..len).map(|_| rng.gen()).collect()
        })
        .collect();

    for e in &elements {
        filter.add(e).unwrap();
    }
    for e in &elements {
        assert!(filter.check(e).unwrap());
    }
}

proptest! {
    #[test]
    fn prop_added_elements_always_found(
        elements in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..48), 1..200)
    ) {
        let mut filter = BloomFilter::new(200, 0.01).unwrap();
        for e in &elements {
            filter.add(e).unwrap();
        }
        for e in &elements {
            prop_assert!(filter.check(e).unwrap());
        }
    }

    #[test]
    fn prop_bits_are_monotone(
        elements in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..32), 1..100)
    ) {
        let mut filter = BloomFilter::new(100, 0.05).unwrap();
        let mut previous = filter.as_bytes().unwrap().to_vec();

        for e in &elements {
            filter.add(e).unwrap();
            let current = filter.as_bytes().unwrap();
            for (before, after) in previous.iter().zip(current) {
                // Every bit set before is still set
                prop_assert_eq!(before & after, *before);
            }
            previous = current.to_vec();
        }
    }
}

// =============================================================================
// DUPLICATE SIGNAL
// =============================================================================

#[test]
fn test_add_reports_likely_duplicate() {
    let mut filter = BloomFilter::new(1000, 0.01).unwrap();

    assert!(!filter.add(b"first").unwrap());
    assert!(filter.add(b"first").unwrap());
    assert!(!filter.add(b"second").unwrap());
}

// =============================================================================
// SIZING
// =============================================================================

#[test]
fn test_sizing_is_deterministic() {
    let filter = BloomFilter::new(1000, 0.01).unwrap();
    let params = filter.params().unwrap();

    assert_eq!(params.bit_count, 9585);
    assert_eq!(params.byte_count, 1199);
    assert_eq!(params.hash_count, 7);
    assert_eq!(filter.as_bytes().unwrap().len(), 1199);
}

// =============================================================================
// ROUND-TRIP
// =============================================================================

#[test]
fn test_round_trip_preserves_answers() {
    init_tracing();
    let original = filled_filter("persisted", 0..600);
    let image = original.as_bytes().unwrap().to_vec();

    let restored = BloomFilter::from_bits(1000, 0.01, &image).unwrap();

    assert_eq!(restored.as_bytes().unwrap(), image.as_slice());
    for i in 0..2000 {
        let e = element("persisted", i);
        assert_eq!(
            restored.check(&e).unwrap(),
            original.check(&e).unwrap(),
            "answers diverge for element {}",
            i
        );
    }
}

#[test]
fn test_round_trip_through_into_bytes() {
    let original = filled_filter("moved", 0..100);
    let image = original.into_bytes().unwrap();

    let mut restored = BloomFilter::from_bits(1000, 0.01, &image).unwrap();

    assert!(restored.add(&element("moved", 42)).unwrap(), "already present");
}

// =============================================================================
// REJECTION
// =============================================================================

#[test]
fn test_rejects_invalid_parameters() {
    assert!(matches!(
        BloomFilter::new(0, 0.01),
        Err(InitError::InvalidParameters { .. })
    ));
    assert!(matches!(
        BloomFilter::new(100, 0.0),
        Err(InitError::InvalidParameters { .. })
    ));
}

#[test]
fn test_rejects_short_image() {
    let image = vec![0u8; 1198];

    assert_eq!(
        BloomFilter::from_bits(1000, 0.01, &image).unwrap_err(),
        InitError::LengthMismatch {
            expected: 1199,
            actual: 1198,
        }
    );
}

#[test]
fn test_initialize_from_bits_mismatch_leaves_not_ready() {
    let mut filter = filled_filter("kept", 0..10);

    let result = filter.initialize_from_bits(1000, 0.01, &[0u8; 4]);

    assert!(matches!(result, Err(InitError::LengthMismatch { .. })));
    assert_eq!(filter.check(&element("kept", 1)), Err(FilterError::NotReady));
}

// =============================================================================
// NOT-READY GUARD
// =============================================================================

#[test]
fn test_released_filter_refuses_operations() {
    let mut filter = filled_filter("gone", 0..10);
    filter.release();

    for i in 0..10 {
        let e = element("gone", i);
        assert_eq!(filter.check(&e), Err(FilterError::NotReady));
        assert_eq!(filter.add(&e), Err(FilterError::NotReady));
    }
    assert_eq!(filter.bits_set(), Err(FilterError::NotReady));
    assert_eq!(filter.estimated_len(), Err(FilterError::NotReady));
    assert!(filter.into_bytes().is_err());
}

#[test]
fn test_never_initialized_matches_released() {
    let mut fresh: BloomFilter = BloomFilter::default();
    let mut released = BloomFilter::new(100, 0.01).unwrap();
    released.release();

    assert_eq!(fresh.check(b"x"), released.check(b"x"));
    assert_eq!(fresh.add(b"x"), released.add(b"x"));

    fresh.release();
    released.release();
}
