//! Shared helpers for integration tests

#![allow(dead_code)]

use bloomset::BloomFilter;
use tracing_subscriber::EnvFilter;

/// Route library events to the test writer; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn element(prefix: &str, i: usize) -> Vec<u8> {
    format!("{}_{:06}", prefix, i).into_bytes()
}

/// Filter sized for 1000 entries at 1% with `range` elements of `prefix` added
pub fn filled_filter(prefix: &str, range: std::ops::Range<usize>) -> BloomFilter {
    let mut filter = BloomFilter::new(1000, 0.01).expect("valid parameters");
    for i in range {
        filter.add(&element(prefix, i)).expect("filter is ready");
    }
    filter
}
