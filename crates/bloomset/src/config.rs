//! Filter configuration and validation
//!
//! A persisted bit image carries no header, so the config that sized it must
//! be stored alongside it to rehydrate a compatible filter.
//!
//! # Example
//!
//! ```
//! use bloomset::FilterConfigBuilder;
//!
//! let config = FilterConfigBuilder::new()
//!     .entries(1000)
//!     .error_rate(0.01)
//!     .build()
//!     .expect("Valid config");
//!
//! let mut filter = config.build_filter().expect("Filter allocated");
//! filter.add(b"element").unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{BloomFilter, FilterParams};
use crate::error::{ConfigError, InitError};

/// Sizing inputs of a filter
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Expected number of elements
    pub entries: usize,
    /// Target false positive rate, strictly between 0 and 1
    pub error_rate: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            entries: 1000,
            error_rate: 0.01,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(entries: usize, error_rate: f64) -> Result<Self, InitError> {
        let config = Self {
            entries,
            error_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from JSON, e.g. `{"entries": 1000, "error_rate": 0.01}`
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON for storage next to a bit image
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), InitError> {
        self.params().map(|_| ())
    }

    /// Derived sizing for this config
    pub fn params(&self) -> Result<FilterParams, InitError> {
        FilterParams::derive(self.entries, self.error_rate)
    }

    /// Create an empty filter with this sizing
    pub fn build_filter(&self) -> Result<BloomFilter, InitError> {
        BloomFilter::new(self.entries, self.error_rate)
    }

    /// Rehydrate a filter with this sizing from a bit image
    pub fn filter_from_bits(&self, data: &[u8]) -> Result<BloomFilter, InitError> {
        BloomFilter::from_bits(self.entries, self.error_rate, data)
    }

    /// Builder-style method to set entries
    pub fn with_entries(mut self, entries: usize) -> Self {
        self.entries = entries;
        self
    }

    /// Builder-style method to set the error rate
    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    entries: Option<usize>,
    error_rate: Option<f64>,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(mut self, entries: usize) -> Self {
        self.entries = Some(entries);
        self
    }

    pub fn error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = Some(error_rate);
        self
    }

    /// Build the FilterConfig, falling back to defaults for unset fields
    pub fn build(self) -> Result<FilterConfig, InitError> {
        let defaults = FilterConfig::default();
        FilterConfig::new(
            self.entries.unwrap_or(defaults.entries),
            self.error_rate.unwrap_or(defaults.error_rate),
        )
    }
}
