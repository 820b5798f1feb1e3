//! Configuration for document analysis

use serde::{Deserialize, Serialize};

/// Configuration for an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeConfig {
    /// Deepest scope that still gathers field statistics (None = unlimited)
    ///
    /// The top-level record is depth 1.
    pub max_depth: Option<usize>,

    /// Maximum number of records to pull from the source (0 = all)
    pub sample_size: usize,

    /// Stop the run at the first invalid record instead of skipping it
    pub stop_on_invalid: bool,
}

impl AnalyzeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> AnalyzeConfigBuilder {
        AnalyzeConfigBuilder::default()
    }

    /// Whether the sample limit has been reached after `processed` records
    pub(crate) fn sample_exhausted(&self, processed: u64) -> bool {
        self.sample_size > 0 && processed >= self.sample_size as u64
    }
}

/// Builder for AnalyzeConfig
#[derive(Debug, Default)]
pub struct AnalyzeConfigBuilder {
    config: AnalyzeConfig,
}

impl AnalyzeConfigBuilder {
    /// Set the depth cutoff (0 = unlimited)
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = (depth > 0).then_some(depth);
        self
    }

    /// Set the sample size (0 = all records)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Stop at the first invalid record
    pub fn stop_on_invalid(mut self, stop: bool) -> Self {
        self.config.stop_on_invalid = stop;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AnalyzeConfig {
        self.config
    }
}
