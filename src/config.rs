//! Session configuration.
//!
//! [`ExplorerConfig`] holds the raw, user-facing options. It can be built
//! in code, starting from [`Default`], or parsed from TOML; either way
//! [`ExplorerConfig::validate`] is the single boundary where bad values
//! are rejected, so nothing downstream has to re-check them.
//!
//! ```toml
//! distribution = "bimodal"
//! sample_size = 10
//! bin_count = 41
//! auto_run_interval_ms = 50
//! auto_run_batch_size = 10
//! seed = 7
//! ```

use serde::{Deserialize, Serialize};

use crate::distributions::DistributionKind;
use crate::error::ConfigError;
use crate::histogram::DEFAULT_BIN_COUNT;
use crate::run::{AutoRun, DEFAULT_BATCH_SIZE, DEFAULT_INTERVAL_MS, DEFAULT_MAX_CATCH_UP};
use crate::sampling::{SampleSize, DEFAULT_SAMPLE_SIZE};

/// Configuration options for an [`Explorer`](crate::Explorer) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Parent shape sampled from. Default: uniform.
    pub distribution: DistributionKind,

    /// Draws averaged into each sample mean. Default: 5.
    pub sample_size: usize,

    /// Histogram bins on `[0, 1]`. Default: 41.
    pub bin_count: usize,

    /// Milliseconds between auto-run ticks. Default: 50.
    pub auto_run_interval_ms: u64,

    /// Sample means appended per auto-run tick. Default: 10.
    pub auto_run_batch_size: usize,

    /// Most ticks fired by one pump after a stall; extra elapsed ticks
    /// are dropped. Default: 4.
    pub max_catch_up_ticks: u32,

    /// Fixed RNG seed for a reproducible session. Default: none (seeded
    /// from the operating system).
    pub seed: Option<u64>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            distribution: DistributionKind::Uniform,
            sample_size: DEFAULT_SAMPLE_SIZE,
            bin_count: DEFAULT_BIN_COUNT,
            auto_run_interval_ms: DEFAULT_INTERVAL_MS,
            auto_run_batch_size: DEFAULT_BATCH_SIZE,
            max_catch_up_ticks: DEFAULT_MAX_CATCH_UP,
            seed: None,
        }
    }
}

impl ExplorerConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed TOML or unknown keys, otherwise
    /// whatever [`validate`](Self::validate) rejects.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ExplorerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every option against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        SampleSize::new(self.sample_size)?;
        if self.bin_count == 0 {
            return Err(ConfigError::InvalidBinCount(self.bin_count));
        }
        AutoRun::new(self.auto_run_interval_ms, self.auto_run_batch_size)?;
        if self.max_catch_up_ticks == 0 {
            return Err(ConfigError::InvalidCatchUp(self.max_catch_up_ticks));
        }
        Ok(())
    }

    pub fn with_distribution(mut self, distribution: DistributionKind) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    pub fn with_auto_run(mut self, interval_ms: u64, batch_size: usize) -> Self {
        self.auto_run_interval_ms = interval_ms;
        self.auto_run_batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
