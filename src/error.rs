//! Configuration errors.
//!
//! The statistical core is total over validated inputs, so the only
//! failures are rejected parameters at the configuration boundary.

use thiserror::Error;

/// Error raised when a session parameter is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sample size must be at least 1.
    #[error("sample size must be at least 1, got {0}")]
    InvalidSampleSize(usize),

    /// Histogram bin count must be at least 1.
    #[error("bin count must be at least 1, got {0}")]
    InvalidBinCount(usize),

    /// Auto-run interval must be positive.
    #[error("auto-run interval must be at least 1 ms, got {0} ms")]
    InvalidInterval(u64),

    /// Auto-run batch size must be at least 1.
    #[error("auto-run batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    /// Catch-up cap must allow at least one tick per pump.
    #[error("max catch-up ticks must be at least 1, got {0}")]
    InvalidCatchUp(u32),

    /// Parent curve resolution must be at least 1.
    #[error("curve resolution must be at least 1")]
    InvalidResolution,

    /// Distribution name not recognized.
    #[error("unknown distribution {0:?}")]
    UnknownDistribution(String),

    /// Malformed TOML configuration.
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}
