//! Normal approximation of the sampling distribution of the mean.
//!
//! By the Central Limit Theorem the mean of `n` draws from a parent with
//! mean μ and variance σ² is approximately N(μ, σ²/n). The prediction is
//! overlaid on the histogram so the learner can watch the collected means
//! converge onto it.

use serde::Serialize;

use crate::distributions::DistributionKind;
use crate::error::ConfigError;
use crate::sampling::SampleSize;
use crate::special;

/// Normal approximation N(μ, σ/√n) for one parent and sample size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    mean: f64,
    std_error: f64,
}

impl Prediction {
    /// Prediction for means of `sample_size` draws from `kind`.
    ///
    /// # Examples
    /// ```
    /// use clt_explorer::distributions::DistributionKind;
    /// use clt_explorer::prediction::Prediction;
    /// use clt_explorer::sampling::SampleSize;
    ///
    /// let p = Prediction::for_kind(DistributionKind::Uniform, SampleSize::new(12).unwrap());
    /// assert_eq!(p.mean(), 0.5);
    /// assert!((p.std_error() - (1.0_f64 / 144.0).sqrt()).abs() < 1e-15);
    /// ```
    pub fn for_kind(kind: DistributionKind, sample_size: SampleSize) -> Self {
        Self {
            mean: kind.mean(),
            std_error: kind.std_dev() / (sample_size.get() as f64).sqrt(),
        }
    }

    /// Expected mean of the collected sample means.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Expected standard deviation of the collected sample means.
    pub fn std_error(&self) -> f64 {
        self.std_error
    }

    /// Normal density at `x`.
    pub fn density(&self, x: f64) -> f64 {
        special::standard_normal_pdf((x - self.mean) / self.std_error) / self.std_error
    }

    /// Normal CDF at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        special::standard_normal_cdf((x - self.mean) / self.std_error)
    }

    /// Expected histogram counts for `total` means over `bin_count` bins.
    ///
    /// Probability mass outside `[0, 1]` is folded into the edge bins, the
    /// same way the histogram clamps out-of-range values, so the expected
    /// counts sum to `total`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBinCount`] if `bin_count` is zero.
    pub fn expected_counts(&self, total: u64, bin_count: usize) -> Result<Vec<f64>, ConfigError> {
        if bin_count == 0 {
            return Err(ConfigError::InvalidBinCount(bin_count));
        }
        let n = bin_count as f64;
        let total = total as f64;
        Ok((0..bin_count)
            .map(|i| {
                let lower = if i == 0 { 0.0 } else { self.cdf(i as f64 / n) };
                let upper = if i + 1 == bin_count {
                    1.0
                } else {
                    self.cdf((i + 1) as f64 / n)
                };
                total * (upper - lower)
            })
            .collect())
    }
}
