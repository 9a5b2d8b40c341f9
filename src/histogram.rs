//! Fixed-bin histogram of sample means on `[0, 1]`.
//!
//! Bins are equal-width and half-open, `[i/n, (i+1)/n)`, except the last
//! which is closed on the right so that a mean of exactly 1.0 is counted.
//! Values outside `[0, 1]` (bimodal bleed) are clamped into the edge bins
//! rather than dropped, so the bin counts always sum to the number of
//! recorded values.
//!
//! A histogram can be maintained incrementally with [`Histogram::record`]
//! or rebuilt from a full collection with [`Histogram::rebuild`]; both
//! produce identical counts.

use serde::Serialize;

use crate::error::ConfigError;

/// Default number of bins, matching the lab's chart.
pub const DEFAULT_BIN_COUNT: usize = 41;

/// Maps `value` to its bin among `bin_count` bins on `[0, 1]`.
///
/// Returns the bin index and whether the value had to be clamped into
/// range. NaN lands in bin 0 and counts as clamped.
///
/// # Panics
/// Panics in debug builds if `bin_count` is zero.
///
/// # Examples
/// ```
/// use clt_explorer::histogram::bin_index;
/// assert_eq!(bin_index(0.26, 4), (1, false));
/// assert_eq!(bin_index(1.0, 4), (3, false));
/// assert_eq!(bin_index(1.05, 4), (3, true));
/// assert_eq!(bin_index(-0.02, 4), (0, true));
/// ```
pub fn bin_index(value: f64, bin_count: usize) -> (usize, bool) {
    debug_assert!(bin_count > 0, "bin_count must be positive");
    let last = bin_count.saturating_sub(1);
    if value.is_nan() {
        return (0, true);
    }
    let clamped = !(0.0..=1.0).contains(&value);
    let scaled = (value * bin_count as f64).floor();
    let idx = if scaled < 0.0 {
        0
    } else if scaled >= bin_count as f64 {
        last
    } else {
        scaled as usize
    };
    (idx, clamped)
}

/// Bin counts over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    counts: Vec<u64>,
    total: u64,
    clamped: u64,
}

impl Histogram {
    /// Creates an empty histogram with `bin_count` bins.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBinCount`] if `bin_count` is zero.
    pub fn new(bin_count: usize) -> Result<Self, ConfigError> {
        if bin_count == 0 {
            return Err(ConfigError::InvalidBinCount(bin_count));
        }
        Ok(Self {
            counts: vec![0; bin_count],
            total: 0,
            clamped: 0,
        })
    }

    /// Builds a histogram from scratch over every value in `values`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBinCount`] if `bin_count` is zero.
    ///
    /// # Examples
    /// ```
    /// use clt_explorer::histogram::Histogram;
    /// let h = Histogram::rebuild(&[0.1, 0.26, 0.5, 0.99, 1.0], 4).unwrap();
    /// assert_eq!(h.counts(), &[1, 1, 1, 2]);
    /// ```
    pub fn rebuild(values: &[f64], bin_count: usize) -> Result<Self, ConfigError> {
        let mut hist = Self::new(bin_count)?;
        for &v in values {
            hist.record(v);
        }
        Ok(hist)
    }

    /// Counts one value.
    pub fn record(&mut self, value: f64) {
        let (idx, clamped) = bin_index(value, self.counts.len());
        self.counts[idx] += 1;
        self.total += 1;
        if clamped {
            self.clamped += 1;
        }
    }

    /// Zeroes every bin, keeping the bin count.
    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.total = 0;
        self.clamped = 0;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Number of values recorded; always the sum of the bin counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of recorded values that fell outside `[0, 1]`.
    pub fn clamped(&self) -> u64 {
        self.clamped
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn bin_width(&self) -> f64 {
        1.0 / self.counts.len() as f64
    }

    /// `[lower, upper)` edges of bin `i`, or `None` past the last bin.
    pub fn bin_range(&self, i: usize) -> Option<(f64, f64)> {
        if i >= self.counts.len() {
            return None;
        }
        let n = self.counts.len() as f64;
        Some((i as f64 / n, (i + 1) as f64 / n))
    }

    /// Midpoint of bin `i`, or `None` past the last bin.
    pub fn bin_center(&self, i: usize) -> Option<f64> {
        self.bin_range(i).map(|(lo, hi)| (lo + hi) / 2.0)
    }

    /// Lower edge of every bin, formatted to two decimals.
    pub fn bin_labels(&self) -> Vec<String> {
        (0..self.counts.len())
            .filter_map(|i| self.bin_range(i))
            .map(|(lo, _)| format!("{lo:.2}"))
            .collect()
    }

    /// Counts scaled to a density (area 1), comparable to a parent curve.
    ///
    /// All zeros when the histogram is empty.
    pub fn densities(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let scale = self.total as f64 * self.bin_width();
        self.counts.iter().map(|&c| c as f64 / scale).collect()
    }

    /// Index of the fullest bin (lowest index on ties), or `None` when empty.
    pub fn mode_bin(&self) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        let mut best = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > self.counts[best] {
                best = i;
            }
        }
        Some(best)
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn counts_sum_to_length(
            values in proptest::collection::vec(0.0_f64..=1.0, 0..300),
            bins in 1_usize..100,
        ) {
            let h = Histogram::rebuild(&values, bins).unwrap();
            prop_assert_eq!(h.counts().iter().sum::<u64>(), values.len() as u64);
            prop_assert_eq!(h.clamped(), 0);
        }

        #[test]
        fn bleed_is_clamped_never_dropped(
            values in proptest::collection::vec(-0.1_f64..=1.1, 0..300),
            bins in 1_usize..100,
        ) {
            let h = Histogram::rebuild(&values, bins).unwrap();
            prop_assert_eq!(h.counts().iter().sum::<u64>(), values.len() as u64);
            let outside = values.iter().filter(|v| !(0.0..=1.0).contains(*v)).count() as u64;
            prop_assert_eq!(h.clamped(), outside);
        }

        #[test]
        fn value_lands_inside_its_bin(v in 0.0_f64..1.0, bins in 1_usize..100) {
            let (idx, clamped) = bin_index(v, bins);
            prop_assert!(!clamped);
            prop_assert!(idx < bins);
            let lo = idx as f64 / bins as f64;
            let hi = (idx + 1) as f64 / bins as f64;
            prop_assert!(v >= lo - 1e-12 && v < hi + 1e-12);
        }
    }
}
