//! Running statistics over collected sample means.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier-compensated summation for O(ε) error independent of n.
//! - **Spread/shape**: Welford's online algorithm extended to the third
//!   central moment.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).

use serde::Serialize;

/// Computes the arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use clt_explorer::stats::mean;
/// let v = [0.1, 0.2, 0.3, 0.4, 0.5];
/// assert!((mean(&v).unwrap() - 0.3).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the population variance (denominator `n`).
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
pub fn population_variance(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    acc.population_variance()
}

/// Neumaier summation (improved Kahan).
///
/// Handles the case where the addend is larger in magnitude than the
/// running sum.
///
/// Reference: Neumaier (1974), *Zeitschrift für Angewandte Mathematik
/// und Mechanik* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean, variance and skewness.
///
/// Maintains central moment sums M₂, M₃ incrementally. M₃ is updated
/// before M₂ since it uses the *previous* M₂.
///
/// # Examples
/// ```
/// use clt_explorer::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
    m3: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a new value into the accumulator.
    pub fn update(&mut self, value: f64) {
        let n1 = self.count;
        self.count += 1;

        if n1 == 0 {
            self.mean_acc = value;
            return;
        }

        let n = self.count as f64;
        let delta = value - self.mean_acc;
        let delta_n = delta / n;
        let term1 = delta * delta_n * n1 as f64;

        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
        self.mean_acc += delta_n;
    }

    /// Discards everything seen so far.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if nothing has been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Population variance (n denominator), or `None` when empty.
    pub fn population_variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }

    /// Sample standard deviation (n − 1 denominator), or `None` with
    /// fewer than 2 values.
    pub fn sample_std_dev(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some((self.m2 / (self.count - 1) as f64).sqrt())
        }
    }

    /// Fisher's adjusted sample skewness (G₁), or `None` with fewer than
    /// 3 values or zero spread.
    pub fn skewness(&self) -> Option<f64> {
        if self.count < 3 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        let g1 = n.sqrt() * self.m3 / self.m2.powf(1.5);
        let correction = (n * (n - 1.0)).sqrt() / (n - 2.0);
        Some(correction * g1)
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Display summary of the collected sample means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Number of sample means collected.
    pub count: usize,
    /// Mean of the sample means; 0 when nothing has been collected.
    pub mean: f64,
    /// Sample standard deviation of the means (the observed standard error).
    pub std_dev: Option<f64>,
    /// Skewness of the means; drifts toward 0 as the sample size grows.
    pub skewness: Option<f64>,
}

impl Summary {
    /// The summary of an empty collection.
    pub const EMPTY: Summary = Summary {
        count: 0,
        mean: 0.0,
        std_dev: None,
        skewness: None,
    };

    /// Builds a summary from a running accumulator.
    pub fn from_accumulator(acc: &WelfordAccumulator) -> Self {
        Self {
            count: acc.count() as usize,
            mean: acc.mean().unwrap_or(0.0),
            std_dev: acc.sample_std_dev(),
            skewness: acc.skewness(),
        }
    }
}

/// Summarizes a collection of sample means from scratch.
///
/// The mean uses compensated summation; spread and shape come from a
/// fresh Welford pass.
///
/// # Examples
/// ```
/// use clt_explorer::stats::summarize;
/// let s = summarize(&[]);
/// assert_eq!((s.count, s.mean), (0, 0.0));
/// let s = summarize(&[0.25, 0.75]);
/// assert_eq!((s.count, s.mean), (2, 0.5));
/// ```
pub fn summarize(values: &[f64]) -> Summary {
    let mut acc = WelfordAccumulator::new();
    for &x in values {
        acc.update(x);
    }
    Summary {
        mean: mean(values).unwrap_or(0.0),
        ..Summary::from_accumulator(&acc)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn unit_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(0.0_f64..=1.0, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn running_summary_matches_batch(data in unit_vec(0, 200)) {
            let mut acc = WelfordAccumulator::new();
            for &x in &data {
                acc.update(x);
            }
            let running = Summary::from_accumulator(&acc);
            let batch = summarize(&data);
            prop_assert_eq!(running.count, batch.count);
            prop_assert!((running.mean - batch.mean).abs() < 1e-12);
        }

        #[test]
        fn mean_within_range(data in unit_vec(1, 200)) {
            let m = mean(&data).unwrap();
            let lo = data.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m >= lo - 1e-15 && m <= hi + 1e-15);
        }

        #[test]
        fn variance_non_negative(data in unit_vec(1, 200)) {
            prop_assert!(population_variance(&data).unwrap() >= 0.0);
        }
    }
}
