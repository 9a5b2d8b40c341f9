//! Drawing samples and reducing them to sample means.
//!
//! A *sample mean* is the average of [`SampleSize`] independent draws
//! from one parent shape; it is the unit datum of a session. Values are
//! appended to a [`MeansCollection`] in draw order, so a seeded source
//! reproduces the collection exactly.

use std::num::NonZeroUsize;

use crate::distributions::DistributionKind;
use crate::error::ConfigError;
use crate::random::UniformSource;
use crate::stats::kahan_sum;

/// Default number of draws averaged into one sample mean.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Validated number of draws per sample mean (at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleSize(NonZeroUsize);

impl SampleSize {
    /// # Errors
    /// Returns [`ConfigError::InvalidSampleSize`] if `n` is zero.
    pub fn new(n: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(n)
            .map(SampleSize)
            .ok_or(ConfigError::InvalidSampleSize(n))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for SampleSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_SAMPLE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for SampleSize {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

/// Ordered, append-only record of the sample means of a session.
///
/// Values are never edited in place; the only way to shrink the
/// collection is [`clear`](Self::clear).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeansCollection {
    values: Vec<f64>,
}

impl MeansCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample mean.
    pub fn push(&mut self, mean: f64) {
        self.values.push(mean);
    }

    /// Drops every collected mean.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    /// Most recently appended mean.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl AsRef<[f64]> for MeansCollection {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl<'a> IntoIterator for &'a MeansCollection {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Draws `sample_size` values from `kind` and returns their mean.
///
/// # Examples
/// ```
/// use clt_explorer::distributions::DistributionKind;
/// use clt_explorer::random::ScriptedSource;
/// use clt_explorer::sampling::{draw_sample_mean, SampleSize};
///
/// let mut src = ScriptedSource::new(vec![0.1, 0.2, 0.3, 0.4, 0.5]);
/// let size = SampleSize::new(5).unwrap();
/// let m = draw_sample_mean(DistributionKind::Uniform, size, &mut src);
/// assert!((m - 0.3).abs() < 1e-15);
/// ```
pub fn draw_sample_mean<S: UniformSource + ?Sized>(
    kind: DistributionKind,
    sample_size: SampleSize,
    source: &mut S,
) -> f64 {
    let n = sample_size.get();
    let draws: Vec<f64> = (0..n).map(|_| kind.sample(source)).collect();
    kahan_sum(&draws) / n as f64
}

/// Appends `n` fresh sample means to `collection`, in draw order.
///
/// Each appended mean is also passed to `on_append`, which lets the
/// caller keep derived views (histogram, running summary) current
/// without rescanning the collection.
pub fn append_samples<S, F>(
    n: usize,
    kind: DistributionKind,
    sample_size: SampleSize,
    source: &mut S,
    collection: &mut MeansCollection,
    mut on_append: F,
) where
    S: UniformSource + ?Sized,
    F: FnMut(f64),
{
    for _ in 0..n {
        let mean = draw_sample_mean(kind, sample_size, source);
        collection.push(mean);
        on_append(mean);
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn append_grows_by_n(seed in 0_u64..10000, n in 0_usize..50, k in 1_usize..20) {
            let mut rng = create_rng(seed);
            let mut means = MeansCollection::new();
            means.push(0.5);
            append_samples(n, DistributionKind::Stepped, SampleSize::new(k).unwrap(), &mut rng, &mut means, |_| {});
            prop_assert_eq!(means.len(), n + 1);
        }

        #[test]
        fn sample_mean_within_shape_support(seed in 0_u64..10000, idx in 0_usize..6, k in 1_usize..30) {
            let kind = DistributionKind::ALL[idx];
            let (lo, hi) = kind.support();
            let mut rng = create_rng(seed);
            let m = draw_sample_mean(kind, SampleSize::new(k).unwrap(), &mut rng);
            prop_assert!(m >= lo && m <= hi);
        }
    }
}
