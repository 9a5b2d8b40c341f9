//! Parent distributions.
//!
//! The six parent shapes a lab session samples from, all supported on
//! (approximately) `[0, 1]`. Each shape has
//!
//! - a pure generator function consuming draws from a [`UniformSource`],
//! - the closed-form density curve drawn behind the histogram,
//! - analytic moments of the *generator* (used for the CLT prediction).
//!
//! # Supported Shapes
//!
//! | Shape | Generator | Mean | Variance |
//! |---|---|---|---|
//! | [`Uniform`](DistributionKind::Uniform) | u | 1/2 | 1/12 |
//! | [`Skewed`](DistributionKind::Skewed) | u² | 1/3 | 4/45 |
//! | [`Bimodal`](DistributionKind::Bimodal) | {0.2, 0.8} + U(−0.1, 0.1) | 1/2 | 0.09 + 1/300 |
//! | [`Parabolic`](DistributionKind::Parabolic) | sin²(πu/2) | 1/2 | 1/8 |
//! | [`Triangular`](DistributionKind::Triangular) | (u₁+u₂)/2 | 1/2 | 1/24 |
//! | [`Stepped`](DistributionKind::Stepped) | three-band mixture | 0.395 | 0.083975 |
//!
//! # Approximate Shapes
//!
//! Skewed and Parabolic are visual approximations, not exact samplers of
//! the curves returned by [`DistributionKind::density`]. `u²` has density
//! `1/(2√x)` rather than `3e^{−3x}`, and `sin²(πu/2)` is the arcsine law
//! Beta(½, ½) rather than the drawn parabola. Both resemble their curves
//! closely enough for the sampling distribution of the mean to behave as
//! the picture suggests.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::UniformSource;

/// Default number of intervals used when sampling a parent curve.
pub const DEFAULT_CURVE_RESOLUTION: usize = 100;

/// Band layout of the stepped shape: `(lower, upper, probability)`.
const STEP_BANDS: [(f64, f64, f64); 3] = [(0.0, 0.3, 0.5), (0.3, 0.7, 0.3), (0.7, 1.0, 0.2)];

/// Selector thresholds picking the first and second stepped band.
const STEP_SELECTORS: [f64; 2] = [0.5, 0.8];

/// Heights of the stepped curve as drawn next to the histogram.
const STEP_HEIGHTS: [f64; 3] = [1.66, 0.75, 0.66];

/// Centers of the two bimodal bumps.
const BIMODAL_CENTERS: (f64, f64) = (0.2, 0.8);

/// Half-width of the additive bimodal noise.
const BIMODAL_NOISE: f64 = 0.1;

/// Selector for the parent population shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    #[default]
    Uniform,
    Skewed,
    Bimodal,
    Parabolic,
    Triangular,
    #[serde(rename = "step", alias = "stepped")]
    Stepped,
}

impl DistributionKind {
    /// All shapes, in menu order.
    pub const ALL: [DistributionKind; 6] = [
        DistributionKind::Uniform,
        DistributionKind::Skewed,
        DistributionKind::Bimodal,
        DistributionKind::Parabolic,
        DistributionKind::Triangular,
        DistributionKind::Stepped,
    ];

    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            DistributionKind::Uniform => "uniform",
            DistributionKind::Skewed => "skewed",
            DistributionKind::Bimodal => "bimodal",
            DistributionKind::Parabolic => "parabolic",
            DistributionKind::Triangular => "triangular",
            DistributionKind::Stepped => "step",
        }
    }

    /// Draws one value from this shape.
    pub fn sample<S: UniformSource + ?Sized>(self, source: &mut S) -> f64 {
        match self {
            DistributionKind::Uniform => uniform(source),
            DistributionKind::Skewed => skewed(source),
            DistributionKind::Bimodal => bimodal(source),
            DistributionKind::Parabolic => parabolic(source),
            DistributionKind::Triangular => triangular(source),
            DistributionKind::Stepped => stepped(source),
        }
    }

    /// Documented `(min, max)` bounds of a single draw.
    ///
    /// Every shape but Bimodal stays inside `[0, 1]`; the bimodal noise
    /// may bleed up to 0.1 past either end.
    pub fn support(self) -> (f64, f64) {
        match self {
            DistributionKind::Bimodal => (-0.1, 1.1),
            _ => (0.0, 1.0),
        }
    }

    /// Density of the parent curve drawn for this shape at `x`.
    ///
    /// ```text
    /// uniform     1
    /// skewed      3·e^(−3x)
    /// bimodal     e^(−(x−0.2)²/0.02) + e^(−(x−0.8)²/0.02)
    /// parabolic   12·(x−0.5)² + 0.2
    /// triangular  4x for x < 0.5, 4(1−x) otherwise
    /// step        1.66 | 0.75 | 0.66 on [0, 0.3) | [0.3, 0.7) | [0.7, 1]
    /// ```
    pub fn density(self, x: f64) -> f64 {
        match self {
            DistributionKind::Uniform => 1.0,
            DistributionKind::Skewed => 3.0 * (-3.0 * x).exp(),
            DistributionKind::Bimodal => {
                let (a, b) = BIMODAL_CENTERS;
                (-(x - a).powi(2) / 0.02).exp() + (-(x - b).powi(2) / 0.02).exp()
            }
            DistributionKind::Parabolic => 12.0 * (x - 0.5).powi(2) + 0.2,
            DistributionKind::Triangular => {
                if x < 0.5 {
                    4.0 * x
                } else {
                    4.0 * (1.0 - x)
                }
            }
            DistributionKind::Stepped => {
                if x < STEP_BANDS[0].1 {
                    STEP_HEIGHTS[0]
                } else if x < STEP_BANDS[1].1 {
                    STEP_HEIGHTS[1]
                } else {
                    STEP_HEIGHTS[2]
                }
            }
        }
    }

    /// Mean of a single draw from the generator.
    pub fn mean(self) -> f64 {
        match self {
            DistributionKind::Uniform
            | DistributionKind::Bimodal
            | DistributionKind::Parabolic
            | DistributionKind::Triangular => 0.5,
            // E[U²] = 1/3
            DistributionKind::Skewed => 1.0 / 3.0,
            DistributionKind::Stepped => STEP_BANDS
                .iter()
                .map(|&(lo, hi, p)| p * (lo + hi) / 2.0)
                .sum(),
        }
    }

    /// Variance of a single draw from the generator.
    pub fn variance(self) -> f64 {
        match self {
            DistributionKind::Uniform => 1.0 / 12.0,
            // E[U⁴] − E[U²]² = 1/5 − 1/9
            DistributionKind::Skewed => 4.0 / 45.0,
            DistributionKind::Bimodal => {
                let half_gap = (BIMODAL_CENTERS.1 - BIMODAL_CENTERS.0) / 2.0;
                let width = 2.0 * BIMODAL_NOISE;
                half_gap * half_gap + width * width / 12.0
            }
            // Arcsine law, Beta(1/2, 1/2)
            DistributionKind::Parabolic => 1.0 / 8.0,
            DistributionKind::Triangular => 1.0 / 24.0,
            DistributionKind::Stepped => {
                let second_moment: f64 = STEP_BANDS
                    .iter()
                    .map(|&(lo, hi, p)| {
                        let mid = (lo + hi) / 2.0;
                        let width = hi - lo;
                        p * (mid * mid + width * width / 12.0)
                    })
                    .sum();
                let m = self.mean();
                second_moment - m * m
            }
        }
    }

    /// Standard deviation of a single draw from the generator.
    pub fn std_dev(self) -> f64 {
        self.variance().sqrt()
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(DistributionKind::Uniform),
            "skewed" => Ok(DistributionKind::Skewed),
            "bimodal" => Ok(DistributionKind::Bimodal),
            "parabolic" => Ok(DistributionKind::Parabolic),
            "triangular" => Ok(DistributionKind::Triangular),
            "step" | "stepped" => Ok(DistributionKind::Stepped),
            _ => Err(ConfigError::UnknownDistribution(s.to_string())),
        }
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Uniform on `[0, 1)`.
pub fn uniform<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    source.next_uniform()
}

/// Right-skewed shape: the square of a uniform draw.
///
/// Pushes mass toward 0. This is an approximation of the exponential-like
/// curve, not an exact sampler of it.
pub fn skewed<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    let u = source.next_uniform();
    u * u
}

/// Two bumps centered at 0.2 and 0.8 with uniform noise in `[−0.1, 0.1)`.
///
/// Consumes the selector draw first, then the noise draw. The result may
/// leave `[0, 1]` slightly for inputs whose noise is pushed further out;
/// callers binning the value must clamp.
pub fn bimodal<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    let center = if source.next_uniform() < 0.5 {
        BIMODAL_CENTERS.0
    } else {
        BIMODAL_CENTERS.1
    };
    center + (source.next_uniform() * 2.0 * BIMODAL_NOISE - BIMODAL_NOISE)
}

/// U-shaped: `sin²(π·u/2)`.
pub fn parabolic<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    let u = source.next_uniform();
    (FRAC_PI_2 * u).sin().powi(2)
}

/// Symmetric triangle on `[0, 1]` peaking at 0.5: mean of two uniforms.
pub fn triangular<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    let a = source.next_uniform();
    let b = source.next_uniform();
    (a + b) / 2.0
}

/// Three bands of decreasing density.
///
/// 50% of draws land in `[0, 0.3)`, 30% in `[0.3, 0.7)`, 20% in
/// `[0.7, 1.0)`, uniform within the chosen band. Consumes the band
/// selector first, then the position draw.
pub fn stepped<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    let selector = source.next_uniform();
    let (lo, hi, _) = if selector < STEP_SELECTORS[0] {
        STEP_BANDS[0]
    } else if selector < STEP_SELECTORS[1] {
        STEP_BANDS[1]
    } else {
        STEP_BANDS[2]
    };
    lo + source.next_uniform() * (hi - lo)
}

/// Samples the parent curve of `kind` at `resolution + 1` evenly spaced
/// points `x = i / resolution`, `i = 0..=resolution`.
///
/// # Errors
/// Returns [`ConfigError::InvalidResolution`] if `resolution` is zero.
///
/// # Examples
/// ```
/// use clt_explorer::distributions::{parent_curve, DistributionKind};
/// let curve = parent_curve(DistributionKind::Triangular, 4).unwrap();
/// assert_eq!(curve, vec![(0.0, 0.0), (0.25, 1.0), (0.5, 2.0), (0.75, 1.0), (1.0, 0.0)]);
/// ```
pub fn parent_curve(kind: DistributionKind, resolution: usize) -> Result<Vec<(f64, f64)>, ConfigError> {
    if resolution == 0 {
        return Err(ConfigError::InvalidResolution);
    }
    Ok((0..=resolution)
        .map(|i| {
            let x = i as f64 / resolution as f64;
            (x, kind.density(x))
        })
        .collect())
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
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn unit_shapes_stay_in_unit_interval(seed in 0_u64..10000, idx in 0_usize..6) {
            let kind = DistributionKind::ALL[idx];
            prop_assume!(kind != DistributionKind::Bimodal);
            let mut rng = create_rng(seed);
            for _ in 0..100 {
                let x = kind.sample(&mut rng);
                prop_assert!((0.0..=1.0).contains(&x), "{} gave {}", kind, x);
            }
        }

        #[test]
        fn bimodal_stays_near_its_bumps(seed in 0_u64..10000) {
            let mut rng = create_rng(seed);
            for _ in 0..100 {
                let x = bimodal(&mut rng);
                let near_low = (0.1..=0.3).contains(&x);
                let near_high = (0.7..=0.9).contains(&x);
                prop_assert!(near_low || near_high, "bimodal gave {}", x);
            }
        }

        #[test]
        fn densities_non_negative(x in 0.0_f64..=1.0, idx in 0_usize..6) {
            prop_assert!(DistributionKind::ALL[idx].density(x) >= 0.0);
        }
    }
}
