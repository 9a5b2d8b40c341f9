//! Collection-size milestones worth pointing out to the learner.
//!
//! The lab narrates a few moments as the means pile up: the first dot, a
//! pattern forming, the law of large numbers, the bell appearing, and
//! stability past 500. The explorer reports each threshold once per run
//! of growth, whether it was crossed by a single sample or a batch.

use serde::Serialize;

/// A collection size the histogram has just reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    FirstMean,
    PatternForming,
    LargeNumbers,
    BellCurve,
    Stable,
}

impl Milestone {
    /// All milestones, in threshold order.
    pub const ALL: [Milestone; 5] = [
        Milestone::FirstMean,
        Milestone::PatternForming,
        Milestone::LargeNumbers,
        Milestone::BellCurve,
        Milestone::Stable,
    ];

    /// Collection size at which this milestone is reached.
    pub fn threshold(self) -> usize {
        match self {
            Milestone::FirstMean => 1,
            Milestone::PatternForming => 10,
            Milestone::LargeNumbers => 50,
            Milestone::BellCurve => 100,
            Milestone::Stable => 500,
        }
    }

    /// Milestones whose threshold lies in `(before, after]`.
    ///
    /// # Examples
    /// ```
    /// use clt_explorer::milestone::Milestone;
    /// assert_eq!(Milestone::crossed(0, 1), vec![Milestone::FirstMean]);
    /// assert_eq!(Milestone::crossed(5, 60), vec![Milestone::PatternForming, Milestone::LargeNumbers]);
    /// assert!(Milestone::crossed(10, 10).is_empty());
    /// ```
    pub fn crossed(before: usize, after: usize) -> Vec<Milestone> {
        Self::ALL
            .into_iter()
            .filter(|m| m.threshold() > before && m.threshold() <= after)
            .collect()
    }
}
