//! # clt-explorer
//!
//! Repeated-sampling engine behind a Central Limit Theorem teaching lab.
//!
//! A session repeatedly draws a fixed-size sample from one of six parent
//! shapes on `[0, 1]`, reduces it to its mean, and collects the means
//! into a histogram that visibly converges to a bell curve whatever the
//! parent looks like. The crate knows nothing about rendering; it hands
//! plain numbers to whatever draws the charts.
//!
//! ## Modules
//!
//! - [`distributions`] — Parent shapes: generators, density curves, moments
//! - [`sampling`] — Sample means and the means collection
//! - [`histogram`] — Fixed-bin histogram with clamping
//! - [`stats`] — Compensated mean, Welford accumulator, summaries
//! - [`prediction`] — Normal approximation of the sampling distribution
//! - [`run`] — Auto-run state machine and injectable clocks
//! - [`explorer`] — The session object tying it all together
//!
//! ## Example
//!
//! ```
//! use clt_explorer::{DistributionKind, Explorer, ExplorerConfig};
//!
//! let config = ExplorerConfig::default()
//!     .with_distribution(DistributionKind::Skewed)
//!     .with_sample_size(30)
//!     .with_seed(7);
//! let mut explorer = Explorer::new(config).unwrap();
//! for _ in 0..200 {
//!     explorer.sample_once();
//! }
//! let summary = explorer.summary();
//! assert_eq!(summary.count, 200);
//! assert!((summary.mean - 1.0 / 3.0).abs() < 0.02);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Explicit session state**: no globals; every lab owns an [`Explorer`]
//! - **Deterministic under test**: injectable random source and clock
//! - **Never drop data**: out-of-range means are clamped into edge bins

pub mod config;
pub mod distributions;
pub mod error;
pub mod explorer;
pub mod histogram;
pub mod milestone;
pub mod prediction;
pub mod random;
pub mod run;
pub mod sampling;
pub mod special;
pub mod stats;

pub use config::ExplorerConfig;
pub use distributions::DistributionKind;
pub use error::ConfigError;
pub use explorer::Explorer;
pub use histogram::Histogram;
pub use milestone::Milestone;
pub use prediction::Prediction;
pub use run::{Clock, ManualClock, RunState, SystemClock};
pub use sampling::{MeansCollection, SampleSize};
pub use stats::Summary;
