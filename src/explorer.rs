//! The sampling session.
//!
//! [`Explorer`] owns everything one lab instance needs: the selected
//! parent shape and sample size, the random source, the collected means
//! with their histogram and running summary, and the auto-run controller.
//! There is no process-wide state; independent sessions can coexist.
//!
//! Changing the parent shape or the sample size discards the collected
//! means, because every mean in the collection must come from the
//! currently selected configuration. Resetting also stops auto-run, since
//! a timer left running would immediately refill the cleared collection.

use std::fmt;

use crate::config::ExplorerConfig;
use crate::distributions::{parent_curve, DistributionKind};
use crate::error::ConfigError;
use crate::histogram::Histogram;
use crate::milestone::Milestone;
use crate::prediction::Prediction;
use crate::random::{create_rng, entropy_rng, UniformSource};
use crate::run::{AutoRun, Clock, RunController, RunState, SystemClock};
use crate::sampling::{append_samples, MeansCollection, SampleSize};
use crate::stats::{Summary, WelfordAccumulator};

/// One Central Limit Theorem lab session.
pub struct Explorer {
    distribution: DistributionKind,
    sample_size: SampleSize,
    auto_run: AutoRun,
    source: Box<dyn UniformSource + Send>,
    clock: Box<dyn Clock>,
    means: MeansCollection,
    histogram: Histogram,
    accumulator: WelfordAccumulator,
    controller: RunController,
    milestones: Vec<Milestone>,
}

impl Explorer {
    /// Creates a session on the system clock.
    ///
    /// Uses a seeded generator when `config.seed` is set, otherwise one
    /// seeded from the operating system.
    ///
    /// # Errors
    /// Returns the first option [`ExplorerConfig::validate`] rejects.
    pub fn new(config: ExplorerConfig) -> Result<Self, ConfigError> {
        let source = match config.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        };
        Self::with_parts(config, source, SystemClock::new())
    }

    /// Creates a session with an explicit random source and clock.
    ///
    /// `config.seed` is ignored; the given source is used as is.
    pub fn with_parts<S, C>(config: ExplorerConfig, source: S, clock: C) -> Result<Self, ConfigError>
    where
        S: UniformSource + Send + 'static,
        C: Clock + 'static,
    {
        config.validate()?;
        let explorer = Self {
            distribution: config.distribution,
            sample_size: SampleSize::new(config.sample_size)?,
            auto_run: AutoRun::new(config.auto_run_interval_ms, config.auto_run_batch_size)?,
            source: Box::new(source),
            clock: Box::new(clock),
            means: MeansCollection::new(),
            histogram: Histogram::new(config.bin_count)?,
            accumulator: WelfordAccumulator::new(),
            controller: RunController::new(config.max_catch_up_ticks)?,
            milestones: Vec::new(),
        };
        tracing::debug!(
            distribution = %explorer.distribution,
            sample_size = explorer.sample_size.get(),
            bins = explorer.histogram.bin_count(),
            "explorer session created"
        );
        Ok(explorer)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn distribution(&self) -> DistributionKind {
        self.distribution
    }

    pub fn sample_size(&self) -> SampleSize {
        self.sample_size
    }

    /// Selects a new parent shape and resets the session.
    pub fn set_distribution(&mut self, kind: DistributionKind) {
        tracing::debug!(from = %self.distribution, to = %kind, "distribution changed");
        self.distribution = kind;
        self.reset();
    }

    /// Sets the draws per sample mean and resets the session.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidSampleSize`] for zero, leaving the
    /// session untouched.
    pub fn set_sample_size(&mut self, n: usize) -> Result<(), ConfigError> {
        let size = SampleSize::new(n)?;
        tracing::debug!(from = self.sample_size.get(), to = n, "sample size changed");
        self.sample_size = size;
        self.reset();
        Ok(())
    }

    /// Changes the bin count of the maintained histogram.
    ///
    /// The collected means are kept and re-binned.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBinCount`] for zero.
    pub fn set_bin_count(&mut self, bin_count: usize) -> Result<(), ConfigError> {
        self.histogram = Histogram::rebuild(self.means.as_slice(), bin_count)?;
        Ok(())
    }

    // =========================================================================
    // Control surface
    // =========================================================================

    /// Draws exactly one sample mean, in any run state.
    ///
    /// Returns the appended mean.
    pub fn sample_once(&mut self) -> f64 {
        self.append(1);
        self.means.last().unwrap_or_default()
    }

    /// Starts auto-run with the given interval and batch size.
    ///
    /// Returns `Ok(false)` if already running; the running schedule is
    /// left as it was.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidInterval`] or
    /// [`ConfigError::InvalidBatchSize`] for zero values.
    pub fn start_auto_run(&mut self, interval_ms: u64, batch_size: usize) -> Result<bool, ConfigError> {
        let run = AutoRun::new(interval_ms, batch_size)?;
        Ok(self.start(run))
    }

    /// Starts auto-run with the configured interval and batch size.
    pub fn start_auto_run_default(&mut self) -> bool {
        self.start(self.auto_run)
    }

    /// Stops auto-run. Returns `false` if it was not running.
    pub fn stop_auto_run(&mut self) -> bool {
        let stopped = self.controller.stop();
        if stopped {
            tracing::info!(count = self.means.len(), "auto-run stopped");
        }
        stopped
    }

    /// Starts auto-run with the configured parameters, or stops it.
    pub fn toggle_auto_run(&mut self) -> RunState {
        if self.controller.state().is_running() {
            self.stop_auto_run();
        } else {
            self.start_auto_run_default();
        }
        self.controller.state()
    }

    /// Clears the means, histogram, summary and pending milestones, and
    /// stops auto-run.
    pub fn reset(&mut self) {
        self.means.clear();
        self.histogram.clear();
        self.accumulator.clear();
        self.milestones.clear();
        self.stop_auto_run();
        tracing::info!(distribution = %self.distribution, sample_size = self.sample_size.get(), "session reset");
    }

    /// Fires every auto-run batch due at the current clock time.
    ///
    /// Call once per frame. Returns the number of means appended.
    pub fn pump(&mut self) -> usize {
        let ticks = self.controller.due_ticks(self.clock.now());
        let RunState::Running(run) = self.controller.state() else {
            return 0;
        };
        let mut appended = 0;
        for _ in 0..ticks {
            self.append(run.batch_size());
            appended += run.batch_size();
        }
        if appended > 0 {
            tracing::debug!(ticks, appended, count = self.means.len(), "auto-run batches applied");
        }
        appended
    }

    // =========================================================================
    // Read-only projections
    // =========================================================================

    pub fn run_state(&self) -> RunState {
        self.controller.state()
    }

    /// Every collected sample mean, in draw order.
    pub fn means(&self) -> &[f64] {
        self.means.as_slice()
    }

    /// The incrementally maintained histogram.
    pub fn current_histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Histogram of the collected means with `bin_count` bins.
    ///
    /// Uses the maintained histogram when the bin count matches, and
    /// rebuilds from the collection otherwise.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBinCount`] for zero.
    pub fn histogram(&self, bin_count: usize) -> Result<Histogram, ConfigError> {
        if bin_count == self.histogram.bin_count() {
            return Ok(self.histogram.clone());
        }
        Histogram::rebuild(self.means.as_slice(), bin_count)
    }

    /// Count, mean and shape of the collected means.
    pub fn summary(&self) -> Summary {
        Summary::from_accumulator(&self.accumulator)
    }

    /// Normal approximation for the current shape and sample size.
    pub fn prediction(&self) -> Prediction {
        Prediction::for_kind(self.distribution, self.sample_size)
    }

    /// Density curve of any parent shape; independent of the session data.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidResolution`] for zero.
    pub fn parent_curve(&self, kind: DistributionKind, resolution: usize) -> Result<Vec<(f64, f64)>, ConfigError> {
        parent_curve(kind, resolution)
    }

    /// Drains the milestones reached since the last call.
    pub fn take_milestones(&mut self) -> Vec<Milestone> {
        std::mem::take(&mut self.milestones)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn start(&mut self, run: AutoRun) -> bool {
        let started = self.controller.start(self.clock.now(), run);
        if started {
            tracing::info!(
                interval_ms = run.interval().as_millis() as u64,
                batch_size = run.batch_size(),
                "auto-run started"
            );
        }
        started
    }

    fn append(&mut self, n: usize) {
        let before = self.means.len();
        let histogram = &mut self.histogram;
        let accumulator = &mut self.accumulator;
        append_samples(
            n,
            self.distribution,
            self.sample_size,
            self.source.as_mut(),
            &mut self.means,
            |mean| {
                histogram.record(mean);
                accumulator.update(mean);
            },
        );
        for milestone in Milestone::crossed(before, self.means.len()) {
            tracing::info!(?milestone, count = milestone.threshold(), "milestone reached");
            self.milestones.push(milestone);
        }
    }
}

impl fmt::Debug for Explorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Explorer")
            .field("distribution", &self.distribution)
            .field("sample_size", &self.sample_size)
            .field("auto_run", &self.auto_run)
            .field("count", &self.means.len())
            .field("run_state", &self.controller.state())
            .finish_non_exhaustive()
    }
}
