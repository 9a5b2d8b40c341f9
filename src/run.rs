//! Auto-run scheduling.
//!
//! Continuous sampling is an explicit two-state machine, `Idle` and
//! `Running`, driven by an injectable [`Clock`]. Nothing here spawns a
//! thread or owns a timer: the host calls into the session once per
//! frame, and [`RunController::due_ticks`] reports how many interval
//! ticks have elapsed since the last one fired.
//!
//! Missed ticks beyond [`RunController::max_catch_up`] are dropped rather
//! than queued, the way a browser interval timer coalesces while a tab is
//! busy, so a long stall never produces a burst of batches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::ConfigError;

/// Default auto-run tick interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 50;

/// Default number of sample means appended per tick.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default cap on ticks fired by a single poll.
pub const DEFAULT_MAX_CATCH_UP: u32 = 4;

/// Monotonic time source.
pub trait Clock: Send {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the session.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use clt_explorer::run::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(Duration::from_millis(50));
/// assert_eq!(clock.now(), Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(by, Ordering::SeqCst);
    }

    /// Convenience for [`advance`](Self::advance) in milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Validated auto-run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoRun {
    interval: Duration,
    batch_size: usize,
}

impl AutoRun {
    /// # Errors
    /// Returns [`ConfigError::InvalidInterval`] for a zero interval and
    /// [`ConfigError::InvalidBatchSize`] for a zero batch size.
    pub fn new(interval_ms: u64, batch_size: usize) -> Result<Self, ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::InvalidInterval(interval_ms));
        }
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(batch_size));
        }
        Ok(Self {
            interval: Duration::from_millis(interval_ms),
            batch_size,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl Default for AutoRun {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Whether the session is sampling on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunState {
    #[default]
    Idle,
    Running(AutoRun),
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running(_))
    }
}

/// Tracks the auto-run state and when the next tick is due.
#[derive(Debug, Clone)]
pub struct RunController {
    state: RunState,
    next_due: Duration,
    max_catch_up: u32,
}

impl RunController {
    /// # Errors
    /// Returns [`ConfigError::InvalidCatchUp`] if `max_catch_up` is zero.
    pub fn new(max_catch_up: u32) -> Result<Self, ConfigError> {
        if max_catch_up == 0 {
            return Err(ConfigError::InvalidCatchUp(max_catch_up));
        }
        Ok(Self {
            state: RunState::Idle,
            next_due: Duration::ZERO,
            max_catch_up,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn max_catch_up(&self) -> u32 {
        self.max_catch_up
    }

    /// Enters `Running`; the first tick is due one interval after `now`.
    ///
    /// Returns `false` without touching the existing schedule when
    /// already running.
    pub fn start(&mut self, now: Duration, run: AutoRun) -> bool {
        if self.state.is_running() {
            return false;
        }
        self.state = RunState::Running(run);
        self.next_due = now + run.interval();
        true
    }

    /// Returns to `Idle`. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state = RunState::Idle;
        true
    }

    /// Number of ticks to fire at `now`, at most `max_catch_up`.
    ///
    /// Always 0 while idle. Advances the schedule past every elapsed
    /// tick, including the ones dropped by the cap.
    pub fn due_ticks(&mut self, now: Duration) -> u32 {
        let RunState::Running(run) = self.state else {
            return 0;
        };
        if now < self.next_due {
            return 0;
        }
        let interval = run.interval().as_nanos();
        let behind = (now - self.next_due).as_nanos();
        let elapsed_ticks = 1 + behind / interval;
        // remainder is below one interval, which itself came from a u64
        let into_tick = (behind % interval) as u64;
        self.next_due = now - Duration::from_nanos(into_tick) + run.interval();
        elapsed_ticks.min(u128::from(self.max_catch_up)) as u32
    }
}

impl Default for RunController {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            next_due: Duration::ZERO,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn run(interval_ms: u64) -> AutoRun {
        AutoRun::new(interval_ms, 10).unwrap()
    }

    #[test]
    fn test_auto_run_validation() {
        assert!(matches!(
            AutoRun::new(0, 10),
            Err(ConfigError::InvalidInterval(0))
        ));
        assert!(matches!(
            AutoRun::new(50, 0),
            Err(ConfigError::InvalidBatchSize(0))
        ));
        assert_eq!(AutoRun::default(), AutoRun::new(50, 10).unwrap());
    }

    #[test]
    fn test_zero_catch_up_rejected() {
        assert!(matches!(
            RunController::new(0),
            Err(ConfigError::InvalidCatchUp(0))
        ));
    }

    #[test]
    fn test_idle_never_ticks() {
        let mut rc = RunController::default();
        assert_eq!(rc.due_ticks(ms(10_000)), 0);
        assert!(!rc.stop());
    }

    #[test]
    fn test_ticks_once_per_interval() {
        let mut rc = RunController::default();
        assert!(rc.start(ms(0), run(50)));
        assert_eq!(rc.due_ticks(ms(49)), 0);
        assert_eq!(rc.due_ticks(ms(50)), 1);
        assert_eq!(rc.due_ticks(ms(60)), 0);
        assert_eq!(rc.due_ticks(ms(100)), 1);
        assert_eq!(rc.due_ticks(ms(175)), 1);
        assert_eq!(rc.due_ticks(ms(200)), 1);
    }

    #[test]
    fn test_second_start_keeps_schedule() {
        let mut rc = RunController::default();
        assert!(rc.start(ms(0), run(50)));
        assert!(!rc.start(ms(30), run(10)));
        assert_eq!(rc.state(), RunState::Running(run(50)));
        assert_eq!(rc.due_ticks(ms(40)), 0);
        assert_eq!(rc.due_ticks(ms(50)), 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut rc = RunController::new(3).unwrap();
        rc.start(ms(0), run(10));
        assert_eq!(rc.due_ticks(ms(1000)), 3);
        // dropped ticks are not replayed
        assert_eq!(rc.due_ticks(ms(1005)), 0);
        assert_eq!(rc.due_ticks(ms(1010)), 1);
    }

    #[test]
    fn test_stop_cancels_pending_ticks() {
        let mut rc = RunController::default();
        rc.start(ms(0), run(50));
        assert!(rc.stop());
        assert_eq!(rc.state(), RunState::Idle);
        assert_eq!(rc.due_ticks(ms(500)), 0);
    }

    #[test]
    fn test_restart_schedules_from_now() {
        let mut rc = RunController::default();
        rc.start(ms(0), run(50));
        rc.stop();
        rc.start(ms(1000), run(50));
        assert_eq!(rc.due_ticks(ms(1049)), 0);
        assert_eq!(rc.due_ticks(ms(1050)), 1);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let other = clock.clone();
        other.advance_ms(25);
        clock.advance_ms(25);
        assert_eq!(other.now(), ms(50));
    }
}
