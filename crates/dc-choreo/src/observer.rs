//! Driver observer trait for progress reporting and data collection.

use dc_core::{DroneId, Tick};
use dc_step::StepFailure;

use crate::TickOutcome;

/// Callbacks invoked by [`Choreography::tick`][crate::Choreography::tick].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: failure counter
///
/// ```rust,ignore
/// struct Failures(usize);
///
/// impl ChoreoObserver for Failures {
///     fn on_step_failure(&mut self, _failure: &StepFailure) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait ChoreoObserver {
    /// Called at the very start of each tick, before the registry refresh.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with its outcome and the number of
    /// step failures recorded during it.
    fn on_tick_end(&mut self, _tick: Tick, _outcome: &TickOutcome, _failures: usize) {}

    /// Called once per failed behavior invocation, after the tick's steps
    /// have run.
    fn on_step_failure(&mut self, _failure: &StepFailure) {}

    /// Called when the sequence is regenerated after the first build, with
    /// the roster it was built for.
    fn on_rebuild(&mut self, _tick: Tick, _roster: &[DroneId]) {}

    /// Called on the tick the readiness gate exhausts its wait budget.
    fn on_gate_timeout(&mut self, _tick: Tick, _waited: u64) {}

    /// Called once, on the tick the root timeline finishes.
    fn on_finished(&mut self, _tick: Tick) {}
}

/// A [`ChoreoObserver`] that does nothing.
pub struct NoopObserver;

impl ChoreoObserver for NoopObserver {}
