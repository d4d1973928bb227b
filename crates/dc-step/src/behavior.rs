//! Behavior traits: the extension points for user code.
//!
//! A behavior is the thing a [`Step`][crate::Step] wraps.  There is one trait
//! per dispatch granularity, and each has a closure adapter (`FnGroup`,
//! `FnDrone`, `FnList`) so short behaviors can be written inline:
//!
//! ```rust,ignore
//! let step = Step::per_drone_fn("drive home", |ctx, drone| {
//!     drone.controls.throttle = 1.0;
//!     Ok(StepResult::finished_if(drone.position().dist(HOME) < 100.0))
//! });
//! ```
//!
//! Behaviors run on the scheduler's single thread and need not be `Send`.

use dc_drone::{Drone, DroneGroup};

use crate::{BehaviorResult, BranchStatus, StepContext};

// ── StepResult ────────────────────────────────────────────────────────────────

/// What one invocation reports back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct StepResult {
    pub finished: bool,
}

impl StepResult {
    pub const DONE:    StepResult = StepResult { finished: true };
    pub const RUNNING: StepResult = StepResult { finished: false };

    #[inline]
    pub fn finished_if(finished: bool) -> Self {
        Self { finished }
    }
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// Invoked once per tick with the step's whole group.
pub trait GroupBehavior {
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut DroneGroup<'_>,
    ) -> BehaviorResult<StepResult>;

    /// Sub-timelines run by this behavior, for diagnostics.
    ///
    /// Default: none.  The orchestrator overrides this.
    fn branches(&self) -> Vec<BranchStatus> {
        Vec::new()
    }
}

/// Invoked once per tick for each drone that has not yet finished.
pub trait DroneBehavior {
    fn perform(
        &mut self,
        ctx:   &mut StepContext<'_>,
        drone: &mut Drone,
    ) -> BehaviorResult<StepResult>;
}

/// Invoked once per tick with every drone of the group at once.
pub trait ListBehavior {
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut [&mut Drone],
    ) -> BehaviorResult<StepResult>;
}

// ── Closure adapters ──────────────────────────────────────────────────────────

pub struct FnGroup<F>(pub F);

impl<F> GroupBehavior for FnGroup<F>
where
    F: FnMut(&mut StepContext<'_>, &mut DroneGroup<'_>) -> BehaviorResult<StepResult>,
{
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut DroneGroup<'_>,
    ) -> BehaviorResult<StepResult> {
        (self.0)(ctx, drones)
    }
}

pub struct FnDrone<F>(pub F);

impl<F> DroneBehavior for FnDrone<F>
where
    F: FnMut(&mut StepContext<'_>, &mut Drone) -> BehaviorResult<StepResult>,
{
    fn perform(
        &mut self,
        ctx:   &mut StepContext<'_>,
        drone: &mut Drone,
    ) -> BehaviorResult<StepResult> {
        (self.0)(ctx, drone)
    }
}

pub struct FnList<F>(pub F);

impl<F> ListBehavior for FnList<F>
where
    F: FnMut(&mut StepContext<'_>, &mut [&mut Drone]) -> BehaviorResult<StepResult>,
{
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut [&mut Drone],
    ) -> BehaviorResult<StepResult> {
        (self.0)(ctx, drones)
    }
}
