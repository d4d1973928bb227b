//! `Step`: the atomic unit of scheduled work.

use dc_core::{DroneId, DroneSet};
use dc_drone::{Drone, DroneGroup};

use crate::{
    BehaviorResult, BranchStatus, DroneBehavior, FnDrone, FnGroup, FnList, GroupBehavior,
    ListBehavior, StepContext, StepFailure, StepResult,
};

/// Dispatch granularity plus the wrapped behavior.
pub enum StepKind {
    Combined(Box<dyn GroupBehavior>),
    PerDrone {
        behavior: Box<dyn DroneBehavior>,
        /// Drones that have reported finished; never invoked again.
        done:     DroneSet,
    },
    DroneList(Box<dyn ListBehavior>),
}

/// A labelled behavior scheduled on a [`Timeline`][crate::Timeline].
///
/// Constructed once when its timeline is built, invoked once per tick while
/// current, and discarded logically once it finishes: a step is never
/// revisited.
pub struct Step {
    label: String,
    kind:  StepKind,
}

impl Step {
    // ── Construction ──────────────────────────────────────────────────────

    pub fn combined(label: impl Into<String>, behavior: impl GroupBehavior + 'static) -> Self {
        Self { label: label.into(), kind: StepKind::Combined(Box::new(behavior)) }
    }

    pub fn combined_fn<F>(label: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&mut StepContext<'_>, &mut DroneGroup<'_>) -> BehaviorResult<StepResult> + 'static,
    {
        Self::combined(label, FnGroup(f))
    }

    pub fn per_drone(label: impl Into<String>, behavior: impl DroneBehavior + 'static) -> Self {
        Self {
            label: label.into(),
            kind:  StepKind::PerDrone { behavior: Box::new(behavior), done: DroneSet::default() },
        }
    }

    pub fn per_drone_fn<F>(label: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&mut StepContext<'_>, &mut Drone) -> BehaviorResult<StepResult> + 'static,
    {
        Self::per_drone(label, FnDrone(f))
    }

    pub fn drone_list(label: impl Into<String>, behavior: impl ListBehavior + 'static) -> Self {
        Self { label: label.into(), kind: StepKind::DroneList(Box::new(behavior)) }
    }

    pub fn drone_list_fn<F>(label: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&mut StepContext<'_>, &mut [&mut Drone]) -> BehaviorResult<StepResult> + 'static,
    {
        Self::drone_list(label, FnList(f))
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            StepKind::Combined(_)     => "combined",
            StepKind::PerDrone { .. } => "per-drone",
            StepKind::DroneList(_)    => "drone-list",
        }
    }

    /// For `PerDrone` steps, whether `drone` has already finished.
    pub fn is_drone_done(&self, drone: DroneId) -> bool {
        match &self.kind {
            StepKind::PerDrone { done, .. } => done.contains(&drone),
            _ => false,
        }
    }

    /// Forget which drones a `PerDrone` step has already finished, so the
    /// next [`invoke`][Self::invoke] visits every drone again.  No-op for
    /// other kinds.
    pub fn restart(&mut self) {
        if let StepKind::PerDrone { done, .. } = &mut self.kind {
            done.clear();
        }
    }

    pub fn branches(&self) -> Vec<BranchStatus> {
        match &self.kind {
            StepKind::Combined(b) => b.branches(),
            _ => Vec::new(),
        }
    }

    // ── Invocation ────────────────────────────────────────────────────────

    /// Run one tick of this step over `drones`.
    ///
    /// Behavior errors are reported on `ctx` and yield "not finished".  A
    /// `PerDrone` step over an empty group is finished immediately.
    pub fn invoke(&mut self, ctx: &mut StepContext<'_>, drones: &mut DroneGroup<'_>) -> StepResult {
        let Step { label, kind } = self;
        let label = label.as_str();
        match kind {
            StepKind::Combined(behavior) => {
                let result = behavior.perform(ctx, drones);
                settle(ctx, label, None, result)
            }

            StepKind::DroneList(behavior) => {
                let mut list = drones.drones_mut();
                let result = behavior.perform(ctx, &mut list);
                settle(ctx, label, None, result)
            }

            StepKind::PerDrone { behavior, done } => {
                let members = drones.ids().to_vec();
                for id in &members {
                    if done.contains(id) {
                        continue;
                    }
                    let Some(drone) = drones.get_mut(*id) else { continue };
                    let result = behavior.perform(ctx, drone);
                    if settle(ctx, label, Some(*id), result).finished {
                        done.insert(*id);
                    }
                }
                StepResult::finished_if(members.iter().all(|id| done.contains(id)))
            }
        }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label)
            .field("kind", &self.kind_name())
            .finish()
    }
}

/// Collapse a behavior result, recording and logging any failure.
fn settle(
    ctx:    &mut StepContext<'_>,
    label:  &str,
    drone:  Option<DroneId>,
    result: BehaviorResult<StepResult>,
) -> StepResult {
    match result {
        Ok(r) => r,
        Err(error) => {
            tracing::warn!(tick = %ctx.now, step = label, ?drone, %error, "step invocation failed");
            ctx.report(StepFailure { tick: ctx.now, step: label.to_owned(), drone, error });
            StepResult::RUNNING
        }
    }
}
