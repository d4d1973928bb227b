//! `Orchestrator`: concurrent (within-tick) composition of sub-timelines.
//!
//! Each tick every unfinished child is ticked in construction order with the
//! orchestrator's own elapsed time.  The orchestrator is finished once every
//! child has finished; finished children are never invoked again.
//!
//! Children must own disjoint drone subsets.  [`OrchestratorBuilder::build`]
//! rejects overlapping subsets unless [`OrchestratorBuilder::allow_overlap`]
//! is set, in which case drones may be handed from one child to a later one
//! (time-staggered reuse) and any tick where two *active* children claim the
//! same drone is logged and counted instead.  Only drones listed by more
//! than one child are checked; that list is computed once at build time.

use dc_core::{DroneId, DroneMap, Tick};
use dc_drone::DroneGroup;
use dc_step::{BehaviorResult, BranchStatus, GroupBehavior, Step, StepContext, StepResult};

use crate::{ChoreoError, ChoreoResult, SubTimeline};

/// A drone listed by two or more children, with those children's indices
/// in construction order.
#[derive(Debug)]
struct SharedDrone {
    drone:     DroneId,
    claimants: Vec<usize>,
}

#[derive(Debug)]
pub struct Orchestrator {
    children:      Vec<SubTimeline>,
    /// Empty unless built with `allow_overlap`.
    shared:        Vec<SharedDrone>,
    double_claims: u64,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Tick every unfinished child.  Time since the orchestrator started is
    /// read from `ctx.elapsed`, which the enclosing timeline sets to the
    /// ticks since this step became current.
    pub fn tick(&mut self, ctx: &mut StepContext<'_>, drones: &mut DroneGroup<'_>) -> bool {
        let since_start = ctx.elapsed;
        if !self.shared.is_empty() {
            self.detect_double_claims(ctx.now, since_start);
        }

        let mut all_finished = true;
        for child in &mut self.children {
            if child.is_finished() {
                continue;
            }
            all_finished &= child.tick(ctx, since_start, drones);
        }
        all_finished
    }

    /// Wrap in a `Combined` step.
    pub fn into_step(self, label: impl Into<String>) -> Step {
        Step::combined(label, self)
    }

    pub fn children(&self) -> &[SubTimeline] {
        &self.children
    }

    pub fn is_finished(&self) -> bool {
        self.children.iter().all(SubTimeline::is_finished)
    }

    /// Same-tick double claims seen so far (only counted with
    /// `allow_overlap`).
    pub fn double_claims(&self) -> u64 {
        self.double_claims
    }

    /// Number of drones listed by more than one child.
    pub fn shared_drones(&self) -> usize {
        self.shared.len()
    }

    fn detect_double_claims(&mut self, now: Tick, since_start: u64) {
        for shared in &self.shared {
            let mut active = shared
                .claimants
                .iter()
                .map(|&i| &self.children[i])
                .filter(|child| child.is_active_at(since_start));
            let Some(first) = active.next() else { continue };
            for second in active {
                tracing::warn!(
                    tick = %now,
                    drone = %shared.drone,
                    first = first.name(),
                    second = second.name(),
                    "drone claimed by two active sub-timelines",
                );
                self.double_claims += 1;
            }
        }
    }
}

impl GroupBehavior for Orchestrator {
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut DroneGroup<'_>,
    ) -> BehaviorResult<StepResult> {
        Ok(StepResult::finished_if(self.tick(ctx, drones)))
    }

    fn branches(&self) -> Vec<BranchStatus> {
        self.children.iter().map(SubTimeline::status).collect()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct OrchestratorBuilder {
    children:      Vec<SubTimeline>,
    allow_overlap: bool,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child.  Children run in the order they are added.
    pub fn child(mut self, child: SubTimeline) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SubTimeline>) -> Self {
        self.children.extend(children);
        self
    }

    /// Permit children to share drones; detect same-tick conflicts at run
    /// time instead.
    pub fn allow_overlap(mut self) -> Self {
        self.allow_overlap = true;
        self
    }

    /// # Errors
    ///
    /// [`ChoreoError::OverlappingSubgroups`] if two children list the same
    /// drone and overlap was not allowed.
    pub fn build(self) -> ChoreoResult<Orchestrator> {
        let mut claimants: DroneMap<Vec<usize>> = DroneMap::default();
        for (i, child) in self.children.iter().enumerate() {
            for &drone in child.drones() {
                let owners = claimants.entry(drone).or_default();
                if owners.last() == Some(&i) {
                    continue;
                }
                if let (Some(&first), false) = (owners.first(), self.allow_overlap) {
                    return Err(ChoreoError::OverlappingSubgroups {
                        drone,
                        first:  self.children[first].name().to_owned(),
                        second: child.name().to_owned(),
                    });
                }
                owners.push(i);
            }
        }

        let mut shared: Vec<SharedDrone> = claimants
            .into_iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(drone, claimants)| SharedDrone { drone, claimants })
            .collect();
        shared.sort_unstable_by_key(|s| s.drone);

        Ok(Orchestrator {
            children:      self.children,
            shared,
            double_claims: 0,
        })
    }
}
