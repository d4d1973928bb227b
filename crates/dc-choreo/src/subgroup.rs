//! `SubTimeline`: a timeline bound to a fixed drone subset and a start
//! offset.
//!
//! ```text
//! tick(ctx, since_start, group):
//!   since_start < start_offset → dormant, not finished, no step invoked
//!   otherwise                  → advance the timeline on the subset with
//!                                local clock = since_start − start_offset
//! ```

use dc_core::{DroneId, DroneSet, Tick, TickClock};
use dc_drone::DroneGroup;
use dc_step::{BranchPhase, BranchStatus, Step, StepContext, Timeline, Transition};

use crate::{ChoreoError, ChoreoResult};

#[derive(Debug)]
pub struct SubTimeline {
    name:         String,
    drones:       Vec<DroneId>,
    start_offset: u64,
    timeline:     Timeline,
    started:      bool,
    finished:     bool,
}

impl SubTimeline {
    pub fn builder(name: impl Into<String>) -> SubTimelineBuilder {
        SubTimelineBuilder::new(name)
    }

    /// Run one tick.  `since_start` is measured from the orchestrator's
    /// start; `group` is the orchestrator's group and is narrowed here to
    /// this sub-timeline's drones.
    pub fn tick(
        &mut self,
        ctx:         &mut StepContext<'_>,
        since_start: u64,
        group:       &mut DroneGroup<'_>,
    ) -> bool {
        if self.finished {
            return true;
        }
        if since_start < self.start_offset {
            return false;
        }
        if !self.started {
            self.started = true;
            tracing::debug!(tick = %ctx.now, branch = %self.name, "sub-timeline started");
        }

        let local = Tick(since_start - self.start_offset);
        let mut subset = group.subset(&self.drones);
        let done = self.timeline.advance(&mut ctx.rebased(local), &mut subset);
        if done {
            self.finished = true;
            tracing::debug!(tick = %ctx.now, branch = %self.name, "sub-timeline finished");
        }
        done
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn drones(&self) -> &[DroneId] {
        &self.drones
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `true` if a tick at `since_start` would invoke a step.
    #[inline]
    pub fn is_active_at(&self, since_start: u64) -> bool {
        !self.finished && since_start >= self.start_offset
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn phase(&self) -> BranchPhase {
        match (self.started, self.finished) {
            (_, true)      => BranchPhase::Finished,
            (true, false)  => BranchPhase::Active,
            (false, false) => BranchPhase::Dormant,
        }
    }

    pub fn status(&self) -> BranchStatus {
        BranchStatus {
            name:         self.name.clone(),
            phase:        self.phase(),
            start_offset: self.start_offset,
            drones:       self.drones.len(),
            timeline:     self.timeline.status(),
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`SubTimeline`].
///
/// ```rust,ignore
/// let tunnel = SubTimeline::builder("tunnel 3")
///     .drone(DroneId(3))
///     .start_after_secs(&clock, 3.0 * 0.032)
///     .step(Step::per_drone("boost", Blind { controls, ticks: 240 }))
///     .build()?;
/// ```
pub struct SubTimelineBuilder {
    name:         String,
    drones:       Vec<DroneId>,
    start_offset: u64,
    steps:        Vec<Step>,
    transition:   Transition,
}

impl SubTimelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:         name.into(),
            drones:       Vec::new(),
            start_offset: 0,
            steps:        Vec::new(),
            transition:   Transition::Defer,
        }
    }

    pub fn drone(mut self, id: DroneId) -> Self {
        self.drones.push(id);
        self
    }

    pub fn drones(mut self, ids: impl IntoIterator<Item = DroneId>) -> Self {
        self.drones.extend(ids);
        self
    }

    /// Start `ticks` ticks after the orchestrator starts.
    pub fn start_after(mut self, ticks: u64) -> Self {
        self.start_offset = ticks;
        self
    }

    /// Start `secs` seconds after the orchestrator starts, rounded up to a
    /// whole tick.
    pub fn start_after_secs(self, clock: &TickClock, secs: f32) -> Self {
        let ticks = clock.ticks_for_secs(secs);
        self.start_after(ticks)
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Validate the drone list and build.
    ///
    /// # Errors
    ///
    /// - [`ChoreoError::EmptySubgroup`] if no drones were given.
    /// - [`ChoreoError::DuplicateDrone`] if a drone is listed twice.
    pub fn build(self) -> ChoreoResult<SubTimeline> {
        if self.drones.is_empty() {
            return Err(ChoreoError::EmptySubgroup(self.name));
        }
        let mut seen = DroneSet::default();
        if let Some(&drone) = self.drones.iter().find(|&&id| !seen.insert(id)) {
            return Err(ChoreoError::DuplicateDrone { group: self.name, drone });
        }

        Ok(SubTimeline {
            name:         self.name,
            drones:       self.drones,
            start_offset: self.start_offset,
            timeline:     Timeline::new(self.steps).with_transition(self.transition),
            started:      false,
            finished:     false,
        })
    }
}
