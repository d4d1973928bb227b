//! The `Choreography` driver and its tick loop.

use std::fmt;

use dc_core::{ControlAction, DroneId, Tick, TickClock};
use dc_drone::{DroneRegistry, WorldSnapshot};
use dc_step::{RenderScope, Renderer, Step, StepContext, StepFailure, Timeline, TimelineStatus, WorldMutator};

use crate::{
    ChoreoConfig, ChoreoError, ChoreoObserver, ChoreoResult, ControlSink, FailurePolicy, GateStatus,
    ReadinessGate, Script, SnapshotSource, TimeoutPolicy,
};

// ── Phase / outcome ───────────────────────────────────────────────────────────

/// Driver lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Polling the readiness gate; the staging step (if any) runs.
    Gating,
    /// Advancing the root timeline.
    Running,
    /// The root timeline finished.
    Finished,
    /// The gate timed out under [`TimeoutPolicy::Halt`].
    Halted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Gating   => "gating",
            Phase::Running  => "running",
            Phase::Finished => "finished",
            Phase::Halted   => "halted",
        })
    }
}

/// What one tick amounted to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Gate still closed after `waited` ticks.
    Waiting { waited: u64 },
    /// Root timeline advanced; `cursor` is its position after the tick.
    Running { cursor: usize },
    Finished,
    /// Gate gave up after `waited` ticks and the driver halted.
    TimedOut { waited: u64 },
}

impl TickOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TickOutcome::Waiting { .. }  => "waiting",
            TickOutcome::Running { .. }  => "running",
            TickOutcome::Finished        => "finished",
            TickOutcome::TimedOut { .. } => "timed_out",
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            TickOutcome::Running { cursor } => Some(*cursor),
            _ => None,
        }
    }

    /// `true` for outcomes after which further ticks change nothing.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Finished | TickOutcome::TimedOut { .. })
    }
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickOutcome::Waiting { waited }  => write!(f, "waiting ({waited} ticks)"),
            TickOutcome::Running { cursor }  => write!(f, "running (step {cursor})"),
            TickOutcome::Finished            => f.write_str("finished"),
            TickOutcome::TimedOut { waited } => write!(f, "timed out after {waited} ticks"),
        }
    }
}

/// Diagnostics snapshot of the whole driver.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoreoStatus {
    pub phase:    Phase,
    pub waited:   u64,
    pub roster:   usize,
    pub timeline: TimelineStatus,
}

/// Result of [`Choreography::run`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks:   u64,
    pub outcome: Option<TickOutcome>,
}

// ── Choreography ──────────────────────────────────────────────────────────────

/// The root driver.
///
/// `Choreography<S>` owns the drone registry and the root timeline.  Each
/// tick:
///
/// 1. **Refresh**: upsert drones from the snapshot; note roster changes.
/// 2. **Reset**: every drone's controls go back to neutral.
/// 3. **Pre-step**: `Script::pre_step`.
/// 4. **Gate or advance**:
///    - gating: poll the readiness gate; run the staging step while
///      waiting; generate the sequence and advance once the gate opens.
///    - running: rebuild if the roster changed (or a rebuild was
///      requested), then advance the root timeline by one step.
/// 5. **Report**: failures, then `on_tick_end`, to the observer.
///
/// Controls are read back with [`emit`](Self::emit) or
/// [`controls`](Self::controls).  Create via
/// [`ChoreographyBuilder`][crate::ChoreographyBuilder].
pub struct Choreography<S: Script> {
    pub(crate) config:   ChoreoConfig,
    pub(crate) clock:    TickClock,
    pub(crate) script:   S,
    pub(crate) registry: DroneRegistry,
    pub(crate) gate:     ReadinessGate,
    pub(crate) staging:  Option<Step>,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) timeline: Timeline,
    pub(crate) phase:    Phase,
    /// First tick spent gating; anchors the staging step's elapsed time.
    pub(crate) gate_started:  Option<Tick>,
    pub(crate) last_tick:     Option<Tick>,
    pub(crate) rebuild_pending: bool,
    /// Failures recorded during the current tick.
    pub(crate) failures: Vec<StepFailure>,
}

impl<S: Script> Choreography<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Process one snapshot.
    ///
    /// # Errors
    ///
    /// - Configuration errors from `Script::generate_sequence`.
    /// - [`ChoreoError::StepFailed`] under [`FailurePolicy::FailFast`].
    pub fn tick<O: ChoreoObserver + ?Sized>(
        &mut self,
        snapshot: &WorldSnapshot,
        world:    &mut dyn WorldMutator,
        observer: &mut O,
    ) -> ChoreoResult<TickOutcome> {
        let now = snapshot.tick;
        self.last_tick = Some(now);
        self.failures.clear();
        observer.on_tick_start(now);

        // ── Refresh, reset, pre-step ──────────────────────────────────────
        let change = self.registry.refresh(snapshot);
        if !change.is_empty() {
            tracing::debug!(tick = %now, added = change.added.len(), removed = change.removed.len(), "roster changed");
            if self.config.rebuild_on_roster_change && self.phase == Phase::Running {
                self.rebuild_pending = true;
            }
        }
        self.registry.reset_controls();
        self.script.pre_step(snapshot);

        // ── Gate or advance ───────────────────────────────────────────────
        let outcome = match self.phase {
            Phase::Gating => self.gate_tick(snapshot, world, observer)?,
            Phase::Running => {
                if self.rebuild_pending {
                    self.rebuild_now(now, observer)?;
                }
                self.advance(snapshot, world, observer)
            }
            Phase::Finished => TickOutcome::Finished,
            Phase::Halted => TickOutcome::TimedOut { waited: self.gate.waited() },
        };

        // ── Report ────────────────────────────────────────────────────────
        for failure in &self.failures {
            observer.on_step_failure(failure);
        }
        observer.on_tick_end(now, &outcome, self.failures.len());

        if self.config.failure_policy == FailurePolicy::FailFast {
            if let Some(failure) = self.failures.first() {
                return Err(ChoreoError::StepFailed(failure.clone()));
            }
        }
        Ok(outcome)
    }

    /// Drive `host` until its snapshots run out, the show reaches a terminal
    /// outcome, or `config.max_ticks` ticks have been processed.  Controls
    /// are sent to `host` after every tick.
    pub fn run<H, O>(&mut self, host: &mut H, observer: &mut O) -> ChoreoResult<RunSummary>
    where
        H: SnapshotSource + ControlSink + WorldMutator,
        O: ChoreoObserver + ?Sized,
    {
        let mut summary = RunSummary::default();
        while self.config.max_ticks.is_none_or(|max| summary.ticks < max) {
            let Some(snapshot) = host.next_snapshot() else { break };
            let outcome = self.tick(&snapshot, host, observer)?;
            self.emit(host);
            summary.ticks += 1;
            summary.outcome = Some(outcome);
            if outcome.is_terminal() {
                break;
            }
        }
        tracing::info!(ticks = summary.ticks, outcome = ?summary.outcome, "choreography run ended");
        Ok(summary)
    }

    /// Send every present drone's clamped controls for the last tick.
    pub fn emit<K: ControlSink + ?Sized>(&self, sink: &mut K) {
        let Some(tick) = self.last_tick else { return };
        for (drone, controls) in self.registry.controls() {
            sink.send(tick, drone, &controls.clamped());
        }
    }

    /// Discard all progress and regenerate the sequence on the next tick.
    /// Ignored while gating or halted.
    pub fn rebuild(&mut self) {
        if matches!(self.phase, Phase::Running | Phase::Finished) {
            self.rebuild_pending = true;
            self.phase = Phase::Running;
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &ChoreoConfig {
        &self.config
    }

    pub fn clock(&self) -> TickClock {
        self.clock
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    pub fn registry(&self) -> &DroneRegistry {
        &self.registry
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current controls of every present drone, ascending by id.
    pub fn controls(&self) -> impl Iterator<Item = (DroneId, &ControlAction)> + '_ {
        self.registry.controls()
    }

    /// Failures recorded during the last tick.
    pub fn last_failures(&self) -> &[StepFailure] {
        &self.failures
    }

    pub fn status(&self) -> ChoreoStatus {
        ChoreoStatus {
            phase:    self.phase,
            waited:   self.gate.waited(),
            roster:   self.registry.len(),
            timeline: self.timeline.status(),
        }
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    fn gate_tick<O: ChoreoObserver + ?Sized>(
        &mut self,
        snapshot: &WorldSnapshot,
        world:    &mut dyn WorldMutator,
        observer: &mut O,
    ) -> ChoreoResult<TickOutcome> {
        let now = snapshot.tick;
        match self.gate.poll(&self.registry, snapshot) {
            GateStatus::Ready => {
                tracing::debug!(tick = %now, waited = self.gate.waited(), "readiness gate open");
                self.start(now)?;
                Ok(self.advance(snapshot, world, observer))
            }
            GateStatus::Waiting { waited } => {
                self.stage(snapshot, world);
                Ok(TickOutcome::Waiting { waited })
            }
            GateStatus::TimedOut { waited } => {
                tracing::warn!(tick = %now, waited, policy = ?self.config.on_timeout, "readiness gate timed out");
                observer.on_gate_timeout(now, waited);
                match self.config.on_timeout {
                    TimeoutPolicy::Halt => {
                        self.phase = Phase::Halted;
                        Ok(TickOutcome::TimedOut { waited })
                    }
                    TimeoutPolicy::Proceed => {
                        self.start(now)?;
                        Ok(self.advance(snapshot, world, observer))
                    }
                }
            }
        }
    }

    /// Run the staging step over the whole roster.  Its finished flag is
    /// ignored and it restarts every waiting tick, so drones that finished
    /// staging earlier are driven again.
    fn stage(&mut self, snapshot: &WorldSnapshot, world: &mut dyn WorldMutator) {
        let now = snapshot.tick;
        let gate_started = *self.gate_started.get_or_insert(now);
        let Some(staging) = self.staging.as_mut() else { return };

        let mut scope = RenderScope::begin(self.renderer.as_mut(), "staging");
        let mut ctx = StepContext::new(now, self.clock, snapshot, world, scope.renderer(), &mut self.failures);
        ctx.elapsed = now.since(gate_started);
        staging.restart();
        staging.invoke(&mut ctx, &mut self.registry.all());
    }

    /// Generate the sequence for the current roster and start running it.
    fn start(&mut self, now: Tick) -> ChoreoResult<()> {
        let roster = self.registry.roster();
        let steps = self.script.generate_sequence(&roster, &self.clock)?;
        tracing::info!(tick = %now, script = self.script.name(), drones = roster.len(), steps = steps.len(), "sequence built");
        self.timeline.reset(steps);
        self.phase = Phase::Running;
        self.rebuild_pending = false;
        Ok(())
    }

    fn rebuild_now<O: ChoreoObserver + ?Sized>(&mut self, now: Tick, observer: &mut O) -> ChoreoResult<()> {
        let roster = self.registry.roster();
        tracing::info!(tick = %now, drones = roster.len(), "rebuilding sequence");
        self.start(now)?;
        observer.on_rebuild(now, &roster);
        Ok(())
    }

    fn advance<O: ChoreoObserver + ?Sized>(
        &mut self,
        snapshot: &WorldSnapshot,
        world:    &mut dyn WorldMutator,
        observer: &mut O,
    ) -> TickOutcome {
        let now = snapshot.tick;
        let finished = {
            let mut scope = RenderScope::begin(self.renderer.as_mut(), self.script.name());
            let mut ctx = StepContext::new(now, self.clock, snapshot, world, scope.renderer(), &mut self.failures);
            self.timeline.advance(&mut ctx, &mut self.registry.all())
        };

        if finished {
            tracing::info!(tick = %now, script = self.script.name(), "choreography finished");
            self.phase = Phase::Finished;
            observer.on_finished(now);
            TickOutcome::Finished
        } else {
            TickOutcome::Running { cursor: self.timeline.cursor() }
        }
    }
}

impl<S: Script> fmt::Debug for Choreography<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Choreography")
            .field("script", &self.script.name())
            .field("phase", &self.phase)
            .field("roster", &self.registry.len())
            .field("timeline", &self.timeline)
            .finish_non_exhaustive()
    }
}
