//! Per-invocation context passed to every behavior.

use dc_core::{Tick, TickClock};
use dc_drone::WorldSnapshot;

use crate::{DrawCommand, RenderScope, Renderer, StepFailure, WorldMutator, WorldUpdate};

/// Everything a behavior may know or touch besides its drones.
///
/// Three clocks are carried:
///
/// | Field     | Meaning                                                   |
/// |-----------|-----------------------------------------------------------|
/// | `now`     | absolute host tick                                        |
/// | `local`   | tick on the owning timeline's clock (a sub-timeline's     |
/// |           | clock starts at zero when its start offset elapses)       |
/// | `elapsed` | ticks since the current step became current               |
///
/// `elapsed` is computed by the [`Timeline`][crate::Timeline], never by the
/// step.  All borrows end with the invocation; behaviors cannot retain them.
pub struct StepContext<'a> {
    pub now:     Tick,
    pub local:   Tick,
    pub elapsed: u64,
    pub clock:   TickClock,
    pub world:   &'a WorldSnapshot,
    mutator:     &'a mut dyn WorldMutator,
    renderer:    &'a mut dyn Renderer,
    failures:    &'a mut Vec<StepFailure>,
}

impl<'a> StepContext<'a> {
    /// Build a root context for one tick.  `local` starts equal to `now`.
    pub fn new(
        now:      Tick,
        clock:    TickClock,
        world:    &'a WorldSnapshot,
        mutator:  &'a mut dyn WorldMutator,
        renderer: &'a mut dyn Renderer,
        failures: &'a mut Vec<StepFailure>,
    ) -> Self {
        Self { now, local: now, elapsed: 0, clock, world, mutator, renderer, failures }
    }

    /// `elapsed` in seconds.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.clock.secs(self.elapsed)
    }

    /// `local` in seconds.
    #[inline]
    pub fn local_secs(&self) -> f32 {
        self.clock.secs(self.local.0)
    }

    // ── Nested contexts ───────────────────────────────────────────────────

    /// Reborrow with identical clocks.
    pub fn reborrow(&mut self) -> StepContext<'_> {
        StepContext {
            now:      self.now,
            local:    self.local,
            elapsed:  self.elapsed,
            clock:    self.clock,
            world:    self.world,
            mutator:  &mut *self.mutator,
            renderer: &mut *self.renderer,
            failures: &mut *self.failures,
        }
    }

    /// Reborrow for a step that has been current for `elapsed` ticks.
    pub fn with_elapsed(&mut self, elapsed: u64) -> StepContext<'_> {
        let mut ctx = self.reborrow();
        ctx.elapsed = elapsed;
        ctx
    }

    /// Reborrow onto a child timeline whose clock reads `local`.
    pub fn rebased(&mut self, local: Tick) -> StepContext<'_> {
        let mut ctx = self.reborrow();
        ctx.local = local;
        ctx.elapsed = 0;
        ctx
    }

    // ── Collaborators ─────────────────────────────────────────────────────

    /// Forward a forced pose write to the host.
    pub fn set_world(&mut self, update: WorldUpdate) {
        self.mutator.apply(update);
    }

    pub fn draw(&mut self, command: DrawCommand) {
        self.renderer.draw(command);
    }

    /// Open a named render group, closed when the returned scope drops.
    pub fn render_group(&mut self, group: impl Into<String>) -> RenderScope<'_> {
        RenderScope::begin(&mut *self.renderer, group)
    }

    // ── Failures ──────────────────────────────────────────────────────────

    pub fn report(&mut self, failure: StepFailure) {
        self.failures.push(failure);
    }

    /// Failures recorded so far this tick.
    pub fn failures(&self) -> &[StepFailure] {
        self.failures.as_slice()
    }
}
