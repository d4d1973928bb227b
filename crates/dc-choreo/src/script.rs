//! `Script`: the user-supplied generator of the top-level sequence.

use dc_core::{DroneId, TickClock};
use dc_drone::WorldSnapshot;
use dc_step::Step;

use crate::ChoreoResult;

/// A show: a named generator of the root step sequence.
///
/// `generate_sequence` is called when the readiness gate opens and again,
/// from scratch, on every rebuild.  `roster` is the present drone ids in
/// ascending order; scripts typically slice it into sub-groups.
pub trait Script {
    fn name(&self) -> &str;

    /// Called every tick after the registry refresh and before any step
    /// runs, including while gating.
    fn pre_step(&mut self, _snapshot: &WorldSnapshot) {}

    /// # Errors
    ///
    /// Returns a configuration error (e.g. from a sub-timeline or
    /// orchestrator builder) if the sequence cannot be built for `roster`.
    fn generate_sequence(
        &mut self,
        roster: &[DroneId],
        clock:  &TickClock,
    ) -> ChoreoResult<Vec<Step>>;
}

/// A [`Script`] backed by a closure.
pub struct FnScript<F> {
    name: String,
    f:    F,
}

impl<F> FnScript<F>
where
    F: FnMut(&[DroneId], &TickClock) -> ChoreoResult<Vec<Step>>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Script for FnScript<F>
where
    F: FnMut(&[DroneId], &TickClock) -> ChoreoResult<Vec<Step>>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_sequence(
        &mut self,
        roster: &[DroneId],
        clock:  &TickClock,
    ) -> ChoreoResult<Vec<Step>> {
        (self.f)(roster, clock)
    }
}
