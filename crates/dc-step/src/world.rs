//! World-state mutator: the side channel for setting poses directly.
//!
//! Steps that teleport drones (formation posing, tidy-up, hiding the ball)
//! write a [`WorldUpdate`] instead of a control action.  The core treats the
//! write as fire-and-forget; writes are idempotent so repeating them every
//! tick is harmless.

use dc_core::{DroneId, Kinematics};

/// Forced pose writes for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldUpdate {
    pub drones: Vec<(DroneId, Kinematics)>,
    pub ball:   Option<Kinematics>,
}

impl WorldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drone(mut self, id: DroneId, kinematics: Kinematics) -> Self {
        self.drones.push((id, kinematics));
        self
    }

    pub fn ball(mut self, kinematics: Kinematics) -> Self {
        self.ball = Some(kinematics);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty() && self.ball.is_none()
    }
}

/// Host-side receiver of [`WorldUpdate`]s.
pub trait WorldMutator {
    fn apply(&mut self, update: WorldUpdate);
}

/// Discards every update.
pub struct NoopWorld;

impl WorldMutator for NoopWorld {
    fn apply(&mut self, _update: WorldUpdate) {}
}

/// Keeps every update for later inspection or forwarding.
#[derive(Default)]
pub struct RecordingWorld {
    pub updates: Vec<WorldUpdate>,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all updates recorded so far.
    pub fn drain(&mut self) -> Vec<WorldUpdate> {
        std::mem::take(&mut self.updates)
    }
}

impl WorldMutator for RecordingWorld {
    fn apply(&mut self, update: WorldUpdate) {
        if !update.is_empty() {
            self.updates.push(update);
        }
    }
}
