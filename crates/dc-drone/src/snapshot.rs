//! The read-only world snapshot delivered by the host once per tick.

use dc_core::{DroneId, Kinematics, Team, Tick};

/// One drone's entry in a [`WorldSnapshot`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroneSnapshot {
    pub id:         DroneId,
    pub team:       Team,
    pub kinematics: Kinematics,
    pub boost:      f32,
}

impl DroneSnapshot {
    pub fn new(id: DroneId, team: Team, kinematics: Kinematics) -> Self {
        Self { id, team, kinematics, boost: 0.0 }
    }
}

/// Everything the scheduler learns about the world in one tick.
///
/// The scheduler only reads `tick` and `drones`; the remaining fields are
/// carried through to behaviors via the step context.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    /// Host tick this snapshot describes.
    pub tick:            Tick,
    /// Host game clock, seconds.
    pub seconds_elapsed: f32,
    /// `false` during kickoff countdowns and replays.
    pub round_active:    bool,
    pub ball:            Option<Kinematics>,
    pub drones:          Vec<DroneSnapshot>,
}

impl WorldSnapshot {
    pub fn new(tick: Tick) -> Self {
        Self { tick, round_active: true, ..Self::default() }
    }

    /// Builder-style helper: append a drone entry.
    pub fn with_drone(mut self, drone: DroneSnapshot) -> Self {
        self.drones.push(drone);
        self
    }

    /// Look up a drone entry by id (linear scan).
    pub fn drone(&self, id: DroneId) -> Option<&DroneSnapshot> {
        self.drones.iter().find(|d| d.id == id)
    }
}
