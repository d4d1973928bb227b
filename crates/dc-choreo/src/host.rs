//! Host-facing seams: where snapshots come from and where controls go.

use std::collections::VecDeque;

use dc_core::{ControlAction, DroneId, Tick};
use dc_drone::WorldSnapshot;

/// Supplies one world snapshot per tick.  `None` ends the run.
pub trait SnapshotSource {
    fn next_snapshot(&mut self) -> Option<WorldSnapshot>;
}

/// Accepts one control action per present drone per tick.
pub trait ControlSink {
    fn send(&mut self, tick: Tick, drone: DroneId, controls: &ControlAction);
}

/// Replays a fixed list of snapshots.
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    snapshots: VecDeque<WorldSnapshot>,
}

impl ReplaySource {
    pub fn new(snapshots: impl IntoIterator<Item = WorldSnapshot>) -> Self {
        Self { snapshots: snapshots.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.snapshots.len()
    }
}

impl SnapshotSource for ReplaySource {
    fn next_snapshot(&mut self) -> Option<WorldSnapshot> {
        self.snapshots.pop_front()
    }
}

/// Collects every control action sent.
impl ControlSink for Vec<(Tick, DroneId, ControlAction)> {
    fn send(&mut self, tick: Tick, drone: DroneId, controls: &ControlAction) {
        self.push((tick, drone, *controls));
    }
}
