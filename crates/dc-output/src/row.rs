//! Plain data row types written by output backends.

use dc_core::{ControlAction, DroneId, Tick};
use dc_choreo::TickOutcome;

/// One drone's emitted controls at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRow {
    pub tick:      u64,
    pub drone_id:  u32,
    pub throttle:  f32,
    pub steer:     f32,
    pub pitch:     f32,
    pub yaw:       f32,
    pub roll:      f32,
    pub jump:      bool,
    pub boost:     bool,
    pub handbrake: bool,
}

impl ControlRow {
    pub fn new(tick: Tick, drone: DroneId, controls: &ControlAction) -> Self {
        Self {
            tick:      tick.0,
            drone_id:  drone.0,
            throttle:  controls.throttle,
            steer:     controls.steer,
            pitch:     controls.pitch,
            yaw:       controls.yaw,
            roll:      controls.roll,
            jump:      controls.jump,
            boost:     controls.boost,
            handbrake: controls.handbrake,
        }
    }
}

/// What the driver reported for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:     u64,
    /// `waiting`, `running`, `finished`, or `timed_out`.
    pub outcome:  &'static str,
    /// Root timeline cursor; `None` unless running.
    pub cursor:   Option<u64>,
    pub failures: u64,
}

impl TickSummaryRow {
    pub fn new(tick: Tick, outcome: &TickOutcome, failures: usize) -> Self {
        Self {
            tick:     tick.0,
            outcome:  outcome.label(),
            cursor:   outcome.cursor().map(|c| c as u64),
            failures: failures as u64,
        }
    }
}
