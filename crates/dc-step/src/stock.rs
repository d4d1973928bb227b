//! Reusable behaviors.

use dc_core::ControlAction;
use dc_drone::{Drone, DroneGroup};

use crate::{BehaviorResult, DroneBehavior, GroupBehavior, StepContext, StepResult};

/// Never finishes and leaves outputs neutral.
///
/// Use as the terminal "hold position" step of a timeline.  There is no
/// timeout: a timeline parked on `Hold` stays there until it is replaced.
pub struct Hold;

impl GroupBehavior for Hold {
    fn perform(
        &mut self,
        _ctx:    &mut StepContext<'_>,
        _drones: &mut DroneGroup<'_>,
    ) -> BehaviorResult<StepResult> {
        Ok(StepResult::RUNNING)
    }
}

/// Does nothing for `ticks` ticks, then finishes.
pub struct Wait {
    pub ticks: u64,
}

impl GroupBehavior for Wait {
    fn perform(
        &mut self,
        ctx:     &mut StepContext<'_>,
        _drones: &mut DroneGroup<'_>,
    ) -> BehaviorResult<StepResult> {
        Ok(StepResult::finished_if(ctx.elapsed >= self.ticks))
    }
}

/// Applies fixed controls to each drone for `ticks` ticks.
///
/// The tick on which `elapsed` reaches `ticks` reports finished without
/// writing, so the controls are held for exactly `ticks` invocations when
/// the step starts at `elapsed == 0`.
pub struct Blind {
    pub controls: ControlAction,
    pub ticks:    u64,
}

impl DroneBehavior for Blind {
    fn perform(
        &mut self,
        ctx:   &mut StepContext<'_>,
        drone: &mut Drone,
    ) -> BehaviorResult<StepResult> {
        if ctx.elapsed >= self.ticks {
            return Ok(StepResult::DONE);
        }
        drone.controls = self.controls;
        Ok(StepResult::RUNNING)
    }
}
