//! The scripted "aqua" show: line up, hide the ball, then run a pose group,
//! a drive group, a tunnel of staggered launches and a tidy-up group side by
//! side.

use dc_choreo::{ChoreoResult, Orchestrator, Script, SubTimeline};
use dc_core::{ControlAction, DroneId, Kinematics, Rotator, TickClock, Vec3};
use dc_drone::{Drone, DroneGroup, WorldSnapshot};
use dc_step::{
    BehaviorResult, Blind, Color, DrawCommand, DroneBehavior, GroupBehavior, ListBehavior, Step,
    StepContext, StepResult, WorldUpdate,
};

pub const DRONE_COUNT: usize = 32;

const POSE_DRONES:   std::ops::Range<usize> = 0..8;
const TUNNEL_DRONES: std::ops::Range<usize> = 8..24;
const TIDY_DRONES:   std::ops::Range<usize> = 24..32;

const POSE_SECS:     f32 = 2.0;
const TUNNEL_STAGGER: f32 = 0.032;
const LAUNCH_SECS:   f32 = 1.5;
const COAST_SECS:    f32 = 1.0;
const ARRIVE_RADIUS: f32 = 100.0;
const CAR_Z:         f32 = 17.0;

// ── Behaviors ─────────────────────────────────────────────────────────────────

/// Parks every drone in a line near the blue corner.  Used while waiting
/// for the whole roster to spawn.
pub struct LineUp;

impl ListBehavior for LineUp {
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut [&mut Drone],
    ) -> BehaviorResult<StepResult> {
        let update = drones.iter().fold(WorldUpdate::new(), |update, drone| {
            let at = Vec3::new(-2_000.0, -4_000.0 + drone.id.0 as f32 * 100.0, 40.0);
            update.drone(drone.id, Kinematics::at_rest(at, Rotator::default()))
        });
        ctx.set_world(update);
        Ok(StepResult::DONE)
    }
}

/// Moves the ball out of the way.
pub struct HideBall;

impl GroupBehavior for HideBall {
    fn perform(
        &mut self,
        ctx:     &mut StepContext<'_>,
        _drones: &mut DroneGroup<'_>,
    ) -> BehaviorResult<StepResult> {
        let hidden = Kinematics::at_rest(Vec3::new(0.0, 0.0, -3_000.0), Rotator::default());
        ctx.set_world(WorldUpdate::new().ball(hidden));
        Ok(StepResult::DONE)
    }
}

/// Teleports the group into two staggered rows facing +x.
struct CruisePose;

impl ListBehavior for CruisePose {
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut [&mut Drone],
    ) -> BehaviorResult<StepResult> {
        let mut update = WorldUpdate::new();
        for (i, drone) in drones.iter().enumerate() {
            let (row, col) = ((i % 2) as f32, (i / 2) as f32);
            let at = Vec3::new(-3_000.0 - row * 150.0, -600.0 + col * 300.0 + row * 150.0, CAR_Z);
            update = update.drone(drone.id, Kinematics::at_rest(at, Rotator::default()));
        }
        ctx.set_world(update);
        Ok(StepResult::DONE)
    }
}

/// Drives towards `target`, slowing on approach.  Finished per drone once
/// within `ARRIVE_RADIUS`.
struct DriveTo {
    target: Vec3,
}

impl DroneBehavior for DriveTo {
    fn perform(
        &mut self,
        ctx:   &mut StepContext<'_>,
        drone: &mut Drone,
    ) -> BehaviorResult<StepResult> {
        let distance = drone.position().flat().dist(self.target.flat());
        if distance < ARRIVE_RADIUS {
            return Ok(StepResult::DONE);
        }

        let local = drone.local(self.target);
        let angle = local.y.atan2(local.x);
        let speed = drone.velocity().dot(drone.orientation().forward);
        let wanted = (distance * 1.5).min(1_400.0) * angle.cos().max(0.2);

        drone.controls.steer = (angle * 3.0).clamp(-1.0, 1.0);
        drone.controls.throttle = ((wanted - speed) / 100.0).clamp(-1.0, 1.0);
        ctx.draw(DrawCommand::Line3d { from: drone.position(), to: self.target, color: Color::GREEN });
        Ok(StepResult::RUNNING)
    }
}

/// Teleports the group into a line along the blue side wall.
struct TidyUp;

impl ListBehavior for TidyUp {
    fn perform(
        &mut self,
        ctx:    &mut StepContext<'_>,
        drones: &mut [&mut Drone],
    ) -> BehaviorResult<StepResult> {
        let update = drones.iter().fold(WorldUpdate::new(), |update, drone| {
            let at = Vec3::new(-4_000.0, -4_000.0 + drone.id.0 as f32 * 100.0, 40.0);
            update.drone(drone.id, Kinematics::at_rest(at, Rotator::default()))
        });
        ctx.set_world(update);
        Ok(StepResult::DONE)
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

pub struct AquaScript {
    drone_count:  usize,
    last_seconds: f32,
}

impl AquaScript {
    pub fn new(drone_count: usize) -> Self {
        Self { drone_count, last_seconds: 0.0 }
    }

    /// Host clock at the most recent tick.
    pub fn last_seconds(&self) -> f32 {
        self.last_seconds
    }

    fn orchestrator(&self, roster: &[DroneId], clock: &TickClock) -> ChoreoResult<Orchestrator> {
        let pose = SubTimeline::builder("cruise pose")
            .drones(roster[POSE_DRONES].iter().copied())
            .step(Step::drone_list("pose", CruisePose))
            .build()?;

        // Same drones as the pose group, handed over once posing is done.
        let drive = SubTimeline::builder("drive")
            .drones(roster[POSE_DRONES].iter().copied())
            .start_after_secs(clock, POSE_SECS)
            .step(Step::per_drone("drive", DriveTo { target: Vec3::new(0.0, 0.0, CAR_Z) }))
            .build()?;

        let full_send = ControlAction { throttle: 1.0, boost: true, ..ControlAction::NEUTRAL };
        let coast = ControlAction { throttle: 0.1, ..ControlAction::NEUTRAL };
        let tunnel = roster[TUNNEL_DRONES].iter().enumerate().map(|(i, &id)| {
            SubTimeline::builder(format!("tunnel {i}"))
                .drone(id)
                .start_after_secs(clock, POSE_SECS + i as f32 * TUNNEL_STAGGER)
                .step(Step::per_drone("launch", Blind { controls: full_send, ticks: clock.ticks_for_secs(LAUNCH_SECS) }))
                .step(Step::per_drone("coast", Blind { controls: coast, ticks: clock.ticks_for_secs(COAST_SECS) }))
                .build()
        });

        let tidy = SubTimeline::builder("tidy up")
            .drones(roster[TIDY_DRONES].iter().copied())
            .step(Step::drone_list("tidy", TidyUp))
            .build()?;

        Orchestrator::builder()
            .child(pose)
            .child(drive)
            .children(tunnel.collect::<ChoreoResult<Vec<_>>>()?)
            .child(tidy)
            .allow_overlap()
            .build()
    }
}

impl Script for AquaScript {
    fn name(&self) -> &str {
        "scripted aqua"
    }

    fn pre_step(&mut self, snapshot: &WorldSnapshot) {
        self.last_seconds = snapshot.seconds_elapsed;
    }

    fn generate_sequence(&mut self, roster: &[DroneId], clock: &TickClock) -> ChoreoResult<Vec<Step>> {
        let mut sequence = vec![Step::combined("hide ball", HideBall)];
        if roster.len() < self.drone_count {
            tracing::warn!(present = roster.len(), needed = self.drone_count, "not enough drones for the show");
            return Ok(sequence);
        }
        sequence.push(self.orchestrator(roster, clock)?.into_step("aqua"));
        Ok(sequence)
    }
}
