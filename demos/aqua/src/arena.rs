//! A synthetic arena host: spawns drones a few per tick, integrates their
//! controls with a flat-ground car model, and honours world-state writes.

use dc_choreo::{ControlSink, SnapshotSource};
use dc_core::{ControlAction, DroneId, Kinematics, Rotator, Team, Tick, TickClock, Vec3};
use dc_drone::{DroneSnapshot, WorldSnapshot};
use dc_step::{WorldMutator, WorldUpdate};

const THROTTLE_ACCEL: f32 = 1_600.0;
const BOOST_ACCEL:    f32 = 991.7;
const MAX_SPEED:      f32 = 2_300.0;
const COAST_DECEL:    f32 = 525.0;
const TURN_RATE:      f32 = 2.5;
const BOOST_PER_SEC:  f32 = 33.3;
const CAR_Z:          f32 = 17.0;

struct Body {
    id:         DroneId,
    team:       Team,
    kinematics: Kinematics,
    boost:      f32,
    controls:   ControlAction,
}

pub struct Arena {
    clock:          TickClock,
    tick:           u64,
    last_tick:      u64,
    total:          usize,
    spawn_per_tick: usize,
    bodies:         Vec<Body>,
    ball:           Kinematics,
    teleports:      u64,
}

impl Arena {
    /// An arena that will spawn `total` drones, `spawn_per_tick` at a time,
    /// and stop producing snapshots after `last_tick`.
    pub fn new(clock: TickClock, total: usize, spawn_per_tick: usize, last_tick: u64) -> Self {
        Self {
            clock,
            tick: 0,
            last_tick,
            total,
            spawn_per_tick: spawn_per_tick.max(1),
            bodies: Vec::with_capacity(total),
            ball: Kinematics::at_rest(Vec3::new(0.0, 0.0, 93.0), Rotator::default()),
            teleports: 0,
        }
    }

    /// World-state writes applied so far.
    pub fn teleports(&self) -> u64 {
        self.teleports
    }

    pub fn ball(&self) -> Kinematics {
        self.ball
    }

    /// Final pose of every spawned drone.
    pub fn poses(&self) -> impl Iterator<Item = (DroneId, Vec3, f32)> + '_ {
        self.bodies.iter().map(|b| (b.id, b.kinematics.position, b.kinematics.velocity.length()))
    }

    fn spawn(&mut self) {
        let next = (self.bodies.len() + self.spawn_per_tick).min(self.total);
        for i in self.bodies.len()..next {
            let team = if i % 2 == 0 { Team::BLUE } else { Team::ORANGE };
            let y = team.sign() * -4_600.0;
            let pose = Kinematics::at_rest(
                Vec3::new(i as f32 * 120.0 - 2_000.0, y, CAR_Z),
                Rotator::yaw(team.sign() * std::f32::consts::FRAC_PI_2),
            );
            self.bodies.push(Body {
                id:         DroneId(i as u32),
                team,
                kinematics: pose,
                boost:      33.0,
                controls:   ControlAction::NEUTRAL,
            });
        }
    }

    fn integrate(&mut self) {
        let dt = self.clock.tick_secs();
        for body in &mut self.bodies {
            let c = body.controls;
            let k = &mut body.kinematics;
            let forward = k.orientation().forward.flat().normalized();
            let mut speed = k.velocity.dot(forward);

            let boosting = c.boost && body.boost > 0.0;
            if boosting {
                body.boost = (body.boost - BOOST_PER_SEC * dt).max(0.0);
            }
            let accel = c.throttle * THROTTLE_ACCEL + if boosting { BOOST_ACCEL } else { 0.0 };
            if accel == 0.0 {
                speed -= speed.signum() * (COAST_DECEL * dt).min(speed.abs());
            } else {
                speed += accel * dt;
            }
            speed = speed.clamp(-MAX_SPEED, MAX_SPEED);

            k.rotation.yaw += c.steer * TURN_RATE * dt;
            let heading = Rotator::yaw(k.rotation.yaw).orientation().forward;
            k.velocity = heading * speed;
            k.position += k.velocity * dt;
            k.position.z = CAR_Z.max(k.position.z);
        }
    }
}

impl SnapshotSource for Arena {
    fn next_snapshot(&mut self) -> Option<WorldSnapshot> {
        if self.tick >= self.last_tick {
            return None;
        }
        self.integrate();
        self.spawn();
        self.tick += 1;

        let mut snapshot = WorldSnapshot::new(Tick(self.tick));
        snapshot.seconds_elapsed = self.clock.secs(self.tick);
        snapshot.ball = Some(self.ball);
        snapshot.drones = self
            .bodies
            .iter()
            .map(|b| {
                let mut entry = DroneSnapshot::new(b.id, b.team, b.kinematics);
                entry.boost = b.boost;
                entry
            })
            .collect();
        Some(snapshot)
    }
}

impl ControlSink for Arena {
    fn send(&mut self, _tick: Tick, drone: DroneId, controls: &ControlAction) {
        if let Some(body) = self.bodies.get_mut(drone.index()) {
            body.controls = *controls;
        }
    }
}

impl WorldMutator for Arena {
    fn apply(&mut self, update: WorldUpdate) {
        for (id, kinematics) in update.drones {
            if let Some(body) = self.bodies.get_mut(id.index()) {
                body.kinematics = kinematics;
                self.teleports += 1;
            }
        }
        if let Some(ball) = update.ball {
            self.ball = ball;
        }
    }
}
