//! The per-drone record held by the registry.

use dc_core::{ControlAction, DroneId, Kinematics, Orientation, Team, Vec3};

/// One controlled drone.
///
/// `kinematics`, `team` and `boost` are overwritten from the snapshot every
/// tick and must be treated as read-only by behaviors.  `controls` is the
/// output: reset to neutral by the driver before each tick and written by at
/// most one step invocation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drone {
    pub id:         DroneId,
    pub team:       Team,
    pub kinematics: Kinematics,
    /// Boost resource in `[0, 100]`.
    pub boost:      f32,
    pub controls:   ControlAction,
}

impl Drone {
    pub fn new(id: DroneId, team: Team) -> Self {
        Self {
            id,
            team,
            kinematics: Kinematics::default(),
            boost:      0.0,
            controls:   ControlAction::NEUTRAL,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.kinematics.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.kinematics.velocity
    }

    /// Rotation matrix for the current pose.  Recomputed on each call.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.kinematics.orientation()
    }

    /// `target` expressed in this drone's local frame.
    pub fn local(&self, target: Vec3) -> Vec3 {
        self.orientation().to_local(self.position(), target)
    }
}
