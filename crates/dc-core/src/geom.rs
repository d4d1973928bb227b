//! Pose primitives: vectors, rotators, orientation matrices.
//!
//! All values use `f32` in the host's world units (unreal units for the
//! reference game).  The scheduler never integrates these: poses are
//! refreshed from the snapshot each tick: but behaviors need the small
//! amount of linear algebra below to express targets.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

// ── Vec3 ──────────────────────────────────────────────────────────────────────

/// A 3-component world-space vector.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn dist(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction; the zero vector is returned as-is.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len == 0.0 { self } else { self * (1.0 / len) }
    }

    /// Copy with `z` zeroed (ground-plane projection).
    #[inline]
    pub fn flat(self) -> Vec3 {
        Vec3 { z: 0.0, ..self }
    }

    /// Component-wise product.
    #[inline]
    pub fn scale(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

// ── Rotator ───────────────────────────────────────────────────────────────────

/// Euler angles in radians.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotator {
    pub pitch: f32,
    pub yaw:   f32,
    pub roll:  f32,
}

impl Rotator {
    #[inline]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotation with only a heading component.
    #[inline]
    pub const fn yaw(yaw: f32) -> Self {
        Self { pitch: 0.0, yaw, roll: 0.0 }
    }

    pub fn orientation(self) -> Orientation {
        Orientation::from_rotator(self)
    }
}

// ── Orientation ───────────────────────────────────────────────────────────────

/// Rotation matrix stored as its three basis columns.
///
/// `right` follows the host's left-handed convention, so a positive local
/// `y` is to the car's left when viewed from above.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orientation {
    pub forward: Vec3,
    pub right:   Vec3,
    pub up:      Vec3,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        forward: Vec3::new(1.0, 0.0, 0.0),
        right:   Vec3::new(0.0, 1.0, 0.0),
        up:      Vec3::new(0.0, 0.0, 1.0),
    };

    pub fn from_rotator(r: Rotator) -> Self {
        let (sp, cp) = r.pitch.sin_cos();
        let (sy, cy) = r.yaw.sin_cos();
        let (sr, cr) = r.roll.sin_cos();

        Self {
            forward: Vec3::new(cp * cy, cp * sy, sp),
            right:   Vec3::new(cy * sp * sr - cr * sy, sy * sp * sr + cr * cy, -cp * sr),
            up:      Vec3::new(-cr * cy * sp - sr * sy, -cr * sy * sp + sr * cy, cp * cr),
        }
    }

    /// Express the world-space vector from `origin` to `point` in this
    /// orientation's local frame (`x` forward, `y` right, `z` up).
    #[inline]
    pub fn to_local(&self, origin: Vec3, point: Vec3) -> Vec3 {
        let d = point - origin;
        Vec3::new(self.forward.dot(d), self.right.dot(d), self.up.dot(d))
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ── Kinematics ────────────────────────────────────────────────────────────────

/// Full physical state of one body as reported by (or written to) the host.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kinematics {
    pub position:         Vec3,
    pub rotation:         Rotator,
    pub velocity:         Vec3,
    pub angular_velocity: Vec3,
}

impl Kinematics {
    /// A body at rest at `position` with `rotation`.
    pub fn at_rest(position: Vec3, rotation: Rotator) -> Self {
        Self { position, rotation, ..Self::default() }
    }

    pub fn orientation(&self) -> Orientation {
        self.rotation.orientation()
    }
}
