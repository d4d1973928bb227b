//! Per-drone control output.
//!
//! Every tick the driver resets each drone's `ControlAction` to
//! [`ControlAction::NEUTRAL`] before any step runs, so a drone that no active
//! step touches emits a well-defined no-op rather than last tick's input.

/// Analog and digital inputs sent to one drone for one tick.
///
/// Axis fields are expected in `[-1.0, 1.0]`; [`clamped`](Self::clamped)
/// enforces that before output.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlAction {
    pub throttle:  f32,
    pub steer:     f32,
    pub pitch:     f32,
    pub yaw:       f32,
    pub roll:      f32,
    pub jump:      bool,
    pub boost:     bool,
    pub handbrake: bool,
    pub use_item:  bool,
}

impl ControlAction {
    /// All axes zero, all buttons released.
    pub const NEUTRAL: ControlAction = ControlAction {
        throttle:  0.0,
        steer:     0.0,
        pitch:     0.0,
        yaw:       0.0,
        roll:      0.0,
        jump:      false,
        boost:     false,
        handbrake: false,
        use_item:  false,
    };

    /// `true` if no input is applied.
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Copy with every axis clamped to `[-1.0, 1.0]`.  NaN axes become zero.
    pub fn clamped(self) -> Self {
        fn axis(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
        }
        Self {
            throttle: axis(self.throttle),
            steer:    axis(self.steer),
            pitch:    axis(self.pitch),
            yaw:      axis(self.yaw),
            roll:     axis(self.roll),
            ..self
        }
    }
}
