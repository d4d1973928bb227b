use dc_core::{DroneId, Tick};
use thiserror::Error;

/// Why a behavior could not produce a result this tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BehaviorError {
    #[error("behavior failed: {0}")]
    Failed(String),

    #[error("drone {0} required by the behavior is not present")]
    MissingDrone(DroneId),

    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// A recorded invocation failure.
///
/// Timelines push these onto the [`StepContext`][crate::StepContext] instead
/// of propagating them, so one broken step stalls only its own timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub tick:  Tick,
    /// Label of the failing step.
    pub step:  String,
    /// Set for `PerDrone` steps.
    pub drone: Option<DroneId>,
    pub error: BehaviorError,
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.drone {
            Some(d) => write!(f, "{} step '{}' ({d}): {}", self.tick, self.step, self.error),
            None    => write!(f, "{} step '{}': {}", self.tick, self.step, self.error),
        }
    }
}
