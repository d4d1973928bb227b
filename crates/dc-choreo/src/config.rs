//! Driver configuration.

use dc_core::TickClock;
use dc_step::Transition;

use crate::{ChoreoError, ChoreoResult};

/// What the driver does when the readiness gate exhausts its wait budget.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeoutPolicy {
    /// Stop for good; every later tick reports `TimedOut`.
    #[default]
    Halt,
    /// Build the sequence with whatever roster is present and run it.
    Proceed,
}

/// What the driver does when a behavior returns an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailurePolicy {
    /// Record, report, and keep ticking; the failing step simply stalls.
    #[default]
    Degrade,
    /// Return `ChoreoError::StepFailed` from the tick that saw the failure.
    FailFast,
}

/// Top-level configuration for a [`Choreography`][crate::Choreography].
///
/// Every field has a default, so a JSON file only needs to name what it
/// changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChoreoConfig {
    /// Host ticks per second.
    pub tick_rate_hz:             u32,
    /// Population the default readiness gate waits for.  `0` opens the gate
    /// on the first tick.
    pub expected_drones:          usize,
    /// Ticks the gate may stay closed before timing out.  `None` waits
    /// forever.
    pub max_wait_ticks:           Option<u64>,
    pub on_timeout:               TimeoutPolicy,
    /// Transition mode of the root timeline.
    pub transition:               Transition,
    pub failure_policy:           FailurePolicy,
    /// Regenerate the sequence from scratch when drones join or leave.
    pub rebuild_on_roster_change: bool,
    /// Upper bound on ticks processed by `Choreography::run`.
    pub max_ticks:                Option<u64>,
}

impl Default for ChoreoConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz:             120,
            expected_drones:          0,
            max_wait_ticks:           None,
            on_timeout:               TimeoutPolicy::Halt,
            transition:               Transition::Defer,
            failure_policy:           FailurePolicy::Degrade,
            rebuild_on_roster_change: true,
            max_ticks:                None,
        }
    }
}

impl ChoreoConfig {
    /// Check field ranges and build the tick clock.
    pub fn clock(&self) -> ChoreoResult<TickClock> {
        if self.max_ticks == Some(0) {
            return Err(ChoreoError::Config("max_ticks must be at least 1".into()));
        }
        Ok(TickClock::new(self.tick_rate_hz)?)
    }
}
