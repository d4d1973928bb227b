use dc_core::{DcError, DroneId};
use dc_step::StepFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChoreoError {
    #[error("choreography configuration error: {0}")]
    Config(String),

    #[error("sub-timeline '{0}' has no drones")]
    EmptySubgroup(String),

    #[error("drone {drone} is listed more than once in sub-timeline '{group}'")]
    DuplicateDrone {
        group: String,
        drone: DroneId,
    },

    #[error("drone {drone} is claimed by both '{first}' and '{second}'")]
    OverlappingSubgroups {
        drone:  DroneId,
        first:  String,
        second: String,
    },

    #[error("step failed under fail-fast policy: {0}")]
    StepFailed(StepFailure),

    #[error(transparent)]
    Core(#[from] DcError),
}

pub type ChoreoResult<T> = Result<T, ChoreoError>;
