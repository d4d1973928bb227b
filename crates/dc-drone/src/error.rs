use dc_core::DroneId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DroneError {
    #[error("drone id {0} is the invalid sentinel")]
    InvalidId(DroneId),

    #[error("drone {0} is not claimed by this registry")]
    Unclaimed(DroneId),

    #[error("drone id {id} is outside this registry's range 0..{max}")]
    OutOfRange { id: DroneId, max: usize },
}

pub type DroneResult<T> = Result<T, DroneError>;
