//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `DcError` as one variant
//! where a core failure can surface through them.

use thiserror::Error;

use crate::DroneId;

/// The top-level error type for `dc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DcError {
    #[error("drone {0} not found")]
    DroneNotFound(DroneId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("tick rate must be > 0 Hz")]
    ZeroTickRate,
}

/// Shorthand result type for all `dc-*` crates.
pub type DcResult<T> = Result<T, DcError>;
