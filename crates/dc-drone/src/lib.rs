//! `dc-drone`: the agent registry for the drone choreography scheduler.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`drone`]     | `Drone`: per-drone pose, boost, and control output          |
//! | [`snapshot`]  | `WorldSnapshot`, `DroneSnapshot`: what the host sends       |
//! | [`registry`]  | `DroneRegistry` (arena indexed by `DroneId`), `RosterChange` |
//! | [`group`]     | `DroneGroup`: handle-scoped mutable view for one invocation |
//! | [`builder`]   | `DroneRegistryBuilder`                                       |
//! | [`error`]     | `DroneError`, `DroneResult<T>`                               |
//!
//! # Ownership
//!
//! The driver owns the one `DroneRegistry`.  Steps never hold it: they are
//! handed a `DroneGroup` that mutably borrows the registry for the duration
//! of a single invocation and only exposes the drones in their subset.

pub mod builder;
pub mod drone;
pub mod error;
pub mod group;
pub mod registry;
pub mod snapshot;


pub use builder::DroneRegistryBuilder;
pub use drone::Drone;
pub use error::{DroneError, DroneResult};
pub use group::DroneGroup;
pub use registry::{DEFAULT_MAX_DRONES, DroneRegistry, RosterChange};
pub use snapshot::{DroneSnapshot, WorldSnapshot};
