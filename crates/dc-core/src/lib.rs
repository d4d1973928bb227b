//! `dc-core`: foundational types for the drone choreography scheduler.
//!
//! This crate is a dependency of every other `dc-*` crate.  It intentionally
//! has no `dc-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde` and `rustc-hash`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `DroneId`, `Team`, `DroneSet`                         |
//! | [`geom`]        | `Vec3`, `Rotator`, `Orientation`, `Kinematics`        |
//! | [`time`]        | `Tick`, `TickClock`                                   |
//! | [`control`]     | `ControlAction` (per-drone output)                    |
//! | [`error`]       | `DcError`, `DcResult`                                 |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | Adds `Serialize`/`Deserialize` to all public types.      |
//! | `fx-hash` | `DroneSet` becomes `rustc_hash::FxHashSet<DroneId>`.     |

pub mod control;
pub mod error;
pub mod geom;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use control::ControlAction;
pub use error::{DcError, DcResult};
pub use geom::{Kinematics, Orientation, Rotator, Vec3};
pub use ids::{DroneId, DroneMap, DroneSet, Team};
pub use time::{Tick, TickClock};
