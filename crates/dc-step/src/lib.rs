//! `dc-step`: steps, behaviors, and timelines.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`behavior`] | `GroupBehavior`, `DroneBehavior`, `ListBehavior`, `StepResult`    |
//! | [`stock`]    | `Hold`, `Wait`, `Blind`: reusable behaviors                       |
//! | [`step`]     | `Step`: a labelled behavior plus its dispatch granularity        |
//! | [`timeline`] | `Timeline`, `Transition`, `TimelineStatus`, `BranchStatus`        |
//! | [`context`]  | `StepContext<'a>`: per-invocation time, world, and collaborators |
//! | [`world`]    | `WorldMutator`, `WorldUpdate`: direct pose writes (teleports)    |
//! | [`render`]   | `Renderer`, `DrawCommand`, `RenderScope`: debug drawing          |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`, `StepFailure`               |
//!
//! # Dispatch granularities
//!
//! | Variant     | Behavior called                 | Finished when                      |
//! |-------------|---------------------------------|------------------------------------|
//! | `Combined`  | once, with the whole group      | the behavior says so               |
//! | `PerDrone`  | once per unfinished drone       | every drone has said so            |
//! | `DroneList` | once, with `&mut [&mut Drone]`  | the behavior says so               |
//!
//! A behavior that returns `Err` does not abort the tick: the failure is
//! recorded on the context, logged, and the step counts as not finished.

pub mod behavior;
pub mod context;
pub mod error;
pub mod render;
pub mod step;
pub mod stock;
pub mod timeline;
pub mod world;

#[cfg(test)]
mod tests;

pub use behavior::{DroneBehavior, FnDrone, FnGroup, FnList, GroupBehavior, ListBehavior, StepResult};
pub use context::StepContext;
pub use error::{BehaviorError, BehaviorResult, StepFailure};
pub use render::{Color, DrawCommand, NoopRenderer, RecordingRenderer, RenderEvent, RenderScope, Renderer};
pub use step::{Step, StepKind};
pub use stock::{Blind, Hold, Wait};
pub use timeline::{BranchPhase, BranchStatus, Timeline, TimelineStatus, Transition};
pub use world::{NoopWorld, RecordingWorld, WorldMutator, WorldUpdate};
