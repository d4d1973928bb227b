//! `dc-choreo`: sub-timelines, the orchestrator, and the choreography
//! driver.
//!
//! # Tick loop
//!
//! ```text
//! for each snapshot:
//!   ① Refresh  : upsert drones from the snapshot, note roster changes.
//!   ② Reset    : every drone's controls → ControlAction::NEUTRAL.
//!   ③ Pre-step : Script::pre_step(snapshot).
//!   ④ Gate     : while gating: poll readiness, run the staging step;
//!                 on open: Script::generate_sequence(roster, clock).
//!   ⑤ Advance  : root Timeline::advance (usually one Orchestrator step
//!                 fanning out to its sub-timelines in construction order).
//!   ⑥ Report   : step failures and the tick outcome to the observer.
//!   ⑦ Emit     : one clamped ControlAction per present drone to the sink.
//! ```
//!
//! # Crate layout
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`subgroup`]     | `SubTimeline`, `SubTimelineBuilder`                      |
//! | [`orchestrator`] | `Orchestrator`, `OrchestratorBuilder`                    |
//! | [`readiness`]    | `ReadinessPredicate`, `ExpectedDrones`, `ReadinessGate`  |
//! | [`script`]       | `Script`, `FnScript`                                     |
//! | [`choreography`] | `Choreography`, `Phase`, `TickOutcome`, `ChoreoStatus`   |
//! | [`builder`]      | `ChoreographyBuilder`                                    |
//! | [`host`]         | `SnapshotSource`, `ControlSink`, `ReplaySource`          |
//! | [`observer`]     | `ChoreoObserver`, `NoopObserver`                         |
//! | [`config`]       | `ChoreoConfig`, `TimeoutPolicy`, `FailurePolicy`         |
//! | [`error`]        | `ChoreoError`, `ChoreoResult<T>`                         |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `serde`   | `Serialize`/`Deserialize` on `ChoreoConfig` and friends |
//! | `fx-hash` | FxHash for `DroneSet`                                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dc_choreo::{ChoreoConfig, ChoreographyBuilder, FnScript, NoopObserver, Orchestrator, SubTimeline};
//!
//! let script = FnScript::new("pair", |roster, _clock| {
//!     let orchestrator = Orchestrator::builder()
//!         .child(SubTimeline::builder("left").drone(roster[0]).step(left).build()?)
//!         .child(SubTimeline::builder("right").drone(roster[1]).start_after(60).step(right).build()?)
//!         .build()?;
//!     Ok(vec![orchestrator.into_step("pair")])
//! });
//! let mut show = ChoreographyBuilder::new(ChoreoConfig::default(), script).build()?;
//! show.run(&mut host, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod choreography;
pub mod config;
pub mod error;
pub mod host;
pub mod observer;
pub mod orchestrator;
pub mod readiness;
pub mod script;
pub mod subgroup;


pub use builder::ChoreographyBuilder;
pub use choreography::{ChoreoStatus, Choreography, Phase, RunSummary, TickOutcome};
pub use config::{ChoreoConfig, FailurePolicy, TimeoutPolicy};
pub use error::{ChoreoError, ChoreoResult};
pub use host::{ControlSink, ReplaySource, SnapshotSource};
pub use observer::{ChoreoObserver, NoopObserver};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use readiness::{ExpectedDrones, GateStatus, ReadinessGate, ReadinessPredicate};
pub use script::{FnScript, Script};
pub use subgroup::{SubTimeline, SubTimelineBuilder};

pub use dc_step::Transition;
