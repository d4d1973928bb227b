//! `Timeline`: an ordered sequence of steps with a forward-only cursor.
//!
//! # Advancement
//!
//! ```text
//! advance(ctx, drones):
//!   cursor past end          → finished
//!   invoke steps[cursor]     (elapsed = local − became_current_at)
//!   not finished             → not finished
//!   finished                 → cursor += 1, became_current_at = local
//!     cursor past end        → finished
//!     Transition::Defer      → not finished (next step runs next tick)
//!     Transition::Cascade    → invoke the new current step this tick
//! ```
//!
//! `Defer` bounds per-tick cost to one step invocation per timeline and is
//! the default.  Under `Cascade` a step can still run at most once per tick
//! because the cursor only moves forward.

use std::fmt;

use dc_core::Tick;
use dc_drone::DroneGroup;

use crate::{Step, StepContext};

// ── Transition ────────────────────────────────────────────────────────────────

/// What happens in the tick a step finishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Transition {
    /// The next step first runs on the following tick.
    #[default]
    Defer,
    /// The next step runs immediately, in the same tick.
    Cascade,
}

// ── Status ────────────────────────────────────────────────────────────────────

/// Lifecycle of a sub-timeline, as seen by its orchestrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BranchPhase {
    /// Start offset has not elapsed yet.
    Dormant,
    Active,
    Finished,
}

impl fmt::Display for BranchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BranchPhase::Dormant  => "dormant",
            BranchPhase::Active   => "active",
            BranchPhase::Finished => "finished",
        })
    }
}

/// Diagnostics for one sub-timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchStatus {
    pub name:         String,
    pub phase:        BranchPhase,
    pub start_offset: u64,
    pub drones:       usize,
    pub timeline:     TimelineStatus,
}

/// Diagnostics for one timeline: where the cursor is and for how long.
///
/// A timeline that stays on the same cursor with a growing `elapsed` is
/// stalled; callers can build their own watchdog on top of this.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineStatus {
    pub cursor:        usize,
    pub len:           usize,
    pub current_label: Option<String>,
    /// Ticks the current step had been current at the last `advance`.
    pub elapsed:       Option<u64>,
    pub finished:      bool,
    /// Sub-timelines of the current step, if it is an orchestrator.
    pub branches:      Vec<BranchStatus>,
}

impl fmt::Display for TimelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.finished {
            return write!(f, "finished ({} steps)", self.len);
        }
        write!(f, "step {}/{}", self.cursor + 1, self.len)?;
        if let Some(label) = &self.current_label {
            write!(f, " '{label}'")?;
        }
        if let Some(elapsed) = self.elapsed {
            write!(f, " +{elapsed}t")?;
        }
        Ok(())
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Timeline {
    steps:      Vec<Step>,
    cursor:     usize,
    /// Local tick of the first invocation of `steps[cursor]`.  Cleared on
    /// every transition and set lazily by the next `advance`, so each step
    /// sees `elapsed == 0` on its first tick wherever it sits in the
    /// sequence.
    anchor:     Option<Tick>,
    last_local: Option<Tick>,
    transition: Transition,
}

impl Timeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps, ..Self::default() }
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Append a step.  Sequences are append-only; a finished timeline that
    /// receives a new step resumes at it.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Replace the whole sequence and rewind to the start.
    pub fn reset(&mut self, steps: Vec<Step>) {
        self.steps = steps;
        self.cursor = 0;
        self.anchor = None;
        self.last_local = None;
    }

    /// Advance by at most one step (or a cascade of steps under
    /// [`Transition::Cascade`]).  Returns `true` once the cursor is past the
    /// final step; an empty timeline is finished on its first call.
    ///
    /// Time is read from `ctx.local`.
    pub fn advance(&mut self, ctx: &mut StepContext<'_>, drones: &mut DroneGroup<'_>) -> bool {
        let now = ctx.local;
        self.last_local = Some(now);
        if self.is_finished() {
            return true;
        }

        loop {
            let anchor = *self.anchor.get_or_insert(now);
            let step = &mut self.steps[self.cursor];
            let result = step.invoke(&mut ctx.with_elapsed(now.since(anchor)), drones);
            if !result.finished {
                return false;
            }

            tracing::debug!(tick = %ctx.now, step = step.label(), cursor = self.cursor, "step finished");
            self.cursor += 1;
            // The next step anchors on its own first invocation.
            self.anchor = None;

            if self.is_finished() {
                return true;
            }
            if self.transition == Transition::Defer {
                return false;
            }
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Index of the current step; equals `len()` once finished.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.cursor)
    }

    /// Ticks the current step had been current at the last `advance`.
    pub fn elapsed(&self) -> Option<u64> {
        match (self.anchor, self.last_local) {
            (Some(anchor), Some(local)) if !self.is_finished() => Some(local.since(anchor)),
            _ => None,
        }
    }

    pub fn status(&self) -> TimelineStatus {
        let current = self.current();
        TimelineStatus {
            cursor:        self.cursor,
            len:           self.steps.len(),
            current_label: current.map(|s| s.label().to_owned()),
            elapsed:       self.elapsed(),
            finished:      self.is_finished(),
            branches:      current.map(Step::branches).unwrap_or_default(),
        }
    }
}
