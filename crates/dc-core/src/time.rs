//! Scheduler time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter supplied
//! by the host with every snapshot.  The mapping to seconds is held in
//! `TickClock`:
//!
//!   seconds = tick / tick_rate_hz
//!
//! Using an integer tick as the canonical time unit means every start offset
//! and elapsed-time comparison is exact (no floating-point drift).  Offsets
//! authored in seconds are converted once, at construction, by rounding up to
//! whole ticks.

use std::fmt;

use crate::{DcError, DcResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute tick counter.
///
/// Stored as `u64`; at 120 ticks per second a u64 lasts ~4.8 billion years.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero when the
    /// host clock is rewound.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Converts between tick counts and seconds.
///
/// `TickClock` is `Copy` and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// Ticks per second.  The host loop of the reference game runs at 120.
    pub tick_rate_hz: u32,
}

impl TickClock {
    /// Create a clock running at `tick_rate_hz`.
    pub fn new(tick_rate_hz: u32) -> DcResult<Self> {
        if tick_rate_hz == 0 {
            return Err(DcError::ZeroTickRate);
        }
        Ok(Self { tick_rate_hz })
    }

    /// Duration of `ticks` in seconds.
    #[inline]
    pub fn secs(&self, ticks: u64) -> f32 {
        ticks as f32 / self.tick_rate_hz as f32
    }

    /// How many ticks span `secs` seconds? (rounds up: a step won't start early)
    ///
    /// Negative and NaN inputs map to zero.
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if secs.is_nan() || secs <= 0.0 {
            return 0;
        }
        // Round the product first so 0.5 s at 120 Hz is 60, not 61.
        let exact = (secs as f64 * self.tick_rate_hz as f64 * 1e6).round() / 1e6;
        exact.ceil() as u64
    }

    /// Length of one tick in seconds.
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self { tick_rate_hz: 120 }
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.tick_rate_hz)
    }
}
