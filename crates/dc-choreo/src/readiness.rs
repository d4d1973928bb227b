//! Startup readiness gating.
//!
//! The driver polls a [`ReadinessPredicate`] once per tick until it holds.
//! Each failed poll counts one tick of waiting; with `max_wait = Some(n)`
//! the gate reports `Waiting` for `n` ticks and `TimedOut` on the next.

use dc_drone::{DroneRegistry, WorldSnapshot};

/// "Is the world ready for the show to start?"
pub trait ReadinessPredicate {
    fn is_ready(&self, registry: &DroneRegistry, world: &WorldSnapshot) -> bool;
}

impl<F> ReadinessPredicate for F
where
    F: Fn(&DroneRegistry, &WorldSnapshot) -> bool,
{
    fn is_ready(&self, registry: &DroneRegistry, world: &WorldSnapshot) -> bool {
        self(registry, world)
    }
}

/// Ready once at least `count` drones are present (and, optionally, the
/// host reports the round as active).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExpectedDrones {
    pub count:                usize,
    pub require_round_active: bool,
}

impl ExpectedDrones {
    pub fn new(count: usize) -> Self {
        Self { count, require_round_active: false }
    }

    pub fn round_active(mut self) -> Self {
        self.require_round_active = true;
        self
    }
}

impl ReadinessPredicate for ExpectedDrones {
    fn is_ready(&self, registry: &DroneRegistry, world: &WorldSnapshot) -> bool {
        registry.len() >= self.count && (!self.require_round_active || world.round_active)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateStatus {
    Ready,
    Waiting { waited: u64 },
    TimedOut { waited: u64 },
}

pub struct ReadinessGate {
    predicate: Box<dyn ReadinessPredicate>,
    max_wait:  Option<u64>,
    waited:    u64,
}

impl ReadinessGate {
    pub fn new(predicate: impl ReadinessPredicate + 'static, max_wait: Option<u64>) -> Self {
        Self::boxed(Box::new(predicate), max_wait)
    }

    pub fn boxed(predicate: Box<dyn ReadinessPredicate>, max_wait: Option<u64>) -> Self {
        Self { predicate, max_wait, waited: 0 }
    }

    /// Poll once.  Call exactly once per tick while gating.
    pub fn poll(&mut self, registry: &DroneRegistry, world: &WorldSnapshot) -> GateStatus {
        if self.predicate.is_ready(registry, world) {
            return GateStatus::Ready;
        }
        self.waited += 1;
        match self.max_wait {
            Some(max) if self.waited > max => GateStatus::TimedOut { waited: self.waited },
            _ => GateStatus::Waiting { waited: self.waited },
        }
    }

    /// Ticks spent waiting so far.
    pub fn waited(&self) -> u64 {
        self.waited
    }

    pub fn max_wait(&self) -> Option<u64> {
        self.max_wait
    }
}

impl std::fmt::Debug for ReadinessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("max_wait", &self.max_wait)
            .field("waited", &self.waited)
            .finish_non_exhaustive()
    }
}
