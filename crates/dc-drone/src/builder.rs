//! Fluent builder for constructing a `DroneRegistry`.
//!
//! # Usage
//!
//! ```rust
//! use dc_core::DroneId;
//! use dc_drone::DroneRegistryBuilder;
//!
//! // Only track the drones this process was asked to control.
//! let registry = DroneRegistryBuilder::new()
//!     .claim([DroneId(0), DroneId(1), DroneId(2)])
//!     .capacity(64)
//!     .max_drones(256)
//!     .build();
//!
//! assert!(registry.is_claimed(DroneId(1)));
//! assert!(!registry.is_claimed(DroneId(7)));
//! ```

use dc_core::{DroneId, DroneSet};

use crate::{DroneRegistry, registry::DEFAULT_MAX_DRONES};

/// Fluent builder for [`DroneRegistry`].
pub struct DroneRegistryBuilder {
    capacity:   usize,
    claimed:    Option<DroneSet>,
    max_drones: usize,
}

impl Default for DroneRegistryBuilder {
    fn default() -> Self {
        Self { capacity: 0, claimed: None, max_drones: DEFAULT_MAX_DRONES }
    }
}

impl DroneRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate slots for ids `0..capacity`.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Reject ids `>= max_drones`.  Defaults to
    /// [`DEFAULT_MAX_DRONES`][crate::registry::DEFAULT_MAX_DRONES].
    pub fn max_drones(mut self, max_drones: usize) -> Self {
        self.max_drones = max_drones;
        self
    }

    /// Restrict the registry to these ids.  May be called more than once;
    /// the claims accumulate.
    pub fn claim(mut self, ids: impl IntoIterator<Item = DroneId>) -> Self {
        self.claimed.get_or_insert_with(DroneSet::default).extend(ids);
        self
    }

    pub fn build(self) -> DroneRegistry {
        DroneRegistry::with_parts(self.capacity, self.claimed, self.max_drones)
    }
}
