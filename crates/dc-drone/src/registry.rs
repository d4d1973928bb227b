//! `DroneRegistry`: arena of drones indexed by stable `DroneId`.
//!
//! # Layout
//!
//! Slots are a `Vec<Option<Drone>>` where the slot index *is* the drone's
//! handle, so lookups are O(1) and handles stay valid across roster changes:
//!
//! ```ignore
//! let drone = registry.get(DroneId(12))?;   // slots[12]
//! ```
//!
//! Ids at or above the registry's `max_drones` are never stored; the slot
//! vector grows only up to that bound.
//!
//! Drones appear when the host first reports them and disappear when a
//! snapshot no longer contains them.  Both changes are reported by
//! [`DroneRegistry::refresh`] so the driver can decide whether to rebuild its
//! sequence.

use dc_core::{ControlAction, DroneId, DroneSet};

use crate::{Drone, DroneError, DroneGroup, DroneResult, WorldSnapshot};

// ── RosterChange ──────────────────────────────────────────────────────────────

/// Which drones joined or left during one [`DroneRegistry::refresh`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterChange {
    /// Newly observed drones, ascending.
    pub added:   Vec<DroneId>,
    /// Drones missing from the snapshot, ascending.
    pub removed: Vec<DroneId>,
}

impl RosterChange {
    /// `true` if the roster kept its shape.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

// ── DroneRegistry ─────────────────────────────────────────────────────────────

/// Default upper bound on drone ids; see [`DroneRegistry::max_drones`].
pub const DEFAULT_MAX_DRONES: usize = 4096;

/// Canonical per-drone state, exclusively owned by the driver.
///
/// Create via [`DroneRegistryBuilder`][crate::DroneRegistryBuilder] or
/// [`DroneRegistry::new`].
#[derive(Debug)]
pub struct DroneRegistry {
    slots:      Vec<Option<Drone>>,
    count:      usize,
    /// When set, snapshot entries for any other id are ignored.
    claimed:    Option<DroneSet>,
    /// Exclusive bound on accepted ids.
    max_drones: usize,
}

impl Default for DroneRegistry {
    fn default() -> Self {
        Self::with_parts(0, None, DEFAULT_MAX_DRONES)
    }
}

impl DroneRegistry {
    /// An empty registry that tracks every drone the host reports.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_parts(capacity: usize, claimed: Option<DroneSet>, max_drones: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(max_drones)),
            count: 0,
            claimed,
            max_drones,
        }
    }

    // ── Snapshot refresh ──────────────────────────────────────────────────

    /// Overwrite poses, teams and boost from `snapshot`, insert newly seen
    /// drones and drop drones the snapshot no longer lists.
    ///
    /// Output controls are left untouched; the driver resets them separately.
    /// Duplicate entries in the snapshot are resolved last-wins.  Entries
    /// whose id is at or above [`max_drones`][Self::max_drones] are skipped
    /// with a warning.
    pub fn refresh(&mut self, snapshot: &WorldSnapshot) -> RosterChange {
        let mut change = RosterChange::default();
        let mut seen = vec![false; self.slots.len()];

        for entry in &snapshot.drones {
            if entry.id == DroneId::INVALID {
                continue;
            }
            if !self.is_claimed(entry.id) {
                tracing::trace!(drone = %entry.id, "skipping unclaimed drone");
                continue;
            }
            let idx = entry.id.index();
            if idx >= self.max_drones {
                tracing::warn!(drone = %entry.id, max = self.max_drones, "drone id out of range, skipping");
                continue;
            }
            if idx >= self.slots.len() {
                self.slots.resize_with(idx + 1, || None);
                seen.resize(idx + 1, false);
            }
            seen[idx] = true;

            if self.slots[idx].is_none() {
                change.added.push(entry.id);
                self.count += 1;
                self.slots[idx] = Some(Drone::new(entry.id, entry.team));
            }
            if let Some(drone) = self.slots[idx].as_mut() {
                drone.team       = entry.team;
                drone.kinematics = entry.kinematics;
                drone.boost      = entry.boost;
            }
        }

        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_some() && !seen[idx] {
                *slot = None;
                self.count -= 1;
                change.removed.push(DroneId(idx as u32));
            }
        }

        change.added.sort_unstable();
        change
    }

    /// Reset every drone's output to [`ControlAction::NEUTRAL`].
    pub fn reset_controls(&mut self) {
        for drone in self.iter_mut() {
            drone.controls = ControlAction::NEUTRAL;
        }
    }

    /// Insert (or replace) a drone directly, bypassing the snapshot path.
    pub fn insert(&mut self, drone: Drone) -> DroneResult<()> {
        if drone.id == DroneId::INVALID {
            return Err(DroneError::InvalidId(drone.id));
        }
        if !self.is_claimed(drone.id) {
            return Err(DroneError::Unclaimed(drone.id));
        }
        let idx = drone.id.index();
        if idx >= self.max_drones {
            return Err(DroneError::OutOfRange { id: drone.id, max: self.max_drones });
        }
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        if self.slots[idx].replace(drone).is_none() {
            self.count += 1;
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Number of drones currently present.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, id: DroneId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: DroneId) -> Option<&Drone> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: DroneId) -> Option<&mut Drone> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Exclusive upper bound on the ids this registry stores.
    #[inline]
    pub fn max_drones(&self) -> usize {
        self.max_drones
    }

    /// `true` if snapshot entries for `id` are accepted.
    pub fn is_claimed(&self, id: DroneId) -> bool {
        self.claimed.as_ref().is_none_or(|set| set.contains(&id))
    }

    /// Present drones in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Drone> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Drone> + '_ {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Ids of present drones, ascending.  This is the stable drone index
    /// order that scripts slice into sub-groups.
    pub fn roster(&self) -> Vec<DroneId> {
        self.iter().map(|d| d.id).collect()
    }

    /// Every present drone's current output, ascending by id.
    pub fn controls(&self) -> impl Iterator<Item = (DroneId, &ControlAction)> + '_ {
        self.iter().map(|d| (d.id, &d.controls))
    }

    // ── Scoped mutable access ─────────────────────────────────────────────

    /// Disjoint mutable references to the drones in `ids`, in `ids` order.
    ///
    /// Absent ids and repeated ids are skipped.
    pub fn many_mut(&mut self, ids: &[DroneId]) -> Vec<&mut Drone> {
        let mut slots: Vec<Option<&mut Drone>> =
            self.slots.iter_mut().map(Option::as_mut).collect();
        ids.iter()
            .filter_map(|id| slots.get_mut(id.index()).and_then(Option::take))
            .collect()
    }

    /// A group over the present drones among `ids`.
    pub fn group(&mut self, ids: &[DroneId]) -> DroneGroup<'_> {
        DroneGroup::new(self, ids)
    }

    /// A group over every present drone.
    pub fn all(&mut self) -> DroneGroup<'_> {
        let ids = self.roster();
        DroneGroup::from_members(self, ids)
    }
}
