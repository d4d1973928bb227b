//! `DroneGroup`: the only way a step touches drones.
//!
//! A group mutably borrows the registry for the lifetime of one invocation
//! and restricts access to its member handles.  Members are the *present*
//! drones among the requested ids, deduplicated, in request order.  Groups
//! can be narrowed with [`DroneGroup::subset`] (used by the orchestrator to
//! hand each sub-timeline its own drones) but never widened.

use dc_core::{DroneId, DroneSet};

use crate::{Drone, DroneRegistry};

pub struct DroneGroup<'a> {
    registry: &'a mut DroneRegistry,
    members:  Vec<DroneId>,
}

impl<'a> DroneGroup<'a> {
    pub(crate) fn new(registry: &'a mut DroneRegistry, ids: &[DroneId]) -> Self {
        let mut seen = DroneSet::default();
        let members = ids
            .iter()
            .copied()
            .filter(|&id| registry.contains(id) && seen.insert(id))
            .collect();
        Self { registry, members }
    }

    /// Caller guarantees `members` are present and unique.
    pub(crate) fn from_members(registry: &'a mut DroneRegistry, members: Vec<DroneId>) -> Self {
        Self { registry, members }
    }

    /// Member handles, in invocation order.
    #[inline]
    pub fn ids(&self) -> &[DroneId] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: DroneId) -> bool {
        self.members.contains(&id)
    }

    /// A member drone, or `None` for non-members.
    pub fn get(&self, id: DroneId) -> Option<&Drone> {
        if self.contains(id) { self.registry.get(id) } else { None }
    }

    pub fn get_mut(&mut self, id: DroneId) -> Option<&mut Drone> {
        if self.contains(id) { self.registry.get_mut(id) } else { None }
    }

    /// Member drones in order.
    pub fn iter(&self) -> impl Iterator<Item = &Drone> + '_ {
        self.members.iter().filter_map(|&id| self.registry.get(id))
    }

    /// Disjoint mutable references to every member, in order.
    pub fn drones_mut(&mut self) -> Vec<&mut Drone> {
        self.registry.many_mut(&self.members)
    }

    /// Read-only view of the whole registry, including non-members.
    ///
    /// Behaviors may read other drones' poses (e.g. to keep spacing) but can
    /// only write through their own members.
    pub fn registry(&self) -> &DroneRegistry {
        &*self.registry
    }

    /// Narrow to the members among `ids`, in `ids` order.  Non-members are
    /// dropped.
    pub fn subset(&mut self, ids: &[DroneId]) -> DroneGroup<'_> {
        let mut seen = DroneSet::default();
        let members = ids
            .iter()
            .copied()
            .filter(|&id| self.members.contains(&id) && seen.insert(id))
            .collect();
        DroneGroup { registry: &mut *self.registry, members }
    }

    /// Reborrow the whole group for a nested call.
    pub fn reborrow(&mut self) -> DroneGroup<'_> {
        DroneGroup { registry: &mut *self.registry, members: self.members.clone() }
    }
}
