//! Neighbor table of one office.

use std::collections::BTreeMap;

use shared_types::Location;

use super::entry::{NeighborEntry, TableChange, UnchangedReason};

/// The `k` nearest known offices of one owner.
///
/// # Invariants
///
/// - never more than `capacity` entries
/// - never contains the owner
/// - at most one entry per name
/// - a full table only changes when a strictly closer candidate arrives
#[derive(Debug, Clone)]
pub struct NeighborTable {
    owner: String,
    owner_location: Location,
    capacity: usize,
    entries: Vec<NeighborEntry>,
}

impl NeighborTable {
    /// Create an empty table for `owner` located at `owner_location`.
    pub fn new(owner: impl Into<String>, owner_location: Location, capacity: usize) -> Self {
        Self {
            owner: owner.into(),
            owner_location,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Members in insertion order; a replacement takes the evicted slot.
    pub fn entries(&self) -> &[NeighborEntry] {
        &self.entries
    }

    /// Offer a candidate office.
    ///
    /// When several members tie for farthest, the one with the greatest name
    /// is the eviction victim so the outcome does not depend on insertion order.
    pub fn consider(&mut self, name: &str, location: Location) -> TableChange {
        if name == self.owner {
            return TableChange::Unchanged(UnchangedReason::SelfEntry);
        }
        if self.contains(name) {
            return TableChange::Unchanged(UnchangedReason::AlreadyPresent);
        }

        let distance = self.owner_location.distance_to(&location);
        let candidate = NeighborEntry::new(name, distance, location);

        if !self.is_full() {
            self.entries.push(candidate);
            return TableChange::Inserted;
        }

        match self.farthest_index() {
            Some(index) if distance < self.entries[index].distance => {
                let evicted = std::mem::replace(&mut self.entries[index], candidate);
                TableChange::Replaced {
                    evicted: evicted.name,
                }
            }
            _ => TableChange::Unchanged(UnchangedReason::NotCloser),
        }
    }

    /// Drop `name` if present.
    pub fn remove(&mut self, name: &str) -> Option<NeighborEntry> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|pos| self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current eviction victim.
    pub fn farthest(&self) -> Option<&NeighborEntry> {
        self.farthest_index().map(|i| &self.entries[i])
    }

    /// Snapshot of name to distance from the owner.
    pub fn distances(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.distance))
            .collect()
    }

    /// Snapshot of name to location.
    pub fn locations(&self) -> BTreeMap<String, Location> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.location))
            .collect()
    }

    fn farthest_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.distance
                    .total_cmp(&b.distance)
                    .then_with(|| a.name.cmp(&b.name))
            })
            .map(|(i, _)| i)
    }
}
