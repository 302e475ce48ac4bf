//! Table members and the outcome of offering a candidate.

use shared_types::Location;

/// One member of a neighbor table.
///
/// `distance` is measured from the table owner and cached at insertion;
/// offices never move.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborEntry {
    pub name: String,
    pub distance: f64,
    pub location: Location,
}

impl NeighborEntry {
    pub fn new(name: impl Into<String>, distance: f64, location: Location) -> Self {
        Self {
            name: name.into(),
            distance,
            location,
        }
    }
}

/// What `NeighborTable::consider` did with a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableChange {
    /// Candidate took a free slot.
    Inserted,
    /// Candidate displaced the farthest member.
    Replaced { evicted: String },
    /// Table left untouched.
    Unchanged(UnchangedReason),
}

impl TableChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, TableChange::Unchanged(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// The owner never lists itself.
    SelfEntry,
    /// Name already present; the table is idempotent per name.
    AlreadyPresent,
    /// Table full and the candidate is not strictly closer than the farthest member.
    NotCloser,
}
