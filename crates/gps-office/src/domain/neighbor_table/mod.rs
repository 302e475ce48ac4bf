//! Neighbor Table Implementation
//!
//! Bounded set of the `k` offices nearest to the owner, maintained online:
//! each candidate either fills a free slot, displaces the current farthest
//! member, or is dropped.

mod entry;
mod table;

pub use entry::{NeighborEntry, TableChange, UnchangedReason};
pub use table::NeighborTable;
