//! # GPS Office - Greedy Geographic Package Routing
//!
//! Each office knows only its `k` nearest peers (k = 3 by default) and moves
//! a package one hop at a time toward its destination coordinates, always to
//! whichever known office is closest to the destination. No global path is
//! ever computed; the heuristic can stall on unlucky topologies and that is
//! accepted behaviour.
//!
//! ## Architecture
//!
//! - **Domain Layer:** neighbor table (online top-k by Euclidean distance)
//!   and the forwarding decision. Pure, synchronous, no I/O.
//! - **Ports Layer:** `OfficeRef` (the RPC capability every office exposes)
//!   and the driven ports it needs: `Directory`, `TimeSource`.
//! - **Service Layer:** `OfficeNode`, the forwarding protocol state machine.
//! - **Adapters Layer:** in-memory directory, visibility-restricted directory
//!   view, simulated RPC link with fault injection, system clock, TOML
//!   config loading.
//!
//! ## Example
//!
//! ```rust
//! use gps_office::{next_hop, Location, NeighborTable, NextHop};
//!
//! let mut table = NeighborTable::new("A", Location::new(0.0, 0.0), 3);
//! table.consider("B", Location::new(10.0, 0.0));
//! table.consider("C", Location::new(0.0, 25.0));
//!
//! let hop = next_hop(Location::new(0.0, 0.0), table.entries(), Location::new(9.0, 0.0));
//! assert_eq!(hop, NextHop::Forward("B".to_string()));
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Domain
pub use domain::{
    next_hop, DirectoryError, NeighborEntry, NeighborTable, NextHop, OfficeConfig, OfficeError,
    RemoteError, TableChange, UnchangedReason, ABSENT_NEIGHBOR, DEFAULT_NEIGHBOR_CAPACITY,
};

// Ports
pub use ports::{
    Directory, MembershipChange, MembershipEvent, MembershipFilter, MembershipSubscription,
    OfficeRef, SubscriptionError, TimeSource, OFFICE_OBJECT_TYPE,
};

// Service
pub use service::{OfficeNode, OfficeStats};

// Adapters
pub use adapters::{
    ConfigError, DirectoryView, InMemoryDirectory, LinkFault, SimulatedLink, SystemTimeSource,
    TomlConfigProvider,
};

// Shared value types, re-exported for convenience
pub use shared_bus::{Lease, LeaseError};
pub use shared_types::{
    EventKind, EventListener, ListenerError, Location, NodeEvent, Package, TrackingNumber,
};
