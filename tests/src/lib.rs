//! # GPS Office Test Suite
//!
//! Cross-crate scenarios: offices from `gps-office`, events from
//! `shared-bus`, value types from `shared-types`, all wired through the
//! in-memory directory and simulated links.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs          # Mesh builder shared by every scenario
//! └── integration/
//!     ├── routing_flows.rs       # Multi-hop greedy routes
//!     ├── failure_flows.rs       # Lost packages, stale neighbors, recompute
//!     ├── notification_flows.rs  # Subscribers, leases, membership
//!     └── convergence.rs         # Seeded random topologies
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gps-tests
//! cargo test -p gps-tests integration::failure_flows
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;

#[cfg(test)]
pub(crate) mod support;
