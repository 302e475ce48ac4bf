//! Domain Layer - Pure routing logic with no I/O
//!
//! - Neighbor table: bounded k-nearest set with displacement eviction
//! - Forwarding: greedy next-hop choice among self and known neighbors
//! - Office configuration and error taxonomy

pub mod config;
pub mod errors;
pub mod forwarding;
pub mod neighbor_table;

pub use config::*;
pub use errors::*;
pub use forwarding::*;
pub use neighbor_table::*;
