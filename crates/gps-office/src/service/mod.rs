//! # Office Node Service
//!
//! `OfficeNode` owns one office's neighbor table and event notifier and runs
//! the forwarding protocol for every package it accepts.
//!
//! ```text
//!  accept ─→ ARRIVED ─→ refresh neighbors ─→ settle ─→ decide
//!                                                       │
//!                          ┌────────────────────────────┤
//!                          ▼                            ▼
//!                      DELIVERED               DEPARTED ─→ resolve ─→ hand off
//!                                                            │           │
//!                                                   NotBound twice    transport
//!                                                            │        failure
//!                                                            ▼           ▼
//!                                                          LOST    recompute, LOST
//! ```

mod api;
mod maintenance;
mod node;
mod protocol;

pub use node::{OfficeNode, OfficeStats};
