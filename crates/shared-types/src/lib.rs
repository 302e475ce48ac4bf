//! # Shared Types Crate
//!
//! Value types exchanged between offices, origin clients and monitors.
//!
//! ## Design Principles
//!
//! - **Immutable packages**: a `Package` has no mutators; its identity is
//!   fixed by the origin office at construction.
//! - **Events carry their publisher**: every `NodeEvent` names the office that
//!   emitted it and the publisher-local sequence number.
//! - **Listeners are capabilities**: anything able to receive events
//!   implements `EventListener`; delivery failures are typed, never panics.

pub mod entities;
pub mod errors;
pub mod events;
pub mod listener;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use listener::EventListener;
