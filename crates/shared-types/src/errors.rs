//! # Error Types
//!
//! Errors shared by every crate that handles packages and events.

use thiserror::Error;

/// A coordinate pair that cannot be placed on the routing plane.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Invalid location: ({x}, {y}) is not a finite coordinate pair")]
pub struct InvalidLocation {
    pub x: f64,
    pub y: f64,
}

/// Failure to hand an event to a listener.
///
/// Publishers swallow these; they never reach the forwarding protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// The listener cannot be reached any more.
    #[error("Listener unreachable")]
    Unreachable,

    /// The listener did not answer within the delivery timeout.
    #[error("Listener timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The listener refused the event.
    #[error("Listener rejected event: {0}")]
    Rejected(String),
}
