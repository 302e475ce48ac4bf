//! Domain Errors for Office Routing
//!
//! - `DirectoryError::AlreadyBound`: name collision at startup, fatal
//! - `DirectoryError::NotBound`: stale next hop, pruned and re-decided once
//! - `RemoteError`: a resolved peer failed mid-call, package becomes LOST
//!
//! Listener failures (`ListenerError`) never reach this layer.

use shared_types::InvalidLocation;
use thiserror::Error;

/// Errors from the name directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Another office already holds this name.
    #[error("Name {name} is already bound")]
    AlreadyBound { name: String },

    /// No office is bound under this name.
    #[error("Name {name} is not bound")]
    NotBound { name: String },

    /// The directory itself could not be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a call to a remote office (transport failure).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The office did not answer.
    #[error("Office {peer} is unreachable")]
    Unreachable { peer: String },
}

/// Errors surfaced by office startup and administration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OfficeError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocation),
}
