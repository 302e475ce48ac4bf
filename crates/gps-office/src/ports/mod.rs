//! Ports Layer - Hexagonal Architecture Interfaces
//!
//! - **Inbound (Driving)**: `OfficeRef`, the remote capability of an office
//! - **Outbound (Driven)**: `Directory` and `TimeSource`, required by the node
//! - **Membership**: bind/unbind notifications published by a directory

pub mod inbound;
pub mod membership;
pub mod outbound;

pub use inbound::OfficeRef;
pub use membership::*;
pub use outbound::{Directory, TimeSource};
