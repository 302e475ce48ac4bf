//! # Package Lifecycle Events
//!
//! Events emitted by an office for every package it handles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::Package;

/// Lifecycle stage reported by an office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// The package was accepted by the office.
    Arrived,
    /// The package left the office toward a neighbor.
    Departed,
    /// The office is the closest known point to the destination.
    Delivered,
    /// The next hop failed and the package cannot be recovered.
    Lost,
}

impl EventKind {
    /// Whether no further events follow for the package.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Lost)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrived => write!(f, "ARRIVED"),
            Self::Departed => write!(f, "DEPARTED"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Lost => write!(f, "LOST"),
        }
    }
}

/// A lifecycle transition published by one office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEvent {
    /// Office that emitted the event.
    pub office: String,
    /// The package the event refers to.
    pub package: Package,
    pub kind: EventKind,
    /// Publisher-local sequence number, strictly increasing per office.
    pub sequence: u64,
}

impl NodeEvent {
    pub fn new(office: impl Into<String>, package: Package, kind: EventKind, sequence: u64) -> Self {
        Self {
            office: office.into(),
            package,
            kind,
            sequence,
        }
    }
}

impl fmt::Display for NodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number = self.package.tracking_number();
        match self.kind {
            EventKind::Arrived => {
                write!(f, "Package number {} arrived at {} office", number, self.office)
            }
            EventKind::Departed => {
                write!(f, "Package number {} departed from {} office", number, self.office)
            }
            EventKind::Delivered => write!(
                f,
                "Package number {} delivered from {} office to {}",
                number,
                self.office,
                self.package.destination()
            ),
            EventKind::Lost => {
                write!(f, "Package number {} lost by {} office", number, self.office)
            }
        }
    }
}
