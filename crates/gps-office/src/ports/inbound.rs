//! # Driving Port (Office RPC surface)
//!
//! Every office, local or behind a link, is reached through `OfficeRef`.
//! All calls are fallible: a handle may point at an office that has crashed
//! or whose link is down.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::Lease;
use shared_types::{EventListener, Location, Package, TrackingNumber};

use crate::domain::RemoteError;

/// Remote capability of one office.
#[async_trait]
pub trait OfficeRef: Send + Sync {
    async fn name(&self) -> Result<String, RemoteError>;

    async fn location(&self) -> Result<Location, RemoteError>;

    /// Detached copy of the office's neighbor distances.
    async fn neighbor_table(&self) -> Result<BTreeMap<String, f64>, RemoteError>;

    /// Detached copy of the office's neighbor locations.
    async fn neighbor_locations(&self) -> Result<BTreeMap<String, Location>, RemoteError>;

    /// Offer `peer` as a neighbor candidate.
    ///
    /// Fails when either this office or the peer cannot be reached.
    async fn consider_peer(&self, peer: Arc<dyn OfficeRef>) -> Result<(), RemoteError>;

    /// Empty the office's neighbor table.
    async fn reset_neighbors(&self) -> Result<(), RemoteError>;

    /// Issue a tracking number, unique among this office's numbers.
    async fn issue_tracking_number(&self) -> Result<TrackingNumber, RemoteError>;

    /// Accept custody of `package`.
    ///
    /// Returns once ARRIVED has been emitted; forwarding continues in the
    /// background. `listener` receives every event about this package.
    async fn accept_package(
        &self,
        package: Package,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), RemoteError>;

    /// Register an event listener for everything this office emits.
    async fn subscribe(&self, listener: Arc<dyn EventListener>) -> Result<Lease, RemoteError>;
}
