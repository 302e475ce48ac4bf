//! Simulated RPC link with fault injection.
//!
//! A `SimulatedLink` stands between a caller and an office. While healthy it
//! forwards every call; a fault makes calls fail the way a crashed office or
//! a broken connection would.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::Lease;
use shared_types::{EventListener, Location, Package, TrackingNumber};
use tracing::trace;

use crate::domain::RemoteError;
use crate::ports::OfficeRef;

/// Failure mode of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkFault {
    #[default]
    None,
    /// Every call fails.
    Severed,
    /// Only package hand-offs fail; the office still answers queries.
    DropPackages,
}

pub struct SimulatedLink {
    peer: String,
    target: Arc<dyn OfficeRef>,
    fault: RwLock<LinkFault>,
    latency: Duration,
}

impl SimulatedLink {
    /// Healthy link to `target`, known to callers as `peer`.
    pub fn new(peer: impl Into<String>, target: Arc<dyn OfficeRef>) -> Self {
        Self {
            peer: peer.into(),
            target,
            fault: RwLock::new(LinkFault::None),
            latency: Duration::ZERO,
        }
    }

    /// Delay every successful call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn fault(&self) -> LinkFault {
        *self.fault.read()
    }

    pub fn set_fault(&self, fault: LinkFault) {
        *self.fault.write() = fault;
    }

    pub fn sever(&self) {
        self.set_fault(LinkFault::Severed);
    }

    pub fn restore(&self) {
        self.set_fault(LinkFault::None);
    }

    async fn pass(&self, call: &'static str) -> Result<(), RemoteError> {
        let blocked = match self.fault() {
            LinkFault::None => false,
            LinkFault::Severed => true,
            LinkFault::DropPackages => call == "accept_package",
        };
        if blocked {
            trace!(peer = %self.peer, call, "Call dropped by link");
            return Err(RemoteError::Unreachable {
                peer: self.peer.clone(),
            });
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }
}

#[async_trait]
impl OfficeRef for SimulatedLink {
    async fn name(&self) -> Result<String, RemoteError> {
        self.pass("name").await?;
        self.target.name().await
    }

    async fn location(&self) -> Result<Location, RemoteError> {
        self.pass("location").await?;
        self.target.location().await
    }

    async fn neighbor_table(&self) -> Result<BTreeMap<String, f64>, RemoteError> {
        self.pass("neighbor_table").await?;
        self.target.neighbor_table().await
    }

    async fn neighbor_locations(&self) -> Result<BTreeMap<String, Location>, RemoteError> {
        self.pass("neighbor_locations").await?;
        self.target.neighbor_locations().await
    }

    async fn consider_peer(&self, peer: Arc<dyn OfficeRef>) -> Result<(), RemoteError> {
        self.pass("consider_peer").await?;
        self.target.consider_peer(peer).await
    }

    async fn reset_neighbors(&self) -> Result<(), RemoteError> {
        self.pass("reset_neighbors").await?;
        self.target.reset_neighbors().await
    }

    async fn issue_tracking_number(&self) -> Result<TrackingNumber, RemoteError> {
        self.pass("issue_tracking_number").await?;
        self.target.issue_tracking_number().await
    }

    async fn accept_package(
        &self,
        package: Package,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), RemoteError> {
        self.pass("accept_package").await?;
        self.target.accept_package(package, listener).await
    }

    async fn subscribe(&self, listener: Arc<dyn EventListener>) -> Result<Lease, RemoteError> {
        self.pass("subscribe").await?;
        self.target.subscribe(listener).await
    }
}
