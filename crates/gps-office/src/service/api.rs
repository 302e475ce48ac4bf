//! `OfficeRef` implementation for a local node.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::Lease;
use shared_types::{EventListener, Location, Package, TrackingNumber};

use super::node::OfficeNode;
use crate::domain::RemoteError;
use crate::ports::OfficeRef;

#[async_trait]
impl OfficeRef for OfficeNode {
    async fn name(&self) -> Result<String, RemoteError> {
        Ok(self.name.clone())
    }

    async fn location(&self) -> Result<Location, RemoteError> {
        Ok(self.location)
    }

    async fn neighbor_table(&self) -> Result<BTreeMap<String, f64>, RemoteError> {
        Ok(self.table.lock().distances())
    }

    async fn neighbor_locations(&self) -> Result<BTreeMap<String, Location>, RemoteError> {
        Ok(self.table.lock().locations())
    }

    async fn consider_peer(&self, peer: Arc<dyn OfficeRef>) -> Result<(), RemoteError> {
        self.consider_remote(&peer).await.map(|_| ())
    }

    async fn reset_neighbors(&self) -> Result<(), RemoteError> {
        self.table.lock().clear();
        Ok(())
    }

    async fn issue_tracking_number(&self) -> Result<TrackingNumber, RemoteError> {
        Ok(self.next_tracking_number())
    }

    async fn accept_package(
        &self,
        package: Package,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), RemoteError> {
        let node = self.me.upgrade().ok_or_else(|| RemoteError::Unreachable {
            peer: self.name.clone(),
        })?;
        node.accept(package, listener).await;
        Ok(())
    }

    async fn subscribe(&self, listener: Arc<dyn EventListener>) -> Result<Lease, RemoteError> {
        Ok(self.notifier.subscribe(listener))
    }
}
