//! Package forwarding protocol.

use std::sync::Arc;

use shared_types::{EventKind, EventListener, NodeEvent, Package};
use tracing::{debug, info, warn};

use super::node::OfficeNode;
use crate::domain::{next_hop, DirectoryError, NextHop};
use crate::ports::OfficeRef;

impl OfficeNode {
    /// Take custody of `package`.
    ///
    /// ARRIVED is emitted before this returns; everything after runs on a
    /// detached task so the sender never waits for the rest of the route.
    pub async fn accept(self: &Arc<Self>, package: Package, listener: Arc<dyn EventListener>) {
        self.admit(package.tracking_number());
        self.emit(EventKind::Arrived, &package, &listener).await;

        let node = Arc::clone(self);
        tokio::spawn(async move { node.forward(package, listener).await });
    }

    async fn forward(self: Arc<Self>, package: Package, listener: Arc<dyn EventListener>) {
        self.refresh_neighbors().await;

        let delay = self.config.settling_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let target = match self.decide(&package) {
            NextHop::Deliver => {
                self.finish(EventKind::Delivered, &package, &listener).await;
                return;
            }
            NextHop::Forward(target) => target,
        };

        self.emit(EventKind::Departed, &package, &listener).await;

        let (target, next) = match self.resolve(&package, target).await {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(
                    office = %self.name,
                    tracking_number = %package.tracking_number(),
                    %error,
                    "Next hop could not be resolved"
                );
                self.finish(EventKind::Lost, &package, &listener).await;
                return;
            }
        };

        match next.accept_package(package.clone(), Arc::clone(&listener)).await {
            Ok(()) => {
                debug!(
                    office = %self.name,
                    tracking_number = %package.tracking_number(),
                    next = %target,
                    "Package handed off"
                );
                self.release(package.tracking_number());
            }
            Err(error) => {
                warn!(
                    office = %self.name,
                    tracking_number = %package.tracking_number(),
                    next = %target,
                    %error,
                    "Hand-off failed"
                );
                self.recompute(&target).await;
                self.finish(EventKind::Lost, &package, &listener).await;
            }
        }
    }

    fn decide(&self, package: &Package) -> NextHop {
        let table = self.table.lock();
        next_hop(self.location, table.entries(), package.destination())
    }

    /// Look up `target`; on `NotBound`, evict it and look up a fresh decision
    /// once. A re-decision to keep the package resolves this office itself.
    async fn resolve(
        &self,
        package: &Package,
        target: String,
    ) -> Result<(String, Arc<dyn OfficeRef>), DirectoryError> {
        match self.directory.lookup(&target).await {
            Ok(next) => return Ok((target, next)),
            Err(DirectoryError::NotBound { .. }) => {}
            Err(other) => return Err(other),
        }

        debug!(office = %self.name, stale = %target, "Evicting unbound neighbor");
        self.table.lock().remove(&target);

        let retry = match self.decide(package) {
            NextHop::Deliver => self.name.clone(),
            NextHop::Forward(name) => name,
        };
        let next = self.directory.lookup(&retry).await?;
        Ok((retry, next))
    }

    /// Publish `kind` to subscribers and to the package's own listener.
    async fn emit(
        &self,
        kind: EventKind,
        package: &Package,
        listener: &Arc<dyn EventListener>,
    ) -> NodeEvent {
        let event = self.notifier.publish(kind, package).await;
        info!(
            office = %self.name,
            tracking_number = %package.tracking_number(),
            sequence = event.sequence,
            "{event}"
        );
        if !self.notifier.deliver(listener, &event).await {
            debug!(
                office = %self.name,
                tracking_number = %package.tracking_number(),
                "Package listener missed {kind}"
            );
        }
        event
    }

    async fn finish(&self, kind: EventKind, package: &Package, listener: &Arc<dyn EventListener>) {
        self.emit(kind, package, listener).await;
        self.release(package.tracking_number());
    }
}
