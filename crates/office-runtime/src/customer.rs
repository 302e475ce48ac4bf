//! Origin client.
//!
//! A customer walks into an office, gets a tracking number, hands over the
//! package and then waits for DELIVERED or LOST.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gps_office::{Directory, DirectoryError, RemoteError};
use shared_types::{
    EventKind, EventListener, ListenerError, Location, NodeEvent, Package, TrackingNumber,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("No terminal event for package {tracking_number} within {waited:?}")]
    Timeout {
        tracking_number: TrackingNumber,
        waited: Duration,
    },
}

/// What happened to one package.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub package: Package,
    /// `Delivered` or `Lost`.
    pub outcome: EventKind,
    /// Every event reported for the package, in arrival order.
    pub events: Vec<NodeEvent>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> bool {
        self.outcome == EventKind::Delivered
    }

    /// Office holding the package when it reached its terminal state.
    pub fn final_office(&self) -> Option<&str> {
        self.events.last().map(|e| e.office.as_str())
    }
}

struct PackageWatcher {
    events: mpsc::UnboundedSender<NodeEvent>,
}

#[async_trait]
impl EventListener for PackageWatcher {
    async fn report(&self, event: NodeEvent) -> Result<(), ListenerError> {
        self.events
            .send(event)
            .map_err(|_| ListenerError::Unreachable)
    }
}

#[derive(Clone)]
pub struct Customer {
    directory: Arc<dyn Directory>,
    patience: Duration,
}

impl Customer {
    /// Customer resolving offices through `directory`, giving up on a
    /// package after `patience`.
    pub fn new(directory: Arc<dyn Directory>, patience: Duration) -> Self {
        Self {
            directory,
            patience,
        }
    }

    /// Send a package from `origin` to `destination` and wait for its fate.
    pub async fn send(
        &self,
        origin: &str,
        destination: Location,
    ) -> Result<DeliveryReport, CustomerError> {
        let office = self.directory.lookup(origin).await?;
        let tracking_number = office.issue_tracking_number().await?;
        let package = Package::new(tracking_number, destination, origin);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let watcher = Arc::new(PackageWatcher { events: tx });

        info!(%tracking_number, origin, %destination, "Sending package");
        office.accept_package(package.clone(), watcher).await?;

        let mut events = Vec::new();
        let waited = tokio::time::timeout(self.patience, async {
            while let Some(event) = rx.recv().await {
                debug!(%tracking_number, "{event}");
                let terminal = event.kind.is_terminal();
                events.push(event);
                if terminal {
                    break;
                }
            }
        })
        .await;

        let outcome = match (waited, events.last()) {
            (Ok(()), Some(last)) if last.kind.is_terminal() => last.kind,
            _ => {
                return Err(CustomerError::Timeout {
                    tracking_number,
                    waited: self.patience,
                })
            }
        };

        Ok(DeliveryReport {
            package,
            outcome,
            events,
        })
    }
}
