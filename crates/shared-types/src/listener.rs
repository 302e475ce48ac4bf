//! # Event Listener Capability
//!
//! Anything that wants lifecycle events (origin clients, monitors, tests)
//! implements `EventListener`. The trait is object safe so listeners can be
//! carried across hops as `Arc<dyn EventListener>`.

use async_trait::async_trait;

use crate::errors::ListenerError;
use crate::events::NodeEvent;

#[async_trait]
pub trait EventListener: Send + Sync {
    /// Receive one event.
    ///
    /// An `Err` tells the publisher the delivery failed; the publisher
    /// decides whether to keep the subscription.
    async fn report(&self, event: NodeEvent) -> Result<(), ListenerError>;
}
