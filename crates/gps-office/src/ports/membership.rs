//! Directory membership notifications.

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Object type under which offices register.
pub const OFFICE_OBJECT_TYPE: &str = "office";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Bound,
    Unbound,
}

/// One bind or unbind in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipEvent {
    pub name: String,
    pub object_type: String,
    pub change: MembershipChange,
}

/// Which membership events a subscriber wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipFilter {
    /// Only events for this object type (`None` = all types).
    pub object_type: Option<String>,
    /// Skip unbind notifications.
    pub bound_only: bool,
}

impl MembershipFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Newly bound offices only.
    pub fn offices_bound() -> Self {
        Self {
            object_type: Some(OFFICE_OBJECT_TYPE.to_string()),
            bound_only: true,
        }
    }

    pub fn matches(&self, event: &MembershipEvent) -> bool {
        if self.bound_only && event.change != MembershipChange::Bound {
            return false;
        }
        match &self.object_type {
            Some(object_type) => *object_type == event.object_type,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum SubscriptionError {
    /// The directory stopped publishing.
    #[error("Membership stream closed")]
    Closed,
}

/// Receiving end of a membership stream.
pub struct MembershipSubscription {
    receiver: broadcast::Receiver<MembershipEvent>,
    filter: MembershipFilter,
}

impl MembershipSubscription {
    pub fn new(receiver: broadcast::Receiver<MembershipEvent>, filter: MembershipFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next matching event, or `None` once the directory is gone.
    pub async fn recv(&mut self) -> Option<MembershipEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Membership subscriber lagged, events dropped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Non-blocking variant of `recv`.
    pub fn try_recv(&mut self) -> Result<Option<MembershipEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    #[must_use]
    pub fn filter(&self) -> &MembershipFilter {
        &self.filter
    }
}
