//! # Subscriptions and Leases
//!
//! A subscription lives in the notifier's registry until its lease expires,
//! it is cancelled, or its listener keeps failing. The `Lease` handle held by
//! the subscriber only refers to the registry weakly, so a dropped notifier
//! simply makes every outstanding lease report `Expired`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::EventListener;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::MAX_LEASE_DURATION_SECS;

/// Errors from lease operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaseError {
    /// The lease ran out, was cancelled, or its subscriber was dropped.
    #[error("Lease {id} is no longer active")]
    Expired { id: Uuid },
}

/// One registered listener.
pub(crate) struct SubscriberEntry {
    pub(crate) listener: Arc<dyn EventListener>,
    pub(crate) expires_at: Instant,
    pub(crate) failures: u32,
}

impl SubscriberEntry {
    pub(crate) fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Expiry of a lease granted at `now`, with `duration` clamped to
/// `MAX_LEASE_DURATION_SECS` so the deadline is always representable.
pub(crate) fn lease_expiry(now: Instant, duration: Duration) -> Instant {
    now + duration.min(Duration::from_secs(MAX_LEASE_DURATION_SECS))
}

pub(crate) type Registry = Arc<Mutex<HashMap<Uuid, SubscriberEntry>>>;

/// Handle to a subscription on one office's event stream.
#[derive(Clone)]
pub struct Lease {
    id: Uuid,
    duration: Duration,
    registry: Weak<Mutex<HashMap<Uuid, SubscriberEntry>>>,
}

impl Lease {
    pub(crate) fn new(id: Uuid, duration: Duration, registry: &Registry) -> Self {
        Self {
            id,
            duration,
            registry: Arc::downgrade(registry),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Lifetime granted on each renewal.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current expiry, or `None` once the subscription is gone.
    pub fn expires_at(&self) -> Option<Instant> {
        let registry = self.registry.upgrade()?;
        let subscribers = registry.lock();
        subscribers.get(&self.id).map(|entry| entry.expires_at)
    }

    /// Whether the subscription still receives events.
    pub fn is_active(&self) -> bool {
        self.expires_at()
            .is_some_and(|expires_at| expires_at > Instant::now())
    }

    /// Extend the lease by its full duration from now.
    ///
    /// # Errors
    ///
    /// `LeaseError::Expired` if the lease already ran out or was purged;
    /// an expired lease cannot be revived.
    pub fn renew(&self) -> Result<Instant, LeaseError> {
        let expired = LeaseError::Expired { id: self.id };
        let registry = self.registry.upgrade().ok_or_else(|| expired.clone())?;
        let mut subscribers = registry.lock();
        let now = Instant::now();

        let Some(entry) = subscribers.get_mut(&self.id) else {
            return Err(expired);
        };
        if !entry.is_live(now) {
            subscribers.remove(&self.id);
            return Err(expired);
        }

        entry.expires_at = lease_expiry(now, self.duration);
        debug!(lease = %self.id, "Lease renewed");
        Ok(entry.expires_at)
    }

    /// End the subscription immediately.
    pub fn cancel(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if registry.lock().remove(&self.id).is_some() {
            debug!(lease = %self.id, "Lease cancelled");
        }
    }
}

impl fmt::Debug for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("id", &self.id)
            .field("duration", &self.duration)
            .finish()
    }
}
