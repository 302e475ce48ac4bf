//! # Event Notifier
//!
//! The publishing side of an office's event stream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::{EventKind, EventListener, ListenerError, NodeEvent, Package};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::NotifierConfig;
use crate::subscriber::{lease_expiry, Lease, Registry, SubscriberEntry};

/// Per-office event publisher with lease-bound subscribers.
pub struct EventNotifier {
    /// Office name stamped on every event.
    publisher: String,

    config: NotifierConfig,

    /// Last sequence number handed out.
    sequence: AtomicU64,

    /// Active subscriptions by lease id.
    registry: Registry,
}

impl EventNotifier {
    #[must_use]
    pub fn new(publisher: impl Into<String>, config: NotifierConfig) -> Self {
        Self {
            publisher: publisher.into(),
            config,
            sequence: AtomicU64::new(0),
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Register a listener and grant it a fresh lease.
    pub fn subscribe(&self, listener: Arc<dyn EventListener>) -> Lease {
        let id = Uuid::new_v4();
        let entry = SubscriberEntry {
            listener,
            expires_at: lease_expiry(Instant::now(), self.config.lease_duration),
            failures: 0,
        };
        self.registry.lock().insert(id, entry);

        debug!(publisher = %self.publisher, lease = %id, "New subscription created");
        Lease::new(id, self.config.lease_duration, &self.registry)
    }

    /// Number of subscriptions whose lease has not run out.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let now = Instant::now();
        self.registry
            .lock()
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    /// Total events published so far.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Drop every subscription whose lease has expired.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut subscribers = self.registry.lock();
        let before = subscribers.len();
        subscribers.retain(|_, entry| entry.is_live(now));
        let removed = before - subscribers.len();

        if removed > 0 {
            debug!(publisher = %self.publisher, removed, "Purged expired leases");
        }
        removed
    }

    /// Publish one lifecycle event to every live subscriber.
    ///
    /// Delivery happens in place, one subscriber at a time, so a subscriber
    /// sees events from this office in publish order. Listener failures are
    /// swallowed; the returned event is what was (or would have been) sent.
    pub async fn publish(&self, kind: EventKind, package: &Package) -> NodeEvent {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let event = NodeEvent::new(self.publisher.clone(), package.clone(), kind, sequence);

        let targets = self.live_subscribers();
        for (id, listener) in targets {
            let delivered = self.deliver(&listener, &event).await;
            self.record_outcome(id, delivered);
        }

        debug!(
            publisher = %self.publisher,
            sequence,
            kind = %kind,
            tracking_number = %package.tracking_number(),
            "Event published"
        );
        event
    }

    /// Hand one event to one listener, bounded by the delivery timeout.
    ///
    /// Returns `false` on any failure. Never propagates the error.
    pub async fn deliver(&self, listener: &Arc<dyn EventListener>, event: &NodeEvent) -> bool {
        let timeout = self.config.delivery_timeout;
        let outcome = match tokio::time::timeout(timeout, listener.report(event.clone())).await {
            Ok(result) => result,
            Err(_) => Err(ListenerError::Timeout {
                millis: timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(()) => true,
            Err(error) => {
                debug!(
                    publisher = %self.publisher,
                    sequence = event.sequence,
                    %error,
                    "Listener delivery failed"
                );
                false
            }
        }
    }

    /// Periodically purge expired leases until the notifier is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let notifier = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(notifier) = notifier.upgrade() else {
                    break;
                };
                notifier.purge_expired();
            }
        })
    }

    /// Snapshot of live listeners; expired entries are purged on the way.
    fn live_subscribers(&self) -> Vec<(Uuid, Arc<dyn EventListener>)> {
        let now = Instant::now();
        let mut subscribers = self.registry.lock();
        subscribers.retain(|_, entry| entry.is_live(now));
        subscribers
            .iter()
            .map(|(id, entry)| (*id, Arc::clone(&entry.listener)))
            .collect()
    }

    fn record_outcome(&self, id: Uuid, delivered: bool) {
        let mut subscribers = self.registry.lock();
        let Some(entry) = subscribers.get_mut(&id) else {
            return;
        };

        if delivered {
            entry.failures = 0;
            return;
        }

        entry.failures += 1;
        if entry.failures >= self.config.max_delivery_failures {
            subscribers.remove(&id);
            warn!(
                publisher = %self.publisher,
                lease = %id,
                "Subscriber dropped after repeated delivery failures"
            );
        }
    }
}
