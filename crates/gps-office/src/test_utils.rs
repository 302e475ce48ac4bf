//! Test utilities for office routing.
//!
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use gps_office::test_utils::FixedTimeSource;
//! use gps_office::TimeSource;
//!
//! let time_source = FixedTimeSource::new(1000);
//! assert_eq!(time_source.now_millis(), 1000);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{EventKind, EventListener, ListenerError, NodeEvent, TrackingNumber};
use tokio::sync::watch;

use crate::ports::TimeSource;

/// A time source that never advances.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    millis: u64,
}

impl FixedTimeSource {
    pub fn new(millis: u64) -> Self {
        Self { millis }
    }
}

impl TimeSource for FixedTimeSource {
    fn now_millis(&self) -> u64 {
        self.millis
    }
}

/// Listener that records every event it is given.
pub struct RecordingListener {
    events: Mutex<Vec<NodeEvent>>,
    received: watch::Sender<usize>,
}

impl RecordingListener {
    pub fn new() -> Self {
        let (received, _) = watch::channel(0);
        Self {
            events: Mutex::new(Vec::new()),
            received,
        }
    }

    /// Everything received so far, in arrival order.
    pub fn events(&self) -> Vec<NodeEvent> {
        self.events.lock().clone()
    }

    /// `(office, kind)` pairs for one package, in arrival order.
    pub fn trace_of(&self, tracking_number: TrackingNumber) -> Vec<(String, EventKind)> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.package.tracking_number() == tracking_number)
            .map(|e| (e.office.clone(), e.kind))
            .collect()
    }

    /// Wait until `done` holds for the recorded events.
    ///
    /// Returns `None` if `timeout` elapses first.
    pub async fn wait_for<F>(&self, timeout: Duration, done: F) -> Option<Vec<NodeEvent>>
    where
        F: Fn(&[NodeEvent]) -> bool,
    {
        let mut changes = self.received.subscribe();
        tokio::time::timeout(timeout, async {
            loop {
                {
                    let events = self.events.lock();
                    if done(events.as_slice()) {
                        return events.clone();
                    }
                }
                if changes.changed().await.is_err() {
                    return self.events();
                }
            }
        })
        .await
        .ok()
    }

    /// Wait for the terminal event of `tracking_number`.
    pub async fn wait_for_terminal(
        &self,
        tracking_number: TrackingNumber,
        timeout: Duration,
    ) -> Option<NodeEvent> {
        let events = self
            .wait_for(timeout, |events| {
                events.iter().any(|e| {
                    e.package.tracking_number() == tracking_number && e.kind.is_terminal()
                })
            })
            .await?;
        events.into_iter().find(|e| {
            e.package.tracking_number() == tracking_number && e.kind.is_terminal()
        })
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventListener for RecordingListener {
    async fn report(&self, event: NodeEvent) -> Result<(), ListenerError> {
        self.events.lock().push(event);
        self.received.send_modify(|count| *count += 1);
        Ok(())
    }
}

/// Listener that rejects every delivery.
#[derive(Debug, Default)]
pub struct FailingListener;

#[async_trait]
impl EventListener for FailingListener {
    async fn report(&self, _event: NodeEvent) -> Result<(), ListenerError> {
        Err(ListenerError::Unreachable)
    }
}
