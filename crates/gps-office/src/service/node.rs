//! Office node state and lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use shared_bus::EventNotifier;
use shared_types::{Location, TrackingNumber};
use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::{NeighborEntry, NeighborTable, OfficeConfig, OfficeError};
use crate::ports::{Directory, OfficeRef, TimeSource};

/// Point-in-time counters of one office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeStats {
    pub name: String,
    pub neighbor_count: usize,
    pub in_flight: usize,
    pub events_published: u64,
    pub subscriber_count: usize,
}

/// One autonomous office.
///
/// Always lives behind an `Arc`; forwarding tasks hold their own strong
/// reference for as long as a package is in custody.
pub struct OfficeNode {
    pub(crate) name: String,
    pub(crate) location: Location,
    pub(crate) config: OfficeConfig,
    pub(crate) table: Mutex<NeighborTable>,
    pub(crate) notifier: Arc<EventNotifier>,
    pub(crate) directory: Arc<dyn Directory>,
    pub(crate) time_source: Box<dyn TimeSource>,
    /// Highest tracking number issued so far.
    pub(crate) last_tracking_number: Mutex<u64>,
    /// Custody count per package; a package handed back to this office is counted twice.
    pub(crate) in_flight: Mutex<HashMap<TrackingNumber, usize>>,
    pub(crate) me: Weak<OfficeNode>,
}

impl OfficeNode {
    /// Create an unregistered office.
    pub fn new(
        name: impl Into<String>,
        location: Location,
        config: OfficeConfig,
        directory: Arc<dyn Directory>,
        time_source: Box<dyn TimeSource>,
    ) -> Arc<Self> {
        let name = name.into();
        Arc::new_cyclic(|me| Self {
            table: Mutex::new(NeighborTable::new(
                name.clone(),
                location,
                config.neighbor_capacity(),
            )),
            notifier: Arc::new(EventNotifier::new(name.clone(), config.notifier_config())),
            name,
            location,
            config,
            directory,
            time_source,
            last_tracking_number: Mutex::new(0),
            in_flight: Mutex::new(HashMap::new()),
            me: me.clone(),
        })
    }

    /// Create an office and bind it in the directory under its own name.
    ///
    /// Fails with `DirectoryError::AlreadyBound` when the name is taken.
    pub async fn launch(
        name: impl Into<String>,
        location: Location,
        config: OfficeConfig,
        directory: Arc<dyn Directory>,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Arc<Self>, OfficeError> {
        let node = Self::new(name, location, config, directory, time_source);
        node.register(node.handle()).await?;
        Ok(node)
    }

    /// Bind `handle` under this office's name.
    ///
    /// `handle` is what peers will receive from lookups, e.g. a link
    /// wrapping this node.
    pub async fn register(&self, handle: Arc<dyn OfficeRef>) -> Result<(), OfficeError> {
        self.directory.bind(&self.name, handle).await?;
        info!(office = %self.name, location = %self.location, "Office registered");
        Ok(())
    }

    /// This node as an RPC capability, without any link in between.
    pub fn handle(self: &Arc<Self>) -> Arc<dyn OfficeRef> {
        Arc::clone(self) as Arc<dyn OfficeRef>
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Arc<EventNotifier> {
        &self.notifier
    }

    /// Snapshot of the current neighbor table.
    pub fn neighbors(&self) -> Vec<NeighborEntry> {
        self.table.lock().entries().to_vec()
    }

    pub fn stats(&self) -> OfficeStats {
        OfficeStats {
            name: self.name.clone(),
            neighbor_count: self.table.lock().len(),
            in_flight: self.in_flight.lock().values().sum(),
            events_published: self.notifier.events_published(),
            subscriber_count: self.notifier.subscriber_count(),
        }
    }

    /// Start the periodic purge of expired subscriber leases.
    pub fn spawn_lease_sweeper(&self) -> JoinHandle<()> {
        self.notifier.spawn_sweeper(self.config.lease_sweep_interval())
    }

    /// Next tracking number: the current millisecond clock, bumped past the
    /// previous number when the clock has not advanced.
    pub(crate) fn next_tracking_number(&self) -> TrackingNumber {
        let mut last = self.last_tracking_number.lock();
        let issued = self.time_source.now_millis().max(last.saturating_add(1));
        *last = issued;
        TrackingNumber(issued)
    }

    pub(crate) fn admit(&self, tracking_number: TrackingNumber) {
        *self.in_flight.lock().entry(tracking_number).or_insert(0) += 1;
    }

    pub(crate) fn release(&self, tracking_number: TrackingNumber) {
        let mut in_flight = self.in_flight.lock();
        if let Some(count) = in_flight.get_mut(&tracking_number) {
            *count -= 1;
            if *count == 0 {
                in_flight.remove(&tracking_number);
            }
        }
    }
}
