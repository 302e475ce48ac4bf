//! # Headquarters Monitor
//!
//! Subscribes to every office, including offices bound after startup, and
//! keeps the leases alive by renewing them at half their duration.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gps_office::{Directory, Lease, MembershipFilter};
use parking_lot::Mutex;
use shared_types::{EventListener, ListenerError, NodeEvent};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints every event on stdout, one line each.
#[derive(Debug, Default)]
pub struct ConsoleListener {
    format: OutputFormat,
}

impl ConsoleListener {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, event: &NodeEvent) -> Result<String, ListenerError> {
        match self.format {
            OutputFormat::Text => Ok(event.to_string()),
            OutputFormat::Json => {
                serde_json::to_string(event).map_err(|e| ListenerError::Rejected(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl EventListener for ConsoleListener {
    async fn report(&self, event: NodeEvent) -> Result<(), ListenerError> {
        println!("{}", self.render(&event)?);
        Ok(())
    }
}

type Leases = Arc<Mutex<BTreeMap<String, Lease>>>;

pub struct Headquarters {
    leases: Leases,
    tasks: Vec<JoinHandle<()>>,
}

impl Headquarters {
    /// Watch every office in `directory`, reporting events to `listener`.
    ///
    /// `lease_duration` is the lease length the offices grant; renewals
    /// happen every half of it.
    pub async fn start(
        directory: Arc<dyn Directory>,
        listener: Arc<dyn EventListener>,
        lease_duration: Duration,
    ) -> Self {
        let leases: Leases = Arc::new(Mutex::new(BTreeMap::new()));

        // Subscribe before listing so an office bound in between is not missed
        let mut membership = directory.subscribe_membership(MembershipFilter::offices_bound());

        match directory.list().await {
            Ok(names) => {
                for name in names {
                    watch(&directory, &listener, &leases, &name).await;
                }
            }
            Err(error) => warn!(%error, "Headquarters could not list offices"),
        }

        let joiner = {
            let directory = Arc::clone(&directory);
            let listener = Arc::clone(&listener);
            let leases = Arc::clone(&leases);
            tokio::spawn(async move {
                while let Some(event) = membership.recv().await {
                    watch(&directory, &listener, &leases, &event.name).await;
                }
                debug!("Membership stream closed");
            })
        };

        let renewer = {
            let directory = Arc::clone(&directory);
            let listener = Arc::clone(&listener);
            let leases = Arc::clone(&leases);
            let period = (lease_duration / 2).max(Duration::from_millis(1));
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    renew_all(&directory, &listener, &leases).await;
                }
            })
        };

        info!(offices = leases.lock().len(), "Headquarters watching");
        Self {
            leases,
            tasks: vec![joiner, renewer],
        }
    }

    /// Offices currently watched, sorted.
    pub fn watched(&self) -> Vec<String> {
        self.leases.lock().keys().cloned().collect()
    }

    /// Stop watching and release every lease.
    pub fn stop(self) {
        for task in &self.tasks {
            task.abort();
        }
        for lease in self.leases.lock().values() {
            lease.cancel();
        }
    }
}

/// Subscribe to `name` unless it is already watched. Returns whether a new
/// lease was kept.
async fn watch(
    directory: &Arc<dyn Directory>,
    listener: &Arc<dyn EventListener>,
    leases: &Leases,
    name: &str,
) -> bool {
    if leases.lock().contains_key(name) {
        return false;
    }
    let office = match directory.lookup(name).await {
        Ok(office) => office,
        Err(error) => {
            debug!(office = name, %error, "Office gone before subscription");
            return false;
        }
    };
    let lease = match office.subscribe(Arc::clone(listener)).await {
        Ok(lease) => lease,
        Err(error) => {
            warn!(office = name, %error, "Subscription failed");
            return false;
        }
    };

    // Another watcher may have subscribed while this one was awaiting
    match leases.lock().entry(name.to_string()) {
        Entry::Occupied(_) => {
            debug!(office = name, lease = %lease.id(), "Already watched, dropping extra lease");
            lease.cancel();
            false
        }
        Entry::Vacant(slot) => {
            debug!(office = name, lease = %lease.id(), "Subscribed");
            slot.insert(lease);
            true
        }
    }
}

async fn renew_all(directory: &Arc<dyn Directory>, listener: &Arc<dyn EventListener>, leases: &Leases) {
    let lapsed: Vec<String> = leases
        .lock()
        .iter()
        .filter_map(|(name, lease)| lease.renew().err().map(|_| name.clone()))
        .collect();

    for name in lapsed {
        warn!(office = %name, "Lease lapsed, resubscribing");
        leases.lock().remove(&name);
        watch(directory, listener, leases, &name).await;
    }
}
