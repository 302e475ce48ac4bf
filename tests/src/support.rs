//! Mesh builder for scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use gps_office::test_utils::{FixedTimeSource, RecordingListener};
use gps_office::{
    Directory, DirectoryView, InMemoryDirectory, Location, OfficeConfig, OfficeNode, OfficeRef,
    Package, SimulatedLink, TrackingNumber,
};
use shared_types::EventKind;

pub const WAIT: Duration = Duration::from_secs(10);

/// Offices sharing one directory, each bound behind its own link.
pub struct Mesh {
    pub directory: Arc<InMemoryDirectory>,
    pub config: OfficeConfig,
    offices: BTreeMap<String, Arc<OfficeNode>>,
    links: BTreeMap<String, Arc<SimulatedLink>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::with_config(OfficeConfig::for_testing())
    }

    pub fn with_config(config: OfficeConfig) -> Self {
        Self {
            directory: Arc::new(InMemoryDirectory::new()),
            config,
            offices: BTreeMap::new(),
            links: BTreeMap::new(),
        }
    }

    /// Office that discovers every other office.
    pub async fn office(&mut self, name: &str, x: f64, y: f64) -> Arc<OfficeNode> {
        let directory: Arc<dyn Directory> = self.directory.clone();
        self.launch(name, x, y, directory).await
    }

    /// Office that discovers only `links`.
    pub async fn linked_office(&mut self, name: &str, x: f64, y: f64, links: &[&str]) -> Arc<OfficeNode> {
        let view = DirectoryView::new(self.directory.clone(), name, links.iter().copied());
        self.launch(name, x, y, Arc::new(view)).await
    }

    async fn launch(&mut self, name: &str, x: f64, y: f64, directory: Arc<dyn Directory>) -> Arc<OfficeNode> {
        // Distinct clock per office keeps tracking numbers unique across the mesh
        let clock = 1_000_000 * (self.offices.len() as u64 + 1);
        let node = OfficeNode::new(
            name,
            Location::new(x, y),
            self.config.clone(),
            directory,
            Box::new(FixedTimeSource::new(clock)),
        );
        let link = Arc::new(SimulatedLink::new(name, node.handle()));
        node.register(link.clone()).await.unwrap();
        self.offices.insert(name.to_string(), node.clone());
        self.links.insert(name.to_string(), link);
        node
    }

    pub fn node(&self, name: &str) -> &Arc<OfficeNode> {
        &self.offices[name]
    }

    pub fn link(&self, name: &str) -> &Arc<SimulatedLink> {
        &self.links[name]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Arc<OfficeNode>> {
        self.offices.values()
    }

    /// Hand a package to `origin` the way a customer would.
    pub async fn send(&self, origin: &str, x: f64, y: f64) -> (Package, Arc<RecordingListener>) {
        let office = self.directory.lookup(origin).await.unwrap();
        let tracking_number = office.issue_tracking_number().await.unwrap();
        let package = Package::new(tracking_number, Location::new(x, y), origin);
        let listener = Arc::new(RecordingListener::new());
        office
            .accept_package(package.clone(), listener.clone())
            .await
            .unwrap();
        (package, listener)
    }

    /// Send and wait for the terminal event; returns the package's `(office, kind)` trace.
    pub async fn route(&self, origin: &str, x: f64, y: f64) -> Vec<(String, EventKind)> {
        let (package, listener) = self.send(origin, x, y).await;
        listener
            .wait_for_terminal(package.tracking_number(), WAIT)
            .await
            .expect("package never reached a terminal state");
        listener.trace_of(package.tracking_number())
    }
}

/// Offices where the package arrived, in order.
pub fn arrivals(trace: &[(String, EventKind)]) -> Vec<&str> {
    trace
        .iter()
        .filter(|(_, kind)| *kind == EventKind::Arrived)
        .map(|(office, _)| office.as_str())
        .collect()
}

pub fn terminal(trace: &[(String, EventKind)]) -> Option<(&str, EventKind)> {
    trace
        .iter()
        .rev()
        .find(|(_, kind)| kind.is_terminal())
        .map(|(office, kind)| (office.as_str(), *kind))
}
