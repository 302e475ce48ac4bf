//! In-process mesh of offices.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use gps_office::{
    Directory, DirectoryView, InMemoryDirectory, LinkFault, Location, OfficeConfig, OfficeError,
    OfficeNode, OfficeStats, SimulatedLink, SystemTimeSource,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{FaultSpec, OfficeSpec};

struct Member {
    node: Arc<OfficeNode>,
    link: Arc<SimulatedLink>,
}

/// Offices of one scenario, each reachable only through its simulated link.
pub struct Simulation {
    directory: Arc<InMemoryDirectory>,
    members: BTreeMap<String, Member>,
    tasks: Vec<JoinHandle<()>>,
}

impl Simulation {
    /// Launch every office in `offices`.
    ///
    /// An office with `links` discovers only those offices; duplicate names
    /// fail with `AlreadyBound`.
    pub async fn launch(offices: &[OfficeSpec], config: &OfficeConfig) -> Result<Self, OfficeError> {
        let directory = Arc::new(InMemoryDirectory::new());
        let mut simulation = Self {
            directory,
            members: BTreeMap::new(),
            tasks: Vec::new(),
        };

        for spec in offices {
            simulation.add_office(spec, config).await?;
        }

        info!(offices = simulation.members.len(), "Simulation launched");
        Ok(simulation)
    }

    async fn add_office(&mut self, spec: &OfficeSpec, config: &OfficeConfig) -> Result<(), OfficeError> {
        let location = Location::checked(spec.x, spec.y)?;
        let scoped: Arc<dyn Directory> = match &spec.links {
            Some(links) => Arc::new(DirectoryView::new(
                self.directory.clone(),
                spec.name.as_str(),
                links.iter().cloned(),
            )),
            None => self.directory.clone(),
        };

        let node = OfficeNode::new(
            spec.name.as_str(),
            location,
            config.clone(),
            scoped,
            Box::new(SystemTimeSource::new()),
        );
        let link = Arc::new(SimulatedLink::new(spec.name.as_str(), node.handle()));
        node.register(link.clone()).await?;

        self.tasks.push(node.spawn_lease_sweeper());
        self.members.insert(spec.name.clone(), Member { node, link });
        Ok(())
    }

    /// The shared, unrestricted directory.
    pub fn directory(&self) -> Arc<dyn Directory> {
        self.directory.clone()
    }

    pub fn office(&self, name: &str) -> Option<&Arc<OfficeNode>> {
        self.members.get(name).map(|m| &m.node)
    }

    /// Put `fault` on the link of `office`. Returns false for unknown offices.
    pub fn set_fault(&self, office: &str, fault: LinkFault) -> bool {
        match self.members.get(office) {
            Some(member) => {
                member.link.set_fault(fault);
                warn!(office, ?fault, "Fault injected");
                true
            }
            None => false,
        }
    }

    /// Arm `faults`: immediate ones now, delayed ones on timers.
    pub fn schedule_faults(&mut self, faults: &[FaultSpec]) {
        for fault in faults {
            if fault.after_ms == 0 {
                self.set_fault(&fault.office, fault.kind.into());
                continue;
            }
            let Some(member) = self.members.get(&fault.office) else {
                continue;
            };
            let link = Arc::clone(&member.link);
            let office = fault.office.clone();
            let kind = LinkFault::from(fault.kind);
            let delay = Duration::from_millis(fault.after_ms);
            self.tasks.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                link.set_fault(kind);
                warn!(office = %office, fault = ?kind, "Fault injected");
            }));
        }
    }

    /// Stats of every office, sorted by name.
    pub fn stats(&self) -> Vec<OfficeStats> {
        self.members.values().map(|m| m.node.stats()).collect()
    }

    pub fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        info!("Simulation stopped");
    }
}
