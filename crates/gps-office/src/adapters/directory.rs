//! In-memory name directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::DirectoryError;
use crate::ports::{
    Directory, MembershipChange, MembershipEvent, MembershipFilter, MembershipSubscription,
    OfficeRef, OFFICE_OBJECT_TYPE,
};

/// Capacity of the membership broadcast channel.
pub const DEFAULT_MEMBERSHIP_CAPACITY: usize = 256;

/// Process-local directory shared by every office of a simulation.
pub struct InMemoryDirectory {
    bindings: RwLock<BTreeMap<String, Arc<dyn OfficeRef>>>,
    membership: broadcast::Sender<MembershipEvent>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        let (membership, _) = broadcast::channel(DEFAULT_MEMBERSHIP_CAPACITY);
        Self {
            bindings: RwLock::new(BTreeMap::new()),
            membership,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    fn announce(&self, name: &str, change: MembershipChange) {
        let event = MembershipEvent {
            name: name.to_string(),
            object_type: OFFICE_OBJECT_TYPE.to_string(),
            change,
        };
        // No receivers is fine
        let _ = self.membership.send(event);
        debug!(name, ?change, "Directory membership changed");
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn bind(&self, name: &str, office: Arc<dyn OfficeRef>) -> Result<(), DirectoryError> {
        {
            let mut bindings = self.bindings.write();
            if bindings.contains_key(name) {
                return Err(DirectoryError::AlreadyBound {
                    name: name.to_string(),
                });
            }
            bindings.insert(name.to_string(), office);
        }
        self.announce(name, MembershipChange::Bound);
        Ok(())
    }

    async fn unbind(&self, name: &str) -> Result<(), DirectoryError> {
        if self.bindings.write().remove(name).is_none() {
            return Err(DirectoryError::NotBound {
                name: name.to_string(),
            });
        }
        self.announce(name, MembershipChange::Unbound);
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Arc<dyn OfficeRef>, DirectoryError> {
        self.bindings
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DirectoryError::NotBound {
                name: name.to_string(),
            })
    }

    async fn list(&self) -> Result<Vec<String>, DirectoryError> {
        Ok(self.bindings.read().keys().cloned().collect())
    }

    fn subscribe_membership(&self, filter: MembershipFilter) -> MembershipSubscription {
        MembershipSubscription::new(self.membership.subscribe(), filter)
    }
}
