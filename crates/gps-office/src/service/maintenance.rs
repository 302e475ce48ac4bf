//! Neighbor table upkeep: refresh from the directory and rebuild after failures.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::node::OfficeNode;
use crate::domain::{RemoteError, TableChange, UnchangedReason};
use crate::ports::OfficeRef;

impl OfficeNode {
    /// Offer a remote office to this office's table.
    pub(crate) async fn consider_remote(
        &self,
        peer: &Arc<dyn OfficeRef>,
    ) -> Result<TableChange, RemoteError> {
        let name = peer.name().await?;
        if name == self.name {
            return Ok(TableChange::Unchanged(UnchangedReason::SelfEntry));
        }
        let location = peer.location().await?;

        let change = self.table.lock().consider(&name, location);
        if change.is_change() {
            debug!(office = %self.name, peer = %name, ?change, "Neighbor table updated");
        }
        Ok(change)
    }

    /// Offer every office currently bound in the directory.
    ///
    /// Unreachable or vanished peers are skipped. Returns how many peers
    /// answered.
    pub async fn refresh_neighbors(&self) -> usize {
        let names = match self.directory.list().await {
            Ok(names) => names,
            Err(error) => {
                warn!(office = %self.name, %error, "Directory listing failed");
                return 0;
            }
        };

        let mut answered = 0;
        for name in names.iter().filter(|n| **n != self.name) {
            let peer = match self.directory.lookup(name).await {
                Ok(peer) => peer,
                Err(error) => {
                    debug!(office = %self.name, peer = %name, %error, "Peer vanished");
                    continue;
                }
            };
            match self.consider_remote(&peer).await {
                Ok(_) => answered += 1,
                Err(error) => {
                    debug!(office = %self.name, peer = %name, %error, "Skipping unreachable peer")
                }
            }
        }
        answered
    }

    /// Rebuild neighbor tables after `excluding` failed a hand-off.
    ///
    /// Clears this office's table, resets every other reachable office, then
    /// introduces all survivors to each other. Best-effort: offices that do
    /// not answer are left out. Returns the number of introductions that
    /// failed.
    pub async fn recompute(&self, excluding: &str) -> usize {
        self.table.lock().clear();

        let names = match self.directory.list().await {
            Ok(names) => names,
            Err(error) => {
                warn!(office = %self.name, %error, "Recompute aborted, directory unavailable");
                return 0;
            }
        };

        let Some(me) = self.me.upgrade() else {
            return 0;
        };
        let me: Arc<dyn OfficeRef> = me;
        let mut members = vec![me];

        for name in names
            .iter()
            .filter(|n| n.as_str() != excluding && **n != self.name)
        {
            let Ok(peer) = self.directory.lookup(name).await else {
                continue;
            };
            if let Err(error) = peer.reset_neighbors().await {
                debug!(office = %self.name, peer = %name, %error, "Peer left out of recompute");
                continue;
            }
            members.push(peer);
        }

        let mut failed = 0;
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                for (to, peer) in [(a, b), (b, a)] {
                    if let Err(error) = to.consider_peer(Arc::clone(peer)).await {
                        debug!(office = %self.name, %error, "Introduction skipped during recompute");
                        failed += 1;
                    }
                }
            }
        }

        info!(
            office = %self.name,
            excluded = %excluding,
            members = members.len(),
            failed,
            "Neighbor tables recomputed"
        );
        failed
    }
}
