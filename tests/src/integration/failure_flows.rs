//! # Failure Flows
//!
//! - Next hop dies after resolution: LOST at the holder, tables recomputed
//! - Next hop unbound: stale entry evicted, decision retried once
//! - Severed office: skipped during discovery, never chosen

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gps_office::{Directory, EventKind, LinkFault, OfficeRef};

    use crate::support::{arrivals, terminal, Mesh, WAIT};

    #[tokio::test]
    async fn test_dead_next_hop_loses_package_at_holder() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        mesh.office("B", 10.0, 0.0).await;
        mesh.office("C", 0.0, 10.0).await;
        mesh.office("D", -10.0, 0.0).await;
        mesh.link("B").set_fault(LinkFault::DropPackages);

        let (package, listener) = mesh.send("A", 9.0, 0.0).await;
        let lost = listener
            .wait_for_terminal(package.tracking_number(), WAIT)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(lost.kind, EventKind::Lost);
        assert_eq!(lost.office, "A");
        assert_eq!(
            lost.to_string(),
            format!("Package number {} lost by A office", package.tracking_number())
        );
        // Nothing follows LOST
        assert_eq!(listener.events().last().map(|e| e.kind), Some(EventKind::Lost));
        assert_eq!(listener.events().len(), 3);
    }

    #[tokio::test]
    async fn test_recompute_drops_failed_office_everywhere() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        mesh.office("B", 10.0, 0.0).await;
        mesh.office("C", 0.0, 10.0).await;
        mesh.office("D", -10.0, 0.0).await;
        // Seed C and D with B before the failure
        mesh.route("C", 10.0, 10.0).await;
        mesh.route("D", 0.0, 0.0).await;
        assert!(mesh.node("C").neighbors().iter().any(|n| n.name == "B"));
        mesh.link("B").set_fault(LinkFault::DropPackages);

        let trace = mesh.route("A", 9.0, 0.0).await;

        assert_eq!(terminal(&trace), Some(("A", EventKind::Lost)));
        for name in ["A", "C", "D"] {
            let table = mesh.node(name).handle().neighbor_table().await.unwrap();
            assert!(!table.contains_key("B"), "{name} still lists B: {table:?}");
        }
        let a_table = mesh.node("A").handle().neighbor_table().await.unwrap();
        assert_eq!(a_table.keys().collect::<Vec<_>>(), vec!["C", "D"]);
    }

    #[tokio::test]
    async fn test_unbound_office_is_routed_around() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        mesh.office("B", 10.0, 0.0).await;
        mesh.office("C", 8.0, 3.0).await;
        // First package fills A's table with B and C
        mesh.route("A", 0.0, 0.0).await;
        mesh.directory.unbind("B").await.unwrap();

        let trace = mesh.route("A", 10.0, 0.0).await;

        assert_eq!(arrivals(&trace), vec!["A", "C"]);
        assert_eq!(terminal(&trace), Some(("C", EventKind::Delivered)));
        assert!(!mesh.node("A").neighbors().iter().any(|n| n.name == "B"));
    }

    #[tokio::test]
    async fn test_severed_office_is_never_chosen() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        mesh.office("B", 10.0, 0.0).await;
        mesh.office("C", 7.0, 0.0).await;
        mesh.link("B").sever();

        let trace = mesh.route("A", 10.0, 0.0).await;

        assert_eq!(terminal(&trace), Some(("C", EventKind::Delivered)));
        assert!(!mesh.node("A").neighbors().iter().any(|n| n.name == "B"));
    }

    #[tokio::test]
    async fn test_office_recovers_after_link_restored() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        mesh.office("B", 10.0, 0.0).await;
        mesh.link("B").set_fault(LinkFault::DropPackages);
        let first = mesh.route("A", 10.0, 0.0).await;

        mesh.link("B").restore();
        let second = mesh.route("A", 10.0, 0.0).await;

        assert_eq!(terminal(&first), Some(("A", EventKind::Lost)));
        assert_eq!(terminal(&second), Some(("B", EventKind::Delivered)));
    }
}
