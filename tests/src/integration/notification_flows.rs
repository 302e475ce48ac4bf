//! # Notification Flows
//!
//! Subscribers hold leases on an office's event stream. These scenarios
//! exercise sequence ordering, lease expiry and renewal, failing listeners
//! and directory membership.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use gps_office::test_utils::{FailingListener, RecordingListener};
    use gps_office::{
        Directory, EventKind, LinkFault, MembershipChange, MembershipFilter, OfficeConfig,
        OfficeRef, RemoteError,
    };

    use crate::support::{Mesh, WAIT};

    #[tokio::test]
    async fn test_subscriber_sees_every_hop_of_its_office() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        mesh.office("B", 10.0, 0.0).await;
        let watcher = Arc::new(RecordingListener::new());
        let office = mesh.directory.lookup("A").await.unwrap();
        let _lease = office.subscribe(watcher.clone()).await.unwrap();

        mesh.route("A", 10.0, 0.0).await;
        mesh.route("B", 0.0, 0.0).await;

        let kinds: Vec<EventKind> = watcher.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Arrived,
                EventKind::Departed,
                EventKind::Arrived,
                EventKind::Delivered
            ]
        );
        assert!(watcher.events().iter().all(|e| e.office == "A"));
    }

    #[tokio::test]
    async fn test_sequence_numbers_increase_per_office() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        let watcher = Arc::new(RecordingListener::new());
        mesh.node("A").handle().subscribe(watcher.clone()).await.unwrap();

        for i in 0..5 {
            mesh.route("A", f64::from(i), 0.0).await;
        }

        let sequences: Vec<u64> = watcher.events().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences.len(), 10);
        assert!(sequences.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lease_stops_notifications() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        let watcher = Arc::new(RecordingListener::new());
        let lease = mesh.node("A").handle().subscribe(watcher.clone()).await.unwrap();
        let lease_duration = Duration::from_secs(mesh.config.lease_duration_secs);

        tokio::time::sleep(lease_duration + Duration::from_secs(1)).await;
        mesh.route("A", 1.0, 1.0).await;

        assert!(watcher.events().is_empty());
        assert!(!lease.is_active());
        assert!(lease.renew().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_renewed_lease_keeps_notifications() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        let watcher = Arc::new(RecordingListener::new());
        let lease = mesh.node("A").handle().subscribe(watcher.clone()).await.unwrap();
        let half = Duration::from_secs(mesh.config.lease_duration_secs) / 2;

        for _ in 0..4 {
            tokio::time::sleep(half).await;
            lease.renew().unwrap();
        }
        mesh.route("A", 1.0, 1.0).await;

        assert_eq!(watcher.events().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_expired_leases() {
        let mut mesh = Mesh::new();
        let office = mesh.office("A", 0.0, 0.0).await;
        let sweeper = office.spawn_lease_sweeper();
        office.handle().subscribe(Arc::new(RecordingListener::new())).await.unwrap();
        assert_eq!(office.stats().subscriber_count, 1);

        tokio::time::sleep(Duration::from_secs(mesh.config.lease_duration_secs + 2)).await;

        assert_eq!(office.notifier().purge_expired(), 0);
        assert_eq!(office.stats().subscriber_count, 0);
        sweeper.abort();
    }

    #[tokio::test]
    async fn test_failing_subscriber_is_dropped_without_blocking_delivery() {
        let mut mesh = Mesh::new();
        let office = mesh.office("A", 0.0, 0.0).await;
        let healthy = Arc::new(RecordingListener::new());
        office.handle().subscribe(Arc::new(FailingListener)).await.unwrap();
        office.handle().subscribe(healthy.clone()).await.unwrap();

        let trace = mesh.route("A", 0.0, 0.0).await;

        assert_eq!(trace.last().map(|(_, k)| *k), Some(EventKind::Delivered));
        assert_eq!(healthy.events().len(), 2);
        // Two failed deliveries reach the limit configured for tests
        assert_eq!(office.stats().subscriber_count, 1);
    }

    #[tokio::test]
    async fn test_subscribe_through_severed_link_fails() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        mesh.link("A").set_fault(LinkFault::Severed);
        let office = mesh.directory.lookup("A").await.unwrap();

        let result = office.subscribe(Arc::new(RecordingListener::new())).await;

        assert!(matches!(result, Err(RemoteError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn test_membership_reports_offices_bound_later() {
        let mut mesh = Mesh::new();
        mesh.office("A", 0.0, 0.0).await;
        let mut joined = mesh.directory.subscribe_membership(MembershipFilter::offices_bound());

        mesh.office("B", 5.0, 5.0).await;
        mesh.directory.unbind("A").await.unwrap();
        mesh.office("C", 9.0, 9.0).await;

        let first = tokio::time::timeout(WAIT, joined.recv()).await.unwrap().unwrap();
        let second = tokio::time::timeout(WAIT, joined.recv()).await.unwrap().unwrap();
        assert_eq!((first.name.as_str(), first.change), ("B", MembershipChange::Bound));
        assert_eq!((second.name.as_str(), second.change), ("C", MembershipChange::Bound));
    }

    #[tokio::test]
    async fn test_listener_timeout_bounds_slow_subscriber() {
        struct Stalled;

        #[async_trait::async_trait]
        impl shared_types::EventListener for Stalled {
            async fn report(
                &self,
                _event: shared_types::NodeEvent,
            ) -> Result<(), shared_types::ListenerError> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }

        let mut mesh = Mesh::with_config(OfficeConfig {
            delivery_timeout_ms: 20,
            ..OfficeConfig::for_testing()
        });
        let office = mesh.office("A", 0.0, 0.0).await;
        office.handle().subscribe(Arc::new(Stalled)).await.unwrap();

        let trace = tokio::time::timeout(Duration::from_secs(5), mesh.route("A", 0.0, 0.0))
            .await
            .expect("stalled subscriber blocked the office");

        assert_eq!(trace.len(), 2);
    }
}
