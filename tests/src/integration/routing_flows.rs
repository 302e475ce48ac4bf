//! # Routing Flows
//!
//! Multi-hop greedy routes through meshes of offices, including the
//! local-minimum stall the heuristic accepts.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gps_office::{EventKind, Location, OfficeRef};
    use tokio::task::JoinSet;

    use crate::support::{arrivals, terminal, Mesh, WAIT};

    /// A(0,0) - B(10,0) - C(20,0) - D(30,1), each seeing only its line neighbours.
    async fn collinear() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.linked_office("A", 0.0, 0.0, &["B"]).await;
        mesh.linked_office("B", 10.0, 0.0, &["A", "C"]).await;
        mesh.linked_office("C", 20.0, 0.0, &["B", "D"]).await;
        mesh.linked_office("D", 30.0, 1.0, &["C"]).await;
        mesh
    }

    #[tokio::test]
    async fn test_collinear_route_emits_full_event_sequence() {
        let mesh = collinear().await;

        let trace = mesh.route("A", 29.0, 1.0).await;

        let expected = [
            ("A", EventKind::Arrived),
            ("A", EventKind::Departed),
            ("B", EventKind::Arrived),
            ("B", EventKind::Departed),
            ("C", EventKind::Arrived),
            ("C", EventKind::Departed),
            ("D", EventKind::Arrived),
            ("D", EventKind::Delivered),
        ];
        let actual: Vec<(&str, EventKind)> =
            trace.iter().map(|(o, k)| (o.as_str(), *k)).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_collinear_route_event_lines() {
        let mesh = collinear().await;
        let (package, listener) = mesh.send("A", 29.0, 1.0).await;

        let last = listener
            .wait_for_terminal(package.tracking_number(), WAIT)
            .await
            .unwrap();
        let first = listener.events().into_iter().next().unwrap();

        let number = package.tracking_number();
        assert_eq!(first.to_string(), format!("Package number {number} arrived at A office"));
        assert_eq!(
            last.to_string(),
            format!("Package number {number} delivered from D office to (29, 1)")
        );
    }

    #[tokio::test]
    async fn test_reverse_route() {
        let mesh = collinear().await;

        let trace = mesh.route("D", 1.0, -1.0).await;

        assert_eq!(arrivals(&trace), vec!["D", "C", "B", "A"]);
        assert_eq!(terminal(&trace), Some(("A", EventKind::Delivered)));
    }

    #[tokio::test]
    async fn test_destination_at_origin_delivers_immediately() {
        let mesh = collinear().await;

        let trace = mesh.route("B", 10.0, 0.0).await;

        assert_eq!(
            trace,
            vec![
                ("B".to_string(), EventKind::Arrived),
                ("B".to_string(), EventKind::Delivered)
            ]
        );
    }

    #[tokio::test]
    async fn test_local_minimum_delivers_at_holder() {
        let mut mesh = Mesh::new();
        mesh.linked_office("A", 0.0, 0.0, &["B"]).await;
        mesh.linked_office("B", -5.0, 0.0, &["A"]).await;
        mesh.linked_office("C", 50.0, 0.0, &[]).await;

        let trace = mesh.route("A", 50.0, 0.0).await;

        // C sits on the destination but A never learns about it
        assert_eq!(terminal(&trace), Some(("A", EventKind::Delivered)));
        assert_eq!(arrivals(&trace), vec!["A"]);
    }

    #[tokio::test]
    async fn test_every_hop_moves_strictly_closer() {
        let mut mesh = Mesh::new();
        let points = [
            ("A", 0.0, 0.0),
            ("B", 12.0, 3.0),
            ("C", 25.0, -4.0),
            ("D", 31.0, 18.0),
            ("E", 44.0, 7.0),
            ("F", 8.0, 30.0),
            ("G", 52.0, 26.0),
        ];
        for (name, x, y) in points {
            mesh.office(name, x, y).await;
        }
        let destination = Location::new(55.0, 25.0);

        let trace = mesh.route("A", destination.x, destination.y).await;

        let distances: Vec<f64> = arrivals(&trace)
            .iter()
            .map(|name| mesh.node(name).location().distance_to(&destination))
            .collect();
        assert!(distances.windows(2).all(|w| w[1] < w[0]), "{distances:?}");
        assert_eq!(terminal(&trace).map(|(_, k)| k), Some(EventKind::Delivered));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_packages_each_terminate_once() {
        let mut mesh = Mesh::new();
        for (i, (x, y)) in [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0), (5.0, 5.0)]
            .into_iter()
            .enumerate()
        {
            mesh.office(&format!("O{i}"), x, y).await;
        }
        let mesh = Arc::new(mesh);

        let mut routes = JoinSet::new();
        for (i, (x, y)) in [(9.0, 9.0), (1.0, 1.0), (9.0, 1.0), (1.0, 9.0), (5.0, 4.0)]
            .into_iter()
            .enumerate()
        {
            let mesh = Arc::clone(&mesh);
            routes.spawn(async move { mesh.route(&format!("O{i}"), x, y).await });
        }

        while let Some(trace) = routes.join_next().await {
            let trace = trace.unwrap();
            let terminals = trace.iter().filter(|(_, k)| k.is_terminal()).count();
            assert_eq!(terminals, 1);
            assert_eq!(trace.last().map(|(_, k)| *k), Some(EventKind::Delivered));
        }
    }

    #[tokio::test]
    async fn test_tables_hold_three_nearest_after_routing() {
        let mut mesh = Mesh::new();
        for (name, x) in [("A", 0.0), ("B", 1.0), ("C", 2.0), ("D", 3.0), ("E", 4.0)] {
            mesh.office(name, x, 0.0).await;
        }

        mesh.route("A", 0.0, 0.0).await;

        let table = mesh.node("A").handle().neighbor_table().await.unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["B", "C", "D"]);
    }
}
