//! Greedy forwarding decision.
//!
//! The holder keeps the package when no known neighbor is strictly closer to
//! the destination than the holder itself. There is no hop limit and no
//! visited set: the decision is memoryless by construction.

use shared_types::Location;

use super::neighbor_table::NeighborEntry;

/// Best-neighbor distance used when the holder knows nobody.
pub const ABSENT_NEIGHBOR: f64 = f64::INFINITY;

/// Outcome of one forwarding decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHop {
    /// The holder is at least as close as every neighbor.
    Deliver,
    /// Hand the package to the named neighbor.
    Forward(String),
}

/// Choose where a package held at `holder` goes next.
///
/// Among equidistant neighbors the lexicographically smallest name wins, and
/// the holder wins ties against its best neighbor.
pub fn next_hop(holder: Location, neighbors: &[NeighborEntry], destination: Location) -> NextHop {
    let own_distance = holder.distance_to(&destination);

    let mut best: Option<(f64, &NeighborEntry)> = None;
    for neighbor in neighbors {
        let distance = neighbor.location.distance_to(&destination);
        let closer = match best {
            None => true,
            Some((best_distance, current)) => {
                distance < best_distance || (distance == best_distance && neighbor.name < current.name)
            }
        };
        if closer {
            best = Some((distance, neighbor));
        }
    }

    // Forward only on a strict improvement; an incomparable distance (NaN)
    // never counts as one, so the holder keeps the package.
    let best_distance = best.map_or(ABSENT_NEIGHBOR, |(distance, _)| distance);
    match best {
        Some((_, neighbor)) if best_distance < own_distance => {
            NextHop::Forward(neighbor.name.clone())
        }
        _ => NextHop::Deliver,
    }
}
