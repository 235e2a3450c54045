use rayon::prelude::*;

use super::WaypointGraph;
use crate::domain::{WaterMask, WaypointId};
use crate::geometry::segment_on_water;

/// Connect every pair of waypoints closer than `max_distance` whose
/// straight line stays on water; returns the number of new connections
///
/// Pairs are tested in parallel against the read-only mask and applied
/// afterwards in id order.
pub fn link_cross_water(
    graph: &mut WaypointGraph,
    mask: &WaterMask,
    max_distance: f64,
    step: f64,
) -> usize {
    let pairs = clear_pairs(graph, mask, max_distance, step);
    let added = pairs
        .into_iter()
        .filter(|&(a, b)| graph.connect(a, b))
        .count();
    tracing::debug!("Added {} cross-water connections", added);
    added
}

/// Unconnected pairs `(a, b)` with `a < b` that are close enough and see
/// each other across water
fn clear_pairs(
    graph: &WaypointGraph,
    mask: &WaterMask,
    max_distance: f64,
    step: f64,
) -> Vec<(WaypointId, WaypointId)> {
    let positions: Vec<(f64, f64)> = graph.waypoints().iter().map(|w| w.position()).collect();
    let n = positions.len();

    (0..n)
        .into_par_iter()
        .flat_map_iter(|a| {
            let positions = &positions;
            (a + 1..n).filter_map(move |b| {
                let (pa, pb) = (positions[a], positions[b]);
                let clear = (pa.0 - pb.0).hypot(pa.1 - pb.1) <= max_distance
                    && !graph.are_connected(a, b)
                    && segment_on_water(mask, pa, pb, step);
                clear.then_some((a, b))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered(points: &[(f64, f64)]) -> WaypointGraph {
        let mut graph = WaypointGraph::new();
        for &(x, y) in points {
            graph.add_waypoint(x, y, 0);
        }
        graph
    }

    #[test]
    fn test_links_clear_pairs_within_range() {
        let mask = WaterMask::all_water(500, 100);
        let mut graph = scattered(&[(10.0, 50.0), (200.0, 50.0), (490.0, 50.0)]);

        let added = link_cross_water(&mut graph, &mask, 300.0, 2.0);

        assert_eq!(added, 2);
        assert!(graph.are_connected(0, 1));
        assert!(graph.are_connected(1, 2));
        assert!(!graph.are_connected(0, 2));
    }

    #[test]
    fn test_land_blocks_link() {
        let mut mask = WaterMask::all_water(100, 100);
        for y in 0..100 {
            mask.set(50, y, false);
        }
        let mut graph = scattered(&[(10.0, 50.0), (90.0, 50.0), (10.0, 90.0)]);

        link_cross_water(&mut graph, &mask, 300.0, 1.0);

        assert!(!graph.are_connected(0, 1));
        assert!(graph.are_connected(0, 2));
    }

    #[test]
    fn test_existing_connections_not_counted() {
        let mask = WaterMask::all_water(100, 100);
        let mut graph = scattered(&[(10.0, 10.0), (20.0, 10.0)]);
        graph.connect(0, 1);

        assert_eq!(link_cross_water(&mut graph, &mask, 300.0, 2.0), 0);
        assert_eq!(graph.waypoint(0).unwrap().connections.len(), 1);
    }
}
