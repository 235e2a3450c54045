use super::WaypointGraph;
use crate::domain::Region;

/// Seed one waypoint per refined vertex and link each region into a ring
///
/// Ring order follows polygon order, so ring `i` belongs to region `i`.
pub fn seed_rings(regions: &[Region]) -> WaypointGraph {
    let mut graph = WaypointGraph::new();

    for (index, region) in regions.iter().enumerate() {
        let ids = region
            .polygon
            .points
            .iter()
            .map(|p| graph.add_waypoint(p.x as f64, p.y as f64, index))
            .collect();
        graph.set_ring(index, ids);
    }
    graph.rebuild_ring_links();

    tracing::debug!(
        "Seeded {} waypoints on {} rings",
        graph.len(),
        graph.rings().len()
    );
    graph
}
