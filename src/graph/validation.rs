//! Graph validation
//!
//! Re-checks the navigability guarantees of a finished graph:
//! - every waypoint on water
//! - connections symmetric
//! - every connection on water, ring edges included
//! - every connection within the bridging distance unless it joins two
//!   ring neighbours

use super::WaypointGraph;
use crate::domain::WaterMask;
use crate::geometry::segment_on_water;

/// Result of graph validation
#[derive(Debug, Default, Clone)]
pub struct GraphValidation {
    /// Number of waypoints checked
    pub total: usize,
    /// Number of connections checked
    pub connections: usize,
    /// Waypoints sitting on land or outside the map
    pub off_water: usize,
    /// Connections present on only one side
    pub asymmetric: usize,
    /// Cross-water connections whose line touches land
    pub blocked_links: usize,
    /// Cross-water connections longer than the bridging distance
    pub overlong_links: usize,
    /// Ring edges whose line touches land
    pub blocked_ring_edges: usize,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl GraphValidation {
    /// No navigability guarantee is broken
    pub fn is_valid(&self) -> bool {
        self.off_water == 0
            && self.asymmetric == 0
            && self.blocked_links == 0
            && self.overlong_links == 0
            && self.blocked_ring_edges == 0
    }

    pub fn summary(&self) -> String {
        if self.is_valid() {
            format!(
                "Graph valid: {} waypoints, {} connections, no issues",
                self.total, self.connections
            )
        } else {
            format!(
                "Graph issues: {} waypoints, {} off water, {} asymmetric, {} blocked links, {} overlong links, {} blocked ring edges",
                self.total,
                self.off_water,
                self.asymmetric,
                self.blocked_links,
                self.overlong_links,
                self.blocked_ring_edges
            )
        }
    }
}

/// Validate a finished graph against the mask it was built on
pub fn validate_graph(
    graph: &WaypointGraph,
    mask: &WaterMask,
    max_distance: f64,
    step: f64,
) -> GraphValidation {
    let mut result = GraphValidation {
        total: graph.len(),
        ..Default::default()
    };

    for w in graph.waypoints() {
        if !mask.is_water_at(w.x, w.y) {
            result.off_water += 1;
            result.warnings.push(format!(
                "Waypoint {} at ({:.1}, {:.1}) is not on water",
                w.id, w.x, w.y
            ));
        }
        for &other in &w.connections {
            if !graph.are_connected(other, w.id) {
                result.asymmetric += 1;
                result.warnings.push(format!(
                    "Connection {} -> {} has no reverse",
                    w.id, other
                ));
            }
        }
    }

    let ring_edges = graph.ring_edges();
    for (a, b) in graph.edges() {
        result.connections += 1;
        let (pa, pb) = (graph.position(a), graph.position(b));
        let clear = segment_on_water(mask, pa, pb, step);

        if ring_edges.contains(&(a, b)) {
            if !clear {
                result.blocked_ring_edges += 1;
            }
            continue;
        }
        if !clear {
            result.blocked_links += 1;
            result
                .warnings
                .push(format!("Connection {} - {} crosses land", a, b));
        }
        if (pa.0 - pb.0).hypot(pa.1 - pb.1) > max_distance {
            result.overlong_links += 1;
            result
                .warnings
                .push(format!("Connection {} - {} exceeds {}px", a, b, max_distance));
        }
    }

    if result.blocked_ring_edges > 0 {
        result.warnings.push(format!(
            "{} ring edges cut across land",
            result.blocked_ring_edges
        ));
    }

    result
}
