use std::collections::{BTreeSet, HashMap};

use crate::domain::{Waypoint, WaypointId};

/// Arena of waypoints keyed by id plus one ordered ring of ids per region
///
/// A waypoint's id always equals its index in the arena. Waypoints removed
/// from a ring keep their slot (with no connections) until [`compact`]
/// drops them and renumbers the survivors.
///
/// [`compact`]: WaypointGraph::compact
#[derive(Debug, Clone, Default)]
pub struct WaypointGraph {
    waypoints: Vec<Waypoint>,
    rings: Vec<Vec<WaypointId>>,
}

impl WaypointGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn add_waypoint(&mut self, x: f64, y: f64, region: usize) -> WaypointId {
        let id = self.waypoints.len();
        self.waypoints.push(Waypoint::new(id, x, y, region));
        id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id)
    }

    pub fn waypoint_mut(&mut self, id: WaypointId) -> Option<&mut Waypoint> {
        self.waypoints.get_mut(id)
    }

    /// Position of a waypoint; unknown ids map to the origin
    pub fn position(&self, id: WaypointId) -> (f64, f64) {
        self.waypoints
            .get(id)
            .map(Waypoint::position)
            .unwrap_or((0.0, 0.0))
    }

    pub fn rings(&self) -> &[Vec<WaypointId>] {
        &self.rings
    }

    pub fn ring(&self, region: usize) -> &[WaypointId] {
        self.rings.get(region).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the ring of `region`, growing the ring table as needed
    pub fn set_ring(&mut self, region: usize, ids: Vec<WaypointId>) {
        if self.rings.len() <= region {
            self.rings.resize_with(region + 1, Vec::new);
        }
        self.rings[region] = ids;
    }

    /// Add a symmetric connection; false if it existed or is a self loop
    pub fn connect(&mut self, a: WaypointId, b: WaypointId) -> bool {
        if a == b || a >= self.waypoints.len() || b >= self.waypoints.len() {
            return false;
        }
        let added = self.waypoints[a].connections.insert(b);
        self.waypoints[b].connections.insert(a);
        added
    }

    /// Drop the connection between `a` and `b`, on both sides
    pub fn disconnect(&mut self, a: WaypointId, b: WaypointId) -> bool {
        let removed = self
            .waypoints
            .get_mut(a)
            .is_some_and(|w| w.connections.remove(&b));
        if let Some(w) = self.waypoints.get_mut(b) {
            w.connections.remove(&a);
        }
        removed
    }

    pub fn are_connected(&self, a: WaypointId, b: WaypointId) -> bool {
        self.waypoints
            .get(a)
            .is_some_and(|w| w.connections.contains(&b))
    }

    /// Remove every connection touching `id`, on both sides
    pub fn isolate(&mut self, id: WaypointId) {
        let Some(waypoint) = self.waypoints.get_mut(id) else {
            return;
        };
        let neighbours = std::mem::take(&mut waypoint.connections);
        for other in neighbours {
            if let Some(w) = self.waypoints.get_mut(other) {
                w.connections.remove(&id);
            }
        }
    }

    /// Clear all ring members' connections and relink each ring as a cycle
    pub fn rebuild_ring_links(&mut self) {
        for ring in &self.rings {
            for &id in ring {
                if let Some(w) = self.waypoints.get_mut(id) {
                    w.connections.clear();
                }
            }
        }

        let rings = self.rings.clone();
        for ring in rings {
            let n = ring.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                self.connect(ring[i], ring[(i + 1) % n]);
            }
        }
    }

    /// Unordered pairs of ring neighbours
    pub fn ring_edges(&self) -> BTreeSet<(WaypointId, WaypointId)> {
        let mut edges = BTreeSet::new();
        for ring in &self.rings {
            let n = ring.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                let (a, b) = (ring[i], ring[(i + 1) % n]);
                if a != b {
                    edges.insert((a.min(b), a.max(b)));
                }
            }
        }
        edges
    }

    /// Every connection once, as `(low, high)`
    pub fn edges(&self) -> Vec<(WaypointId, WaypointId)> {
        self.waypoints
            .iter()
            .flat_map(|w| {
                w.connections
                    .iter()
                    .filter(move |&&other| other > w.id)
                    .map(move |&other| (w.id, other))
            })
            .collect()
    }

    /// Drop waypoints without connections and renumber the rest densely
    ///
    /// Returns how many waypoints were dropped.
    pub fn compact(&mut self) -> usize {
        let before = self.waypoints.len();
        let mut remap: HashMap<WaypointId, WaypointId> = HashMap::new();
        let mut survivors = Vec::with_capacity(before);

        for mut waypoint in std::mem::take(&mut self.waypoints) {
            if waypoint.connections.is_empty() {
                continue;
            }
            remap.insert(waypoint.id, survivors.len());
            waypoint.id = survivors.len();
            survivors.push(waypoint);
        }

        for waypoint in &mut survivors {
            waypoint.connections = waypoint
                .connections
                .iter()
                .filter_map(|old| remap.get(old).copied())
                .collect();
        }
        for ring in &mut self.rings {
            *ring = ring.iter().filter_map(|old| remap.get(old).copied()).collect();
        }

        self.waypoints = survivors;
        before - self.waypoints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ring() -> WaypointGraph {
        let mut graph = WaypointGraph::new();
        let ids: Vec<_> = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]
            .iter()
            .map(|&(x, y)| graph.add_waypoint(x, y, 0))
            .collect();
        graph.set_ring(0, ids);
        graph.rebuild_ring_links();
        graph
    }

    #[test]
    fn test_ring_links_are_symmetric_cycle() {
        let graph = square_ring();
        for w in graph.waypoints() {
            assert_eq!(w.connections.len(), 2);
            for &other in &w.connections {
                assert!(graph.are_connected(other, w.id));
            }
        }
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(graph.ring_edges().len(), 4);
    }

    #[test]
    fn test_connect_rejects_self_and_duplicates() {
        let mut graph = square_ring();
        assert!(!graph.connect(1, 1));
        assert!(!graph.connect(0, 1));
        assert!(graph.connect(0, 2));
        assert!(graph.are_connected(2, 0));
    }

    #[test]
    fn test_isolate_clears_both_sides() {
        let mut graph = square_ring();
        graph.isolate(1);
        assert!(graph.waypoint(1).unwrap().connections.is_empty());
        assert!(!graph.are_connected(0, 1));
        assert!(!graph.are_connected(2, 1));
    }

    #[test]
    fn test_disconnect_clears_both_sides() {
        let mut graph = square_ring();
        assert!(graph.disconnect(1, 2));
        assert!(!graph.are_connected(1, 2));
        assert!(!graph.are_connected(2, 1));
        assert!(graph.are_connected(0, 1));
        assert!(!graph.disconnect(1, 2));
    }

    #[test]
    fn test_compact_renumbers_densely() {
        let mut graph = square_ring();
        graph.set_ring(0, vec![0, 2, 3]);
        graph.isolate(1);
        graph.rebuild_ring_links();

        assert_eq!(graph.compact(), 1);
        assert_eq!(graph.len(), 3);
        for (index, w) in graph.waypoints().iter().enumerate() {
            assert_eq!(w.id, index);
            assert!(w.connections.iter().all(|&c| c < 3));
        }
        assert_eq!(graph.ring(0), &[0, 1, 2]);
        assert_eq!(graph.waypoint(1).unwrap().position(), (10.0, 10.0));
    }
}
