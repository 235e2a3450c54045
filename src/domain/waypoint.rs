use std::collections::BTreeSet;

pub type WaypointId = usize;

/// A navigation node; `connections` is kept symmetric by [`crate::graph::WaypointGraph`]
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub id: WaypointId,
    pub x: f64,
    pub y: f64,
    pub connections: BTreeSet<WaypointId>,
    /// Index of the region whose ring seeded this waypoint
    pub region: usize,
    /// Refined polygon vertex the waypoint was seeded from
    pub anchor: (f64, f64),
}

impl Waypoint {
    pub fn new(id: WaypointId, x: f64, y: f64, region: usize) -> Self {
        Self {
            id,
            x,
            y,
            connections: BTreeSet::new(),
            region,
            anchor: (x, y),
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, (x, y): (f64, f64)) {
        self.x = x;
        self.y = y;
    }

    /// True once the pass that moved it has left the seed vertex
    pub fn was_moved(&self) -> bool {
        self.x != self.anchor.0 || self.y != self.anchor.1
    }
}
