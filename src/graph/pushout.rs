//! Push-out relaxation: moves coastal waypoints away from the shore in a
//! fixed number of passes with growing distance.
//!
//! Large regions push along the corner bisector (flipped at convex
//! corners), small regions push radially from their centroid. A rejected
//! bisector push is retried once radially, under the same neighbour
//! visibility rule; a rejected radial push leaves the waypoint where the
//! previous pass put it.

use geo::Contains;

use super::WaypointGraph;
use crate::config::PushConfig;
use crate::domain::{Region, WaterMask, WaypointId};
use crate::geometry::{segment_prefix_on_water, vector};

/// Shape of the boundary at a vertex, for the fixed shore winding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Bulges into the water; the raw bisector points at land
    Convex,
    /// Indented; the raw bisector already points at water
    Concave,
}

/// Classify a vertex from the cross product of its incoming and outgoing edges
pub fn corner_kind(prev: (f64, f64), cur: (f64, f64), next: (f64, f64)) -> Corner {
    let incoming = vector::sub(cur, prev);
    let outgoing = vector::sub(next, cur);
    if vector::cross(incoming, outgoing) < 0.0 {
        Corner::Convex
    } else {
        Corner::Concave
    }
}

/// Outward unit bisector at `cur`, or `None` when the neighbours are
/// nearly opposite and the bisector is too short to trust
pub fn bisector_direction(
    prev: (f64, f64),
    cur: (f64, f64),
    next: (f64, f64),
    min_length: f64,
) -> Option<((f64, f64), Corner)> {
    let to_prev = vector::normalize(vector::sub(prev, cur))?;
    let to_next = vector::normalize(vector::sub(next, cur))?;
    let sum = (to_prev.0 + to_next.0, to_prev.1 + to_next.1);
    if vector::length(sum) < min_length {
        return None;
    }

    let dir = vector::normalize(sum)?;
    let corner = corner_kind(prev, cur, next);
    let outward = match corner {
        Corner::Convex => (-dir.0, -dir.1),
        Corner::Concave => dir,
    };
    Some((outward, corner))
}

/// Unit vector from the centroid through `cur`
pub fn radial_direction(cur: (f64, f64), centroid: (f64, f64)) -> Option<(f64, f64)> {
    vector::normalize(vector::sub(cur, centroid))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PushStats {
    /// Accepted moves over all passes
    pub moves: usize,
    /// Moves that only succeeded on the radial retry
    pub fallbacks: usize,
    /// Attempts where both directions were rejected
    pub rejected: usize,
    /// Ring waypoints still on their seed vertex after the last pass
    pub never_pushed: usize,
}

struct Pass<'a> {
    mask: &'a WaterMask,
    distance: f64,
    visibility: f64,
    step: f64,
    min_bisector: f64,
}

enum Outcome {
    Moved((f64, f64)),
    Fallback((f64, f64)),
    Stay,
}

impl Pass<'_> {
    fn on_open_water(&self, pos: (f64, f64)) -> bool {
        self.mask.in_bounds(pos.0, pos.1) && self.mask.is_water_at(pos.0, pos.1)
    }

    fn sees(&self, from: (f64, f64), to: (f64, f64)) -> bool {
        segment_prefix_on_water(self.mask, from, to, self.visibility, self.step)
    }

    fn radial_candidate(
        &self,
        anchor: (f64, f64),
        region: &Region,
        outline: &geo::Polygon<f64>,
    ) -> Option<(f64, f64)> {
        let dir = radial_direction(anchor, region.centroid)?;
        let pos = vector::add_scaled(anchor, dir, self.distance);
        let valid =
            self.on_open_water(pos) && !outline.contains(&geo::Point::new(pos.0, pos.1));
        valid.then_some(pos)
    }

    fn push(
        &self,
        graph: &WaypointGraph,
        region: &Region,
        outline: &geo::Polygon<f64>,
        [prev, id, next]: [WaypointId; 3],
    ) -> Outcome {
        let anchor_of = |id: WaypointId| graph.waypoint(id).map(|w| w.anchor);
        let (Some(anchor), Some(prev_anchor), Some(next_anchor)) =
            (anchor_of(id), anchor_of(prev), anchor_of(next))
        else {
            return Outcome::Stay;
        };

        if !region.small
            && let Some((dir, _)) =
                bisector_direction(prev_anchor, anchor, next_anchor, self.min_bisector)
        {
            let sees_neighbours = |pos: (f64, f64)| {
                self.sees(pos, graph.position(prev)) && self.sees(pos, graph.position(next))
            };
            let pos = vector::add_scaled(anchor, dir, self.distance);
            if self.on_open_water(pos) && sees_neighbours(pos) {
                return Outcome::Moved(pos);
            }
            return match self.radial_candidate(anchor, region, outline) {
                Some(pos) if sees_neighbours(pos) => Outcome::Fallback(pos),
                _ => Outcome::Stay,
            };
        }

        match self.radial_candidate(anchor, region, outline) {
            Some(pos) => Outcome::Moved(pos),
            None => Outcome::Stay,
        }
    }
}

/// Run every push pass over every ring
///
/// Ring `i` of the graph must belong to `regions[i]`.
pub fn push_out(
    graph: &mut WaypointGraph,
    regions: &[Region],
    mask: &WaterMask,
    config: &PushConfig,
    step: f64,
) -> PushStats {
    let mut stats = PushStats::default();
    let outlines: Vec<geo::Polygon<f64>> = regions.iter().map(|r| r.polygon.to_geo()).collect();

    for (pass_index, (&distance, &visibility)) in
        config.distances.iter().zip(&config.visibility).enumerate()
    {
        let pass = Pass {
            mask,
            distance,
            visibility,
            step,
            min_bisector: config.degenerate_bisector,
        };
        let moves_before = stats.moves;

        for (index, (region, outline)) in regions.iter().zip(&outlines).enumerate() {
            let ring = graph.ring(index).to_vec();
            let n = ring.len();
            for k in 0..n {
                let ids = [ring[(k + n - 1) % n], ring[k], ring[(k + 1) % n]];
                let (pos, fallback) = match pass.push(graph, region, outline, ids) {
                    Outcome::Moved(pos) => (pos, false),
                    Outcome::Fallback(pos) => (pos, true),
                    Outcome::Stay => {
                        stats.rejected += 1;
                        continue;
                    }
                };
                if let Some(waypoint) = graph.waypoint_mut(ring[k]) {
                    waypoint.set_position(pos);
                    stats.moves += 1;
                    if fallback {
                        stats.fallbacks += 1;
                    }
                }
            }
        }

        tracing::debug!(
            "Push pass {} ({}px): {} waypoints moved",
            pass_index + 1,
            distance,
            stats.moves - moves_before
        );
    }

    stats.never_pushed = graph
        .rings()
        .iter()
        .flatten()
        .filter(|&&id| graph.waypoint(id).is_some_and(|w| !w.was_moved()))
        .count();
    if stats.never_pushed > 0 {
        tracing::warn!(
            "{} waypoints could not be pushed off the shore",
            stats.never_pushed
        );
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, Polygon};
    use crate::geometry::rasterize_land;
    use crate::graph::seed_rings;

    fn region(points: &[(i32, i32)], pixel_area: u32) -> Region {
        let polygon = Polygon::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect());
        Region::new(polygon, pixel_area, 5000.0)
    }

    fn notched_island() -> Region {
        // Square with a V notch cut into its top edge, apex at (100, 100)
        region(
            &[
                (50, 50),
                (50, 150),
                (150, 150),
                (150, 50),
                (140, 50),
                (100, 100),
                (60, 50),
            ],
            8000,
        )
    }

    #[test]
    fn test_square_corner_is_convex_and_pushes_outward() {
        // Corner (0, 0) of a screen counter-clockwise square
        let (dir, corner) =
            bisector_direction((10.0, 0.0), (0.0, 0.0), (0.0, 10.0), 0.1).unwrap();
        assert_eq!(corner, Corner::Convex);
        assert!(dir.0 < 0.0 && dir.1 < 0.0);
    }

    #[test]
    fn test_notch_apex_is_concave_and_pushes_into_opening() {
        let (dir, corner) =
            bisector_direction((140.0, 50.0), (100.0, 100.0), (60.0, 50.0), 0.1).unwrap();
        assert_eq!(corner, Corner::Concave);
        assert!(dir.0.abs() < 1e-9);
        assert!((dir.1 + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_run_has_no_bisector() {
        assert!(bisector_direction((0.0, 0.0), (0.0, 10.0), (0.0, 20.0), 0.1).is_none());
        assert!(radial_direction((5.0, 5.0), (5.0, 5.0)).is_none());
    }

    #[test]
    fn test_small_region_pushes_radially_outside() {
        let regions = vec![region(&[(80, 80), (80, 120), (120, 120), (120, 80)], 1600)];
        let mask = rasterize_land(200, 200, regions.iter().map(|r| &r.polygon));
        let mut graph = seed_rings(&regions);

        let stats = push_out(&mut graph, &regions, &mask, &PushConfig::default(), 2.0);

        assert_eq!(stats.never_pushed, 0);
        assert_eq!(stats.fallbacks, 0);
        for w in graph.waypoints() {
            assert!(mask.is_water_at(w.x, w.y));
            assert!(!regions[0].polygon.contains(w.x, w.y));
            let moved = (w.x - w.anchor.0).hypot(w.y - w.anchor.1);
            assert!((moved - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_notch_apex_uses_concave_branch() {
        let regions = vec![notched_island()];
        let mask = rasterize_land(200, 200, regions.iter().map(|r| &r.polygon));
        let mut graph = seed_rings(&regions);

        push_out(&mut graph, &regions, &mask, &PushConfig::default(), 2.0);

        let apex = graph.waypoint(5).unwrap();
        assert_eq!(apex.anchor, (100.0, 100.0));
        assert!(apex.y < 100.0, "apex should move into the notch opening");
        assert!((apex.x - 100.0).abs() < 1e-6);
        assert!(mask.is_water_at(apex.x, apex.y));
        assert!(!regions[0].polygon.contains(apex.x, apex.y));
    }

    #[test]
    fn test_blocked_bisector_falls_back_to_radial() {
        // Long bar whose (50, 50) corner has a rock sitting on its diagonal;
        // the radial direction from the centroid passes below the rock
        let regions = vec![region(&[(50, 50), (50, 100), (250, 100), (250, 50)], 10000)];
        let mut mask = rasterize_land(300, 200, regions.iter().map(|r| &r.polygon));
        for y in 30..44 {
            for x in 30..46 {
                mask.set(x, y, false);
            }
        }
        let mut graph = seed_rings(&regions);

        let stats = push_out(&mut graph, &regions, &mask, &PushConfig::default(), 2.0);

        assert!(stats.fallbacks > 0);
        let corner = graph.waypoint(0).unwrap();
        assert!(corner.was_moved());
        assert!(mask.is_water_at(corner.x, corner.y));
        assert!(!regions[0].polygon.contains(corner.x, corner.y));
        // Radial from (150, 75): more west than north
        assert!(corner.x < 50.0 && corner.y < 50.0);
        assert!(50.0 - corner.x > 2.0 * (50.0 - corner.y));
    }

    #[test]
    fn test_near_straight_vertex_pushes_from_centroid() {
        let regions = vec![region(
            &[(50, 50), (50, 100), (150, 101), (250, 100), (250, 50)],
            10000,
        )];
        let mask = rasterize_land(300, 200, regions.iter().map(|r| &r.polygon));
        let mut graph = seed_rings(&regions);

        push_out(&mut graph, &regions, &mask, &PushConfig::default(), 2.0);

        // Centroid (150, 80.2) sits straight above the vertex
        let w = graph.waypoint(2).unwrap();
        assert_eq!(w.anchor, (150.0, 101.0));
        assert!((w.x - 150.0).abs() < 1e-9);
        assert!((w.y - 121.0).abs() < 1e-9);
    }

    #[test]
    fn test_pushes_never_leave_the_map() {
        // Island hugging the map edge: outward pushes on that side are rejected
        let regions = vec![region(&[(0, 20), (0, 80), (40, 80), (40, 20)], 2400)];
        let mask = rasterize_land(100, 100, regions.iter().map(|r| &r.polygon));
        let mut graph = seed_rings(&regions);

        let stats = push_out(&mut graph, &regions, &mask, &PushConfig::default(), 2.0);

        assert!(stats.rejected > 0);
        for w in graph.waypoints() {
            assert!(mask.in_bounds(w.x, w.y));
            if w.was_moved() {
                assert!(mask.is_water_at(w.x, w.y));
            }
        }
    }
}
