//! Polygon refinement: turns raw traced boundaries into clean collision
//! shapes.
//!
//! Policy by pixel area, smallest first:
//! - below the minimum collision area the region is dropped
//! - every survivor is Douglas-Peucker simplified with a tolerance scaled
//!   to its perimeter (looser for smaller regions)
//! - below the convex threshold the region becomes its convex hull
//! - in the blend band the hull is taken only if it barely grows the area
//! - large regions get shallow kinks removed

use crate::config::RefineConfig;
use crate::domain::{Point, Polygon, RawRegion, Region, SHORE_WINDING};
use crate::geometry::{convex_hull, epsilon_for, simplify_ring, vector};

/// Counters collected while refining a batch of regions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefineStats {
    pub input: usize,
    pub too_small: usize,
    pub degenerate: usize,
    pub windings_reversed: usize,
    pub hull_replaced: usize,
    pub kinks_removed: usize,
    pub refined: usize,
}

/// Why a region did not make it into the refined set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooSmall,
    Degenerate,
}

/// Refine every region, preserving input order among the survivors
pub fn refine_regions(raw: Vec<RawRegion>, config: &RefineConfig) -> (Vec<Region>, RefineStats) {
    let mut stats = RefineStats {
        input: raw.len(),
        ..Default::default()
    };
    let mut regions = Vec::with_capacity(raw.len());

    for (index, region) in raw.into_iter().enumerate() {
        match refine_region(region, config, &mut stats) {
            Ok(refined) => regions.push(refined),
            Err(Rejection::TooSmall) => stats.too_small += 1,
            Err(Rejection::Degenerate) => {
                tracing::debug!("Region {} degenerated during refinement", index);
                stats.degenerate += 1;
            }
        }
    }

    stats.refined = regions.len();
    tracing::debug!(
        "Refined {} of {} regions ({} too small, {} degenerate)",
        stats.refined,
        stats.input,
        stats.too_small,
        stats.degenerate
    );
    (regions, stats)
}

/// Refine one region
pub fn refine_region(
    raw: RawRegion,
    config: &RefineConfig,
    stats: &mut RefineStats,
) -> Result<Region, Rejection> {
    let area = raw.pixel_area as f64;
    if area < config.min_collision_area {
        return Err(Rejection::TooSmall);
    }

    let mut polygon = raw.polygon;
    polygon.dedup();
    if polygon.orient(SHORE_WINDING) {
        tracing::warn!("Boundary loop arrived in the opposite winding; reversed");
        stats.windings_reversed += 1;
    }
    if !polygon.is_valid() {
        return Err(Rejection::Degenerate);
    }

    let epsilon = epsilon_for(area, polygon.perimeter(), &config.epsilon_bands);
    let simplified = simplify_ring(&polygon, epsilon);

    let mut refined = if area < config.convex_area {
        stats.hull_replaced += 1;
        convex_hull(&simplified)
    } else if area < config.small_area {
        let hull = convex_hull(&simplified);
        if hull.area() < simplified.area() * (1.0 + config.hull_blend_ratio) {
            stats.hull_replaced += 1;
            hull
        } else {
            simplified
        }
    } else {
        let (without_kinks, removed) =
            remove_kinks(&simplified, config.kink_dot, config.kink_long_edge);
        if without_kinks.len() < config.min_vertices {
            simplified
        } else {
            stats.kinks_removed += removed;
            without_kinks
        }
    };

    refined.dedup();
    if !refined.is_valid() || refined.area() < config.min_collision_area {
        return Err(Rejection::Degenerate);
    }

    Ok(Region::new(refined, raw.pixel_area, config.small_area))
}

/// Drop vertices where the boundary barely turns
///
/// A vertex goes when the unit vectors of its incoming and outgoing edges
/// have a dot product above `dot_threshold`, unless both edges are longer
/// than `long_edge`. Zero-length edges are always collapsed. Each vertex is
/// judged against its surviving predecessor; the two vertices at the seam
/// are judged again once the walk has closed the loop.
pub fn remove_kinks(polygon: &Polygon, dot_threshold: f64, long_edge: f64) -> (Polygon, usize) {
    let pts = &polygon.points;
    let n = pts.len();
    if n < 3 {
        return (polygon.clone(), 0);
    }
    let is_kink = |prev: Point, cur: Point, next: Point| {
        let incoming = vector::sub(cur.as_f64(), prev.as_f64());
        let outgoing = vector::sub(next.as_f64(), cur.as_f64());
        let (Some(a), Some(b)) = (vector::normalize(incoming), vector::normalize(outgoing)) else {
            return true;
        };
        let shallow = vector::dot(a, b) > dot_threshold;
        let long_run = vector::length(incoming) > long_edge && vector::length(outgoing) > long_edge;
        shallow && !long_run
    };

    let mut kept: Vec<Point> = Vec::with_capacity(n);
    let mut removed = 0;

    for i in 0..n {
        let prev = kept.last().copied().unwrap_or(pts[n - 1]);
        if is_kink(prev, pts[i], pts[(i + 1) % n]) {
            removed += 1;
        } else {
            kept.push(pts[i]);
        }
    }

    // The first vertex saw the original last vertex and the last vertex saw
    // the original first one; either may be gone
    while kept.len() > 3 {
        let last = kept.len() - 1;
        if is_kink(kept[last - 1], kept[last], kept[0]) {
            kept.pop();
        } else if is_kink(kept[last], kept[0], kept[1]) {
            kept.remove(0);
        } else {
            break;
        }
        removed += 1;
    }

    (Polygon::new(kept), removed)
}
