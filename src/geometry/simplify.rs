use geo::{ConvexHull, LineString, MultiPoint, Simplify};

use crate::config::EpsilonBand;
use crate::domain::{Point, Polygon};

/// Douglas-Peucker simplification of a closed ring
///
/// The ring is closed before simplifying so the seam vertex is kept, then
/// reopened. Falls back to the input when fewer than three vertices would
/// survive.
pub fn simplify_ring(polygon: &Polygon, epsilon: f64) -> Polygon {
    if polygon.len() < 4 || epsilon <= 0.0 {
        return polygon.clone();
    }

    let mut line: LineString<f64> = polygon
        .points
        .iter()
        .map(|p| geo::coord! { x: p.x as f64, y: p.y as f64 })
        .collect();
    line.close();

    let simplified = line.simplify(&epsilon);
    let mut points: Vec<Point> = simplified
        .0
        .into_iter()
        .map(|c| Point::new(c.x.round() as i32, c.y.round() as i32))
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    if points.len() < 3 {
        return polygon.clone();
    }

    Polygon::new(points)
}

/// Pick the perimeter factor for a region's pixel area
///
/// Bands are ordered largest area first; the last band acts as the
/// catch-all for anything smaller.
pub fn epsilon_for(area: f64, perimeter: f64, bands: &[EpsilonBand]) -> f64 {
    let factor = bands
        .iter()
        .find(|band| area > band.min_area)
        .or_else(|| bands.last())
        .map(|band| band.factor)
        .unwrap_or(0.0);
    factor * perimeter
}

/// Convex hull of a polygon's vertices, returned in the input's winding
pub fn convex_hull(polygon: &Polygon) -> Polygon {
    let cloud: MultiPoint<f64> = polygon
        .points
        .iter()
        .map(|p| geo::Point::new(p.x as f64, p.y as f64))
        .collect();
    let hull = cloud.convex_hull();

    let mut points: Vec<Point> = hull
        .exterior()
        .0
        .iter()
        .map(|c| Point::new(c.x.round() as i32, c.y.round() as i32))
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    let mut result = Polygon::new(points);
    result.orient(polygon.winding());
    result
}
