use geo::Contains;

use crate::geometry::Bounds;

/// Integer pixel coordinate of a polygon vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn as_f64(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// Traversal direction of a closed loop in image space (y pointing down)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Counter-clockwise on screen: negative shoelace sum
    CounterClockwise,
    Clockwise,
}

/// Winding every land polygon is normalised to
///
/// The convex/concave corner test in push-out relies on it: with this
/// winding a negative cross product of incoming and outgoing edges marks a
/// convex corner.
pub const SHORE_WINDING: Winding = Winding::CounterClockwise;

/// Closed land boundary; the first point is not repeated at the end
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Half the shoelace sum; negative for [`SHORE_WINDING`]
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0i64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }
        sum as f64 / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn winding(&self) -> Winding {
        if self.signed_area() < 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Reverse the loop in place if it does not already run in `winding`
    ///
    /// Returns true when the loop was reversed.
    pub fn orient(&mut self, winding: Winding) -> bool {
        if self.winding() != winding && self.signed_area() != 0.0 {
            self.points.reverse();
            true
        } else {
            false
        }
    }

    /// Vertex average
    pub fn centroid(&self) -> (f64, f64) {
        if self.points.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
        (sx / n, sy / n)
    }

    /// Closed perimeter length
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                ((b.x - a.x) as f64).hypot((b.y - a.y) as f64)
            })
            .sum()
    }

    /// Drop consecutive duplicate vertices, including a repeated closing point
    pub fn dedup(&mut self) -> usize {
        let before = self.points.len();
        self.points.dedup();
        while self.points.len() > 1 && self.points.first() == self.points.last() {
            self.points.pop();
        }
        before - self.points.len()
    }

    /// At least three vertices and a non-zero area
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3 && self.area() > 0.0
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let pts: Vec<(f64, f64)> = self.points.iter().map(|p| p.as_f64()).collect();
        Bounds::from_points(&pts)
    }

    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let ring: geo::LineString<f64> = self
            .points
            .iter()
            .map(|p| geo::coord! { x: p.x as f64, y: p.y as f64 })
            .collect();
        geo::Polygon::new(ring, Vec::new())
    }

    /// Strict interior test; points on the boundary are outside
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.to_geo().contains(&geo::Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        // Counter-clockwise on screen
        Polygon::new(vec![
            Point::new(0, 0),
            Point::new(0, 10),
            Point::new(10, 10),
            Point::new(10, 0),
        ])
    }

    #[test]
    fn test_shoelace_sign_matches_shore_winding() {
        let sq = square();
        assert_eq!(sq.signed_area(), -100.0);
        assert_eq!(sq.area(), 100.0);
        assert_eq!(sq.winding(), SHORE_WINDING);
    }

    #[test]
    fn test_orient_reverses_clockwise() {
        let mut sq = square();
        sq.points.reverse();
        assert_eq!(sq.winding(), Winding::Clockwise);
        assert!(sq.orient(SHORE_WINDING));
        assert_eq!(sq.winding(), SHORE_WINDING);
        assert!(!sq.orient(SHORE_WINDING));
    }

    #[test]
    fn test_centroid_and_perimeter() {
        let sq = square();
        assert_eq!(sq.centroid(), (5.0, 5.0));
        assert!((sq.perimeter() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_dedup_removes_closing_point() {
        let mut poly = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(0, 0),
            Point::new(0, 5),
            Point::new(5, 5),
            Point::new(0, 0),
        ]);
        assert_eq!(poly.dedup(), 2);
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn test_contains() {
        let sq = square();
        assert!(sq.contains(5.0, 5.0));
        assert!(!sq.contains(15.0, 5.0));
    }

    #[test]
    fn test_degenerate_is_invalid() {
        let line = Polygon::new(vec![Point::new(0, 0), Point::new(5, 0), Point::new(10, 0)]);
        assert!(!line.is_valid());
    }
}
