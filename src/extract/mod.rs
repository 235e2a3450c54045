//! Boundary extraction: turns a water mask into one closed vertex loop per
//! connected land region.
//!
//! The navigation build only depends on the [`RegionExtractor`] trait;
//! [`BoundaryTracer`] is the default implementation used by the CLI and
//! the tests.

use std::collections::VecDeque;

use crate::domain::{Point, Polygon, RawRegion, SHORE_WINDING, WaterMask};

/// Produces the raw land regions of a mask
pub trait RegionExtractor {
    fn extract(&self, mask: &WaterMask) -> Vec<RawRegion>;
}

/// Crack-following tracer for 8-connected land components
///
/// Only the outer boundary of each component is traced. Outline vertices
/// sit on pixel corners, so a pixel is inside the loop exactly when its
/// centre is, which is the rule the rasteriser fills by. Straight runs are
/// compressed to their end points and every loop is emitted in
/// [`SHORE_WINDING`].
#[derive(Debug, Clone, Copy)]
pub struct BoundaryTracer {
    /// Components with fewer land pixels are ignored as noise
    pub min_pixel_area: u32,
}

impl Default for BoundaryTracer {
    fn default() -> Self {
        Self {
            min_pixel_area: 100,
        }
    }
}

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

impl RegionExtractor for BoundaryTracer {
    fn extract(&self, mask: &WaterMask) -> Vec<RawRegion> {
        let (labels, sizes) = label_land(mask);
        let width = mask.width();
        let mut regions = Vec::new();
        let mut seen = vec![false; sizes.len()];

        for (index, &label) in labels.iter().enumerate() {
            let Some(label) = label else {
                continue;
            };
            if seen[label] {
                continue;
            }
            seen[label] = true;

            if sizes[label] < self.min_pixel_area {
                continue;
            }

            let start = ((index % width) as i64, (index / width) as i64);
            let trace = trace_outer_boundary(&labels, width, mask.height(), label, start);
            let mut polygon = Polygon::new(compress_runs(&trace));
            polygon.orient(SHORE_WINDING);
            if polygon.is_valid() {
                regions.push(RawRegion::new(polygon, sizes[label]));
            }
        }

        tracing::debug!("Traced {} land regions", regions.len());
        regions
    }
}

/// 8-connected component labels for land pixels plus each component's size
fn label_land(mask: &WaterMask) -> (Vec<Option<usize>>, Vec<u32>) {
    let (width, height) = (mask.width(), mask.height());
    let mut labels: Vec<Option<usize>> = vec![None; width * height];
    let mut sizes = Vec::new();
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if mask.get(x as i64, y as i64) || labels[y * width + x].is_some() {
                continue;
            }

            let label = sizes.len();
            let mut size = 0u32;
            labels[y * width + x] = Some(label);
            queue.push_back((x as i64, y as i64));

            while let Some((cx, cy)) = queue.pop_front() {
                size += 1;
                for (dx, dy) in NEIGHBOURS {
                    let (nx, ny) = (cx + dx, cy + dy);
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    let idx = ny as usize * width + nx as usize;
                    if labels[idx].is_none() && !mask.get(nx, ny) {
                        labels[idx] = Some(label);
                        queue.push_back((nx, ny));
                    }
                }
            }
            sizes.push(size);
        }
    }

    (labels, sizes)
}

/// Pixel-corner outline around a component, clockwise on screen
///
/// Walks the cracks between member and non-member pixels keeping the
/// component on the right, turning left first so diagonal neighbours stay
/// on the same outline. `start` must be the first pixel of the component in
/// raster order; the walk begins at its top-left corner heading east.
fn trace_outer_boundary(
    labels: &[Option<usize>],
    width: usize,
    height: usize,
    label: usize,
    start: (i64, i64),
) -> Vec<(i64, i64)> {
    let member = |x: i64, y: i64| {
        x >= 0
            && y >= 0
            && (x as usize) < width
            && (y as usize) < height
            && labels[y as usize * width + x as usize] == Some(label)
    };
    // Pixel ahead and to the right of `corner` when moving along `heading`
    let right_of = |corner: (i64, i64), heading: (i64, i64)| {
        let (ox, oy) = match heading {
            (1, 0) => (0, 0),
            (0, 1) => (-1, 0),
            (-1, 0) => (-1, -1),
            _ => (0, -1),
        };
        member(corner.0 + ox, corner.1 + oy)
    };
    const EAST: (i64, i64) = (1, 0);

    let mut outline = Vec::new();
    let mut corner = start;
    let mut heading = EAST;
    let limit = 4 * (width + 1) * (height + 1);

    for _ in 0..limit {
        outline.push(corner);
        corner = (corner.0 + heading.0, corner.1 + heading.1);

        let left = (heading.1, -heading.0);
        heading = if right_of(corner, left) {
            left
        } else if right_of(corner, heading) {
            heading
        } else {
            (-heading.1, heading.0)
        };
        if corner == start && heading == EAST {
            break;
        }
    }
    outline
}

/// Keep only the corners where the step direction changes
fn compress_runs(trace: &[(i64, i64)]) -> Vec<Point> {
    let n = trace.len();
    if n < 3 {
        return trace
            .iter()
            .map(|&(x, y)| Point::new(x as i32, y as i32))
            .collect();
    }

    (0..n)
        .filter(|&i| {
            let prev = trace[(i + n - 1) % n];
            let cur = trace[i];
            let next = trace[(i + 1) % n];
            (cur.0 - prev.0, cur.1 - prev.1) != (next.0 - cur.0, next.1 - cur.1)
        })
        .map(|i| Point::new(trace[i].0 as i32, trace[i].1 as i32))
        .collect()
}
