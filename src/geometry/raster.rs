use crate::domain::{Polygon, WaterMask};

/// Build the authoritative water mask from refined land polygons
///
/// A pixel is land when its centre lies inside a polygon (even-odd rule);
/// everything else is water.
pub fn rasterize_land<'a, I>(width: usize, height: usize, polygons: I) -> WaterMask
where
    I: IntoIterator<Item = &'a Polygon>,
{
    let mut mask = WaterMask::all_water(width, height);
    for polygon in polygons {
        fill_polygon(&mut mask, polygon);
    }
    mask
}

fn fill_polygon(mask: &mut WaterMask, polygon: &Polygon) {
    let n = polygon.len();
    if n < 3 {
        return;
    }
    let Some(bounds) = polygon.bounds() else {
        return;
    };

    let y_start = bounds.min_y.floor().max(0.0) as usize;
    let y_end = (bounds.max_y.ceil().max(0.0) as usize).min(mask.height());
    let mut crossings: Vec<f64> = Vec::with_capacity(8);

    for py in y_start..y_end {
        let yc = py as f64 + 0.5;
        crossings.clear();

        for i in 0..n {
            let (x1, y1) = polygon.points[i].as_f64();
            let (x2, y2) = polygon.points[(i + 1) % n].as_f64();
            if (y1 <= yc) != (y2 <= yc) {
                crossings.push(x1 + (yc - y1) * (x2 - x1) / (y2 - y1));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            // Pixel centres px + 0.5 in [left, right)
            let first = (pair[0] - 0.5).ceil().max(0.0) as usize;
            let last = ((pair[1] - 0.5).ceil().max(0.0) as usize).min(mask.width());
            for px in first..last {
                mask.set(px, py, false);
            }
        }
    }
}
