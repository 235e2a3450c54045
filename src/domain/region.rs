use super::Polygon;

/// One connected land mass as produced by a boundary extractor
#[derive(Debug, Clone)]
pub struct RawRegion {
    pub polygon: Polygon,
    /// Number of land pixels enclosed by the region
    pub pixel_area: u32,
}

impl RawRegion {
    pub fn new(polygon: Polygon, pixel_area: u32) -> Self {
        Self {
            polygon,
            pixel_area,
        }
    }
}

/// A refined land region, frozen once the authoritative mask is built
#[derive(Debug, Clone)]
pub struct Region {
    pub polygon: Polygon,
    pub pixel_area: u32,
    /// Shoelace area of the refined polygon
    pub area: f64,
    /// Vertex average of the refined polygon
    pub centroid: (f64, f64),
    /// Pixel area below the small-region threshold; such regions are
    /// pushed radially from their centroid
    pub small: bool,
}

impl Region {
    pub fn new(polygon: Polygon, pixel_area: u32, small_threshold: f64) -> Self {
        let area = polygon.area();
        let centroid = polygon.centroid();
        Self {
            polygon,
            pixel_area,
            area,
            centroid,
            small: (pixel_area as f64) < small_threshold,
        }
    }
}
