use crate::error::{NavError, Result};

/// Row-major boolean grid where `true` marks a water pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl WaterMask {
    /// Create a mask with every pixel set to `water`
    pub fn new(width: usize, height: usize, water: bool) -> Self {
        Self {
            width,
            height,
            cells: vec![water; width * height],
        }
    }

    pub fn all_water(width: usize, height: usize) -> Self {
        Self::new(width, height, true)
    }

    /// Wrap an existing row-major cell buffer
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(NavError::EmptyMask { width, height });
        }
        let expected = width * height;
        if cells.len() != expected {
            return Err(NavError::MaskSize {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a mask from an already classified grayscale image
    ///
    /// Pixels with luma at or above `threshold` are water. With `invert`
    /// the meaning flips (dark = water).
    pub fn from_luma(image: &image::GrayImage, threshold: u8, invert: bool) -> Result<Self> {
        let (w, h) = image.dimensions();
        let cells = image
            .pixels()
            .map(|p| (p.0[0] >= threshold) != invert)
            .collect();
        Self::from_cells(w as usize, h as usize, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Water state of a pixel; out-of-range pixels are not water
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    pub fn set(&mut self, x: usize, y: usize, water: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = water;
        }
    }

    /// True if a continuous position lies inside the map rectangle
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64
    }

    /// Water state of the pixel containing a continuous position
    pub fn is_water_at(&self, x: f64, y: f64) -> bool {
        self.in_bounds(x, y) && self.get(x.floor() as i64, y.floor() as i64)
    }

    pub fn water_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.cells.iter().filter(|&&c| c).count() as f64 / self.cells.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells_rejects_empty() {
        assert!(matches!(
            WaterMask::from_cells(0, 10, Vec::new()),
            Err(NavError::EmptyMask { .. })
        ));
    }

    #[test]
    fn test_from_cells_rejects_size_mismatch() {
        let err = WaterMask::from_cells(4, 4, vec![true; 15]).unwrap_err();
        assert!(matches!(
            err,
            NavError::MaskSize {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_out_of_bounds_is_not_water() {
        let mask = WaterMask::all_water(10, 10);
        assert!(mask.is_water_at(0.0, 0.0));
        assert!(mask.is_water_at(9.99, 9.99));
        assert!(!mask.is_water_at(10.0, 5.0));
        assert!(!mask.is_water_at(-0.1, 5.0));
        assert!(!mask.get(-1, 0));
    }

    #[test]
    fn test_from_luma_threshold_and_invert() {
        let mut img = image::GrayImage::new(2, 1);
        img.put_pixel(0, 0, image::Luma([255]));
        img.put_pixel(1, 0, image::Luma([0]));

        let mask = WaterMask::from_luma(&img, 128, false).unwrap();
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));

        let inverted = WaterMask::from_luma(&img, 128, true).unwrap();
        assert!(!inverted.get(0, 0));
        assert!(inverted.get(1, 0));
    }

    #[test]
    fn test_water_fraction() {
        let mut mask = WaterMask::all_water(2, 2);
        mask.set(0, 0, false);
        assert!((mask.water_fraction() - 0.75).abs() < 1e-9);
    }
}
