//! Line-of-sight checks by sampling a segment at a fixed pixel interval
//!
//! Land slivers narrower than the sampling step can slip between samples;
//! the step is configurable for that reason.

use crate::domain::WaterMask;

/// True if every sample along `from -> to` is in bounds and on water
pub fn segment_on_water(mask: &WaterMask, from: (f64, f64), to: (f64, f64), step: f64) -> bool {
    segment_prefix_on_water(mask, from, to, 1.0, step)
}

/// Like [`segment_on_water`] but only the first `fraction` of the segment
/// (measured from `from`) has to be clear
pub fn segment_prefix_on_water(
    mask: &WaterMask,
    from: (f64, f64),
    to: (f64, f64),
    fraction: f64,
    step: f64,
) -> bool {
    let fraction = fraction.clamp(0.0, 1.0);
    let dx = (to.0 - from.0) * fraction;
    let dy = (to.1 - from.1) * fraction;
    let length = dx.hypot(dy);

    if length < 1.0 {
        return mask.is_water_at(from.0, from.1);
    }

    let samples = (length / step.max(f64::EPSILON)).ceil() as usize;
    (0..=samples).all(|i| {
        let t = i as f64 / samples as f64;
        mask.is_water_at(from.0 + dx * t, from.1 + dy * t)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with_wall() -> WaterMask {
        // Vertical land wall at x = 10, rows 0..15
        let mut mask = WaterMask::all_water(20, 20);
        for y in 0..15 {
            mask.set(10, y, false);
        }
        mask
    }

    #[test]
    fn test_clear_segment() {
        let mask = mask_with_wall();
        assert!(segment_on_water(&mask, (2.5, 17.5), (18.5, 17.5), 1.0));
    }

    #[test]
    fn test_blocked_segment() {
        let mask = mask_with_wall();
        assert!(!segment_on_water(&mask, (2.5, 5.5), (18.5, 5.5), 1.0));
    }

    #[test]
    fn test_prefix_stops_before_wall() {
        let mask = mask_with_wall();
        // Wall sits at 50% of the way; checking 40% is clear
        assert!(segment_prefix_on_water(&mask, (0.5, 5.5), (20.0, 5.5), 0.4, 1.0));
        assert!(!segment_prefix_on_water(&mask, (0.5, 5.5), (20.0, 5.5), 0.9, 1.0));
    }

    #[test]
    fn test_leaving_the_map_is_blocked() {
        let mask = WaterMask::all_water(10, 10);
        assert!(!segment_on_water(&mask, (5.0, 5.0), (15.0, 5.0), 1.0));
    }

    #[test]
    fn test_zero_length_uses_endpoint() {
        let mask = mask_with_wall();
        assert!(segment_on_water(&mask, (3.0, 3.0), (3.2, 3.0), 1.0));
        assert!(!segment_on_water(&mask, (10.5, 3.0), (10.5, 3.0), 1.0));
    }
}
