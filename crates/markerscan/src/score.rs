//! Geometric confidence for detected markers.

use log::warn;
use markerscan_core::{closed_perimeter, polygon_area};
use nalgebra::Point2;

/// Score returned when the geometry cannot be evaluated.
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Squareness of a marker outline in `[0, 1]`.
///
/// This is the isoperimetric ratio `4πA/P²` normalized by its value for a
/// square, i.e. `16A/P²`, so an ideal square scores `1.0` and skewed or
/// foreshortened quads score lower. The raw ratio tops out at `π/4 ≈ 0.785`
/// for a square and would never let a clean marker score above that. The
/// result is rounded to three decimals.
/// A zero perimeter scores `0.0`; non-finite geometry falls back to
/// [`FALLBACK_CONFIDENCE`].
pub fn marker_confidence(corners: &[Point2<f32>; 4]) -> f32 {
    let area = polygon_area(corners);
    let perimeter = closed_perimeter(corners);
    if !area.is_finite() || !perimeter.is_finite() {
        warn!("non-finite marker geometry, using fallback confidence");
        return FALLBACK_CONFIDENCE;
    }
    if perimeter <= 0.0 {
        return 0.0;
    }

    let ratio = 16.0 * area / (perimeter * perimeter);
    if !ratio.is_finite() {
        warn!("non-finite squareness ratio, using fallback confidence");
        return FALLBACK_CONFIDENCE;
    }
    ((ratio.clamp(0.0, 1.0) * 1000.0).round() / 1000.0) as f32
}
