//! Quadrilateral candidate localization.
//!
//! Pipeline: inverted adaptive threshold, outer border following,
//! Douglas-Peucker approximation and geometric acceptance tests.

use crate::contours::find_contours;
use crate::polygon::approx_closed_polygon;
use crate::threshold::adaptive_threshold_inv;
use log::debug;
use markerscan_core::{
    closed_perimeter, is_convex, min_side_length, polygon_area, signed_area, GrayImageView,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Parameters for [`locate_candidates`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerParams {
    /// Side of the adaptive-threshold window in pixels (odd values work best).
    pub adaptive_window: usize,
    /// Constant subtracted from the local mean before comparison.
    pub adaptive_offset: f32,
    /// Minimum contour length relative to the larger image side.
    pub min_perimeter_rate: f32,
    /// Maximum contour length relative to the larger image side.
    pub max_perimeter_rate: f32,
    /// Douglas-Peucker tolerance relative to the contour length.
    pub polygon_accuracy_rate: f32,
    /// Minimum quad area in square pixels.
    pub min_area: f32,
    /// Minimum side length relative to the quad perimeter.
    pub min_corner_distance_rate: f32,
    /// Minimum distance of every corner to the image edge, in pixels.
    pub min_distance_to_border: u32,
}

impl Default for LocalizerParams {
    fn default() -> Self {
        Self {
            adaptive_window: 23,
            adaptive_offset: 7.0,
            min_perimeter_rate: 0.03,
            max_perimeter_rate: 4.0,
            polygon_accuracy_rate: 0.03,
            min_area: 100.0,
            min_corner_distance_rate: 0.05,
            min_distance_to_border: 3,
        }
    }
}

/// A convex quadrilateral that may contain a marker.
///
/// Corners are wound clockwise in image coordinates (y down). Corner 0 is
/// arbitrary until the decoder fixes the marker's orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerCandidate {
    pub corners: [Point2<f32>; 4],
}

/// Find marker-shaped quads in a grayscale image.
///
/// Candidates are returned in raster order of the first pixel of their
/// contour.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(img, params),
        fields(width = img.width, height = img.height)
    )
)]
pub fn locate_candidates(
    img: &GrayImageView<'_>,
    params: &LocalizerParams,
) -> Vec<MarkerCandidate> {
    if img.width == 0 || img.height == 0 {
        return Vec::new();
    }

    let binary = adaptive_threshold_inv(img, params.adaptive_window, params.adaptive_offset);
    let contours = find_contours(&binary, img.width, img.height);

    let max_dim = img.width.max(img.height) as f32;
    let min_len = params.min_perimeter_rate * max_dim;
    let max_len = params.max_perimeter_rate * max_dim;

    let mut out = Vec::new();
    let mut outer = 0usize;
    for contour in contours.iter().filter(|c| !c.hole) {
        outer += 1;
        let len = contour.points.len() as f32;
        if len < min_len || len > max_len {
            continue;
        }
        let epsilon = f64::from(params.polygon_accuracy_rate * len);
        let poly = approx_closed_polygon(&contour.points, epsilon);
        if let Some(candidate) = accept_quad(&poly, img.width, img.height, params) {
            out.push(candidate);
        }
    }

    debug!(
        "localizer: {} contours ({} outer), {} quad candidates",
        contours.len(),
        outer,
        out.len()
    );
    out
}

fn accept_quad(
    poly: &[Point2<i32>],
    width: usize,
    height: usize,
    params: &LocalizerParams,
) -> Option<MarkerCandidate> {
    let &[a, b, c, d] = poly else {
        return None;
    };
    let mut corners = [a, b, c, d].map(|p| Point2::new(p.x as f32, p.y as f32));

    if !is_convex(&corners) {
        return None;
    }
    if polygon_area(&corners) < f64::from(params.min_area) {
        return None;
    }
    let perimeter = closed_perimeter(&corners);
    if min_side_length(&corners) < f64::from(params.min_corner_distance_rate) * perimeter {
        return None;
    }

    let margin = params.min_distance_to_border as f32;
    let max_x = width as f32 - 1.0 - margin;
    let max_y = height as f32 - 1.0 - margin;
    let off_frame = |p: &Point2<f32>| p.x < margin || p.y < margin || p.x > max_x || p.y > max_y;
    if corners.iter().any(off_frame) {
        return None;
    }

    if signed_area(&corners) < 0.0 {
        corners.swap(1, 3);
    }
    Some(MarkerCandidate { corners })
}
