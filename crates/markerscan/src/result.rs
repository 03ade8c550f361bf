use nalgebra::Point2;
use serde::ser::{Serialize, Serializer};

/// One identified marker.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedMarker {
    /// Dictionary id.
    pub id: u32,
    /// Top-left, top-right, bottom-right, bottom-left in the marker's own
    /// frame, in image pixels.
    pub corners: [Point2<f32>; 4],
    /// Geometric quality in `[0, 1]`, see [`crate::marker_confidence`].
    pub confidence: f32,
}

/// Everything one detection pass produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    /// Markers in discovery order.
    pub markers: Vec<DetectedMarker>,
    pub image_width: u32,
    pub image_height: u32,
    /// Candidates that looked like markers but failed decoding.
    pub rejected_count: usize,
}

impl DetectionResult {
    #[inline]
    pub fn total_markers(&self) -> usize {
        self.markers.len()
    }

    /// Ids of all detected markers in discovery order.
    pub fn ids(&self) -> Vec<u32> {
        self.markers.iter().map(|m| m.id).collect()
    }
}

#[derive(serde::Serialize)]
struct MarkerJson {
    id: u32,
    corners: [[f32; 2]; 4],
    confidence: f32,
}

#[derive(serde::Serialize)]
struct ImageSizeJson {
    width: u32,
    height: u32,
}

#[derive(serde::Serialize)]
struct ResultJson<'a> {
    detected_markers: &'a [DetectedMarker],
    total_markers: usize,
    image_size: ImageSizeJson,
    rejected_candidates: usize,
}

impl Serialize for DetectedMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MarkerJson {
            id: self.id,
            corners: self.corners.map(|p| [p.x, p.y]),
            confidence: self.confidence,
        }
        .serialize(serializer)
    }
}

/// Serializes as
/// `{"detected_markers": [...], "total_markers": n, "image_size": {...}, "rejected_candidates": n}`.
impl Serialize for DetectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ResultJson {
            detected_markers: &self.markers,
            total_markers: self.markers.len(),
            image_size: ImageSizeJson {
                width: self.image_width,
                height: self.image_height,
            },
            rejected_candidates: self.rejected_count,
        }
        .serialize(serializer)
    }
}
