//! Candidate decoding: perspective warp, cell sampling, border check and
//! dictionary lookup.

use crate::localize::MarkerCandidate;
use crate::threshold::otsu_threshold_from_samples;
use crate::Matcher;
use markerscan_core::{warp_perspective_gray, GrayImage, GrayImageView, Homography};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Parameters for [`decode_candidate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderParams {
    /// Marker border width in cells.
    pub border_bits: usize,
    /// Side of one cell in the rectified patch, in pixels.
    pub cell_px: usize,
    /// Fraction of a cell ignored on each side when averaging.
    pub cell_margin_rate: f32,
    /// Below this patch standard deviation Otsu is skipped and the fixed
    /// mid-level 128 is used instead.
    pub min_otsu_std_dev: f32,
    /// Required fraction of dark border cells (`1.0` = the whole ring).
    pub min_border_score: f32,
}

impl Default for DecoderParams {
    fn default() -> Self {
        Self {
            border_bits: 1,
            cell_px: 8,
            cell_margin_rate: 0.13,
            min_otsu_std_dev: 5.0,
            min_border_score: 1.0,
        }
    }
}

/// A candidate that decoded to a dictionary marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedMarker {
    pub id: u32,
    /// Quarter turns (clockwise) between the dictionary code and the
    /// candidate's original corner order.
    pub rotation: u8,
    pub hamming: u8,
    /// Observed inner bits (row-major, black = 1) before rotation.
    pub code: u64,
    /// Fraction of dark border cells.
    pub border_score: f32,
    /// TL, TR, BR, BL of the marker in its own frame.
    pub corners: [Point2<f32>; 4],
}

/// Why a candidate did not decode.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CandidateRejection {
    #[error("candidate quad is degenerate")]
    Degenerate,
    #[error("border score {score:.3} below {min:.3}")]
    BorderMismatch { score: f32, min: f32 },
    #[error("sampled code {code:#06x} matches no codeword")]
    NoCodeword { code: u64 },
}

/// Bits read from a rectified patch.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CellSample {
    code: u64,
    border_score: f32,
}

/// Decode one candidate against the matcher's dictionary.
pub fn decode_candidate(
    img: &GrayImageView<'_>,
    candidate: &MarkerCandidate,
    params: &DecoderParams,
    matcher: &Matcher,
) -> Result<DecodedMarker, CandidateRejection> {
    let bits = matcher.dictionary().marker_size;
    let cells = bits + 2 * params.border_bits;
    let cell_px = params.cell_px.max(1);
    let side = cells * cell_px;

    let finite = |p: &Point2<f32>| p.x.is_finite() && p.y.is_finite();
    if !candidate.corners.iter().all(finite) {
        return Err(CandidateRejection::Degenerate);
    }
    let h = Homography::square_to_quad(side as f32, &candidate.corners)
        .ok_or(CandidateRejection::Degenerate)?;
    let patch = warp_perspective_gray(img, &h, side, side);

    let sample = read_cells(&patch, cells, cell_px, bits, params);
    if sample.border_score < params.min_border_score {
        return Err(CandidateRejection::BorderMismatch {
            score: sample.border_score,
            min: params.min_border_score,
        });
    }

    let m = matcher
        .match_code(sample.code)
        .ok_or(CandidateRejection::NoCodeword { code: sample.code })?;

    let r = m.rotation as usize;
    let corners = std::array::from_fn(|k| candidate.corners[(k + r) % 4]);

    Ok(DecodedMarker {
        id: m.id,
        rotation: m.rotation,
        hamming: m.hamming,
        code: sample.code,
        border_score: sample.border_score,
        corners,
    })
}

fn read_cells(
    patch: &GrayImage,
    cells: usize,
    cell_px: usize,
    bits: usize,
    params: &DecoderParams,
) -> CellSample {
    let means = cell_means(patch, cells, cell_px, params.cell_margin_rate);

    // Fixed mid-level for low-contrast patches, Otsu otherwise.
    let cutoff = if patch_std_dev(&patch.data) < params.min_otsu_std_dev {
        128.0
    } else {
        f32::from(otsu_threshold_from_samples(&patch.data)) + 0.5
    };

    let border = params.border_bits;
    let mut border_black = 0u32;
    let mut border_total = 0u32;
    let mut code = 0u64;
    for cy in 0..cells {
        for cx in 0..cells {
            let black = means[cy * cells + cx] < cutoff;
            let in_border =
                cx < border || cy < border || cx >= cells - border || cy >= cells - border;
            if in_border {
                border_total += 1;
                border_black += black as u32;
            } else if black {
                let bit = (cy - border) * bits + (cx - border);
                code |= 1u64 << bit;
            }
        }
    }

    let border_score = if border_total == 0 {
        1.0
    } else {
        border_black as f32 / border_total as f32
    };
    CellSample { code, border_score }
}

/// Mean intensity of every cell, ignoring a margin on each side.
fn cell_means(patch: &GrayImage, cells: usize, cell_px: usize, margin_rate: f32) -> Vec<f32> {
    let mut margin = (cell_px as f32 * margin_rate).round().max(0.0) as usize;
    if 2 * margin >= cell_px {
        margin = 0;
    }

    let mut out = Vec::with_capacity(cells * cells);
    for cy in 0..cells {
        for cx in 0..cells {
            let (x0, y0) = (cx * cell_px + margin, cy * cell_px + margin);
            let (x1, y1) = ((cx + 1) * cell_px - margin, (cy + 1) * cell_px - margin);
            let mut sum = 0u32;
            for y in y0..y1 {
                let row = &patch.data[y * patch.width + x0..y * patch.width + x1];
                sum += row.iter().map(|&v| v as u32).sum::<u32>();
            }
            let n = ((x1 - x0) * (y1 - y0)) as f32;
            out.push(sum as f32 / n);
        }
    }
    out
}

fn patch_std_dev(data: &[u8]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let n = data.len() as f64;
    let mean = data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = data
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    var.sqrt() as f32
}
