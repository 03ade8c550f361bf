//! Full-image marker scan: localize quads, decode each one, and drop
//! candidates that are interior structure of an accepted marker.

use crate::decode::{decode_candidate, CandidateRejection, DecodedMarker, DecoderParams};
use crate::localize::{locate_candidates, LocalizerParams, MarkerCandidate};
use crate::Matcher;
use log::debug;
use markerscan_core::{centroid, contains_point, polygon_area, GrayImageView};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Decoded markers plus the number of candidates that failed decoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanOutcome {
    /// Accepted markers in localizer discovery order.
    pub markers: Vec<DecodedMarker>,
    /// Candidates that were rejected by the decoder and are not nested
    /// inside an accepted marker.
    pub rejected: usize,
}

/// Localize and decode all markers in a grayscale image.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, localizer, decoder, matcher),
        fields(width = img.width, height = img.height)
    )
)]
pub fn scan_image(
    img: &GrayImageView<'_>,
    localizer: &LocalizerParams,
    decoder: &DecoderParams,
    matcher: &Matcher,
) -> ScanOutcome {
    let candidates = locate_candidates(img, localizer);
    let decoded: Vec<(MarkerCandidate, Result<DecodedMarker, CandidateRejection>)> = candidates
        .into_iter()
        .map(|c| {
            let res = decode_candidate(img, &c, decoder, matcher);
            (c, res)
        })
        .collect();

    let accepted: Vec<&DecodedMarker> = decoded
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok())
        .collect();

    let mut out = ScanOutcome::default();
    for (candidate, result) in &decoded {
        if is_nested_in_accepted(&candidate.corners, &accepted) {
            debug!("dropping candidate nested in an accepted marker");
            continue;
        }
        match result {
            Ok(marker) => out.markers.push(*marker),
            Err(reason) => {
                debug!("candidate rejected: {reason}");
                out.rejected += 1;
            }
        }
    }

    debug!(
        "scan: {} candidates, {} markers, {} rejected",
        decoded.len(),
        out.markers.len(),
        out.rejected
    );
    out
}

/// `true` when the quad's centroid lies inside a strictly larger accepted
/// marker.
fn is_nested_in_accepted(corners: &[Point2<f32>; 4], accepted: &[&DecodedMarker]) -> bool {
    let c = centroid(corners);
    let area = polygon_area(corners);
    accepted
        .iter()
        .filter(|m| polygon_area(&m.corners) > area)
        .any(|m| contains_point(&m.corners, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::DICT_4X4_50;
    use crate::matcher::rotate_code_u64;
    use markerscan_core::GrayImage;

    fn paint_marker(
        data: &mut [u8],
        stride: usize,
        id: u32,
        rot: u8,
        cell: usize,
        x0: usize,
        y0: usize,
    ) {
        let code = rotate_code_u64(DICT_4X4_50.codes[id as usize], 4, rot);
        for cy in 0..6 {
            for cx in 0..6 {
                let border = cx == 0 || cy == 0 || cx == 5 || cy == 5;
                let black = border || (code >> ((cy - 1) * 4 + (cx - 1))) & 1 == 1;
                if !black {
                    continue;
                }
                for y in 0..cell {
                    let row = (y0 + cy * cell + y) * stride;
                    data[row + x0 + cx * cell..row + x0 + (cx + 1) * cell].fill(0);
                }
            }
        }
    }

    fn near(p: Point2<f32>, x: f32, y: f32) -> bool {
        (p.x - x).abs() < 1.5 && (p.y - y).abs() < 1.5
    }

    fn scan(img: &GrayImage) -> ScanOutcome {
        scan_image(
            &img.view(),
            &LocalizerParams::default(),
            &DecoderParams::default(),
            &Matcher::exact(DICT_4X4_50),
        )
    }

    #[test]
    fn single_marker_has_no_rejections() {
        let (w, h) = (200, 160);
        let mut data = vec![255u8; w * h];
        paint_marker(&mut data, w, 7, 0, 20, 40, 20);
        let img = GrayImage::from_raw(w, h, data).expect("shape");

        let out = scan(&img);
        assert_eq!(out.markers.len(), 1);
        assert_eq!(out.markers[0].id, 7);
        assert_eq!(out.rejected, 0);

        let tl = out.markers[0].corners[0];
        assert!(near(tl, 40.0, 20.0), "{tl:?}");
    }

    #[test]
    fn two_markers_come_out_in_raster_order() {
        let (w, h) = (320, 200);
        let mut data = vec![255u8; w * h];
        paint_marker(&mut data, w, 3, 0, 16, 200, 20);
        paint_marker(&mut data, w, 41, 2, 16, 30, 80);
        let img = GrayImage::from_raw(w, h, data).expect("shape");

        let out = scan(&img);
        let ids: Vec<u32> = out.markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 41]);
        // Painted upside down: the logical top-left sits at the bottom-right.
        let tl = out.markers[1].corners[0];
        assert!(near(tl, 125.0, 175.0), "{tl:?}");
        assert_eq!(out.rejected, 0);
    }

    #[test]
    fn dark_square_without_code_counts_as_rejected() {
        let (w, h) = (160, 160);
        let mut data = vec![255u8; w * h];
        for y in 40..100 {
            data[y * w + 40..y * w + 100].fill(0);
        }
        let img = GrayImage::from_raw(w, h, data).expect("shape");

        let out = scan(&img);
        assert!(out.markers.is_empty());
        assert_eq!(out.rejected, 1);
    }

    #[test]
    fn nested_check_requires_a_larger_enclosing_marker() {
        let big = DecodedMarker {
            id: 1,
            rotation: 0,
            hamming: 0,
            code: 0,
            border_score: 1.0,
            corners: [
                Point2::new(0.0, 0.0),
                Point2::new(100.0, 0.0),
                Point2::new(100.0, 100.0),
                Point2::new(0.0, 100.0),
            ],
        };
        let small = [
            Point2::new(40.0, 40.0),
            Point2::new(60.0, 40.0),
            Point2::new(60.0, 60.0),
            Point2::new(40.0, 60.0),
        ];
        assert!(is_nested_in_accepted(&small, &[&big]));
        assert!(!is_nested_in_accepted(&big.corners, &[&big]));
    }
}
