use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::geometric_transformations::{rotate_about_center, warp, Interpolation, Projection};
use imageproc::rect::Rect;
use markerscan::aruco::builtins::DICT_4X4_50;
use markerscan::{
    detect_markers, detect_markers_with_annotation, draw_marker, encode_png, render_marker,
    DetectError, DetectionResult, DetectorParams, MarkerDetector, MarkerPlacement,
};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn png_bytes(img: &RgbImage) -> Vec<u8> {
    encode_png(img).expect("encode png")
}

fn canvas(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, WHITE)
}

fn place(canvas: &mut RgbImage, id: u32, rotation: u8, x: u32, y: u32, cell_px: u32) {
    let placement = MarkerPlacement {
        id,
        rotation,
        x,
        y,
        cell_px,
    };
    let drawn = draw_marker(canvas, &DICT_4X4_50, placement);
    assert!(drawn, "marker {id} does not fit");
}

/// Check the corners of the first marker, in order, against `expected`.
fn assert_corners(res: &DetectionResult, expected: [(f32, f32); 4], tol: f32) {
    for (c, e) in res.markers[0].corners.iter().zip(expected) {
        let close = (c.x - e.0).abs() <= tol && (c.y - e.1).abs() <= tol;
        assert!(close, "{c:?} vs {e:?}");
    }
}

#[test]
fn clean_marker_seven_is_detected_with_high_confidence() {
    let img = render_marker(&DICT_4X4_50, 7, 20, 2).expect("render");
    let res = detect_markers(&png_bytes(&img)).expect("detect");

    assert_eq!(res.total_markers(), 1);
    let m = &res.markers[0];
    assert_eq!(m.id, 7);
    assert!(m.confidence > 0.9, "confidence {}", m.confidence);
    assert_eq!(res.rejected_count, 0);
    assert_eq!((res.image_width, res.image_height), (200, 200));

    // Quiet zone of two cells: the border starts at (40, 40) and ends at 159.
    let expected = [(40.0, 40.0), (159.0, 40.0), (159.0, 159.0), (40.0, 159.0)];
    assert_corners(&res, expected, 1.5);
}

#[test]
fn blank_image_has_nothing() {
    let res = detect_markers(&png_bytes(&canvas(320, 240))).expect("detect");
    assert_eq!(res.total_markers(), 0);
    assert!(res.markers.is_empty());
    assert_eq!(res.rejected_count, 0);

    let json = serde_json::to_value(&res).expect("json");
    assert_eq!(json["detected_markers"], serde_json::json!([]));
    assert_eq!(json["image_size"]["width"], 320);
}

#[test]
fn every_rotation_decodes_to_the_same_marker() {
    let detector = MarkerDetector::default();
    let (x0, side) = (30.0_f32, 6.0 * 16.0 - 1.0);
    let geometric = [
        (x0, x0),
        (x0 + side, x0),
        (x0 + side, x0 + side),
        (x0, x0 + side),
    ];

    for rotation in 0..4u8 {
        let mut img = canvas(160, 160);
        place(&mut img, 23, rotation, 30, 30, 16);
        let res = detector.detect_image(&img).expect("detect");
        assert_eq!(res.ids(), vec![23], "rotation {rotation}");

        // The logical top-left corner travels clockwise with the marker.
        let tl = res.markers[0].corners[0];
        let e = geometric[rotation as usize];
        assert!(
            (tl.x - e.0).abs() <= 1.5 && (tl.y - e.1).abs() <= 1.5,
            "rotation {rotation}: {tl:?} vs {e:?}"
        );
    }
}

#[test]
fn several_markers_keep_discovery_order() {
    let mut img = canvas(400, 300);
    place(&mut img, 42, 0, 240, 20, 15);
    place(&mut img, 0, 1, 20, 40, 15);
    place(&mut img, 17, 3, 140, 170, 15);

    let detector = MarkerDetector::default();
    let res = detector.detect_image(&img).expect("detect");
    assert_eq!(res.ids(), vec![42, 0, 17]);
    assert_eq!(res.rejected_count, 0);
    for m in &res.markers {
        assert_eq!(m.corners.len(), 4);
        assert!((0.0..=1.0).contains(&m.confidence));
    }
}

#[test]
fn invalid_bytes_are_decode_errors() {
    assert!(matches!(
        detect_markers(b"\x89PNG\r\n\x1a\nnot really"),
        Err(DetectError::Decode(_))
    ));
    let err = detect_markers(&[0u8; 64]).unwrap_err();
    assert!(matches!(err, DetectError::Decode(_)));

    let bytes = png_bytes(&render_marker(&DICT_4X4_50, 1, 10, 1).expect("render"));
    assert!(detect_markers(&bytes[..bytes.len() - 40]).is_err());
}

#[test]
fn annotation_matches_plain_detection() {
    let mut img = canvas(260, 200);
    place(&mut img, 5, 2, 20, 30, 14);
    place(&mut img, 33, 0, 150, 60, 14);
    let bytes = png_bytes(&img);

    let plain = detect_markers(&bytes).expect("detect");
    let (annotated_res, annotated) = detect_markers_with_annotation(&bytes).expect("annotate");

    assert_eq!(plain, annotated_res);
    assert_eq!(plain.total_markers(), 2);
    assert_eq!(annotated.dimensions(), img.dimensions());
    assert_ne!(annotated, img);
}

#[test]
fn tolerant_matcher_is_opt_in() {
    // Marker 9 with 16 px cells starts at (32, 32); paint its white data
    // cell (1, 1) black so the code is one bit off.
    let mut img = render_marker(&DICT_4X4_50, 9, 16, 2).expect("render");
    assert_eq!(*img.get_pixel(72, 72), WHITE);
    draw_filled_rect_mut(&mut img, Rect::at(64, 64).of_size(16, 16), Rgb([0, 0, 0]));

    let detector = MarkerDetector::default();
    let exact = detector.detect_image(&img).expect("detect");
    assert!(exact.ids().is_empty());
    assert_eq!(exact.rejected_count, 1);

    let params = DetectorParams {
        max_hamming: 1,
        ..Default::default()
    };
    let tolerant = MarkerDetector::new(params);
    assert_eq!(tolerant.params().max_hamming, 1);
    let res = tolerant.detect_image(&img).expect("detect");
    assert_eq!(res.ids(), vec![9]);
    assert_eq!(res.rejected_count, 0);
}

#[test]
fn marker_rotated_off_axis_still_decodes() {
    let mut img = canvas(280, 280);
    place(&mut img, 7, 0, 60, 60, 20);
    // Clockwise by 30 degrees about the image centre (140, 140).
    let turned = rotate_about_center(&img, 30f32.to_radians(), Interpolation::Bilinear, WHITE);

    let detector = MarkerDetector::default();
    let res = detector.detect_image(&turned).expect("detect");
    assert_eq!(res.ids(), vec![7]);
    assert_eq!(res.rejected_count, 0);
    let expected = [(110.7, 30.7), (214.6, 90.7), (154.6, 194.6), (50.7, 134.6)];
    assert_corners(&res, expected, 3.0);
}

#[test]
fn perspective_warped_marker_still_decodes() {
    let mut img = canvas(280, 280);
    place(&mut img, 7, 0, 60, 60, 20);
    let border = [(60.0, 60.0), (180.0, 60.0), (180.0, 180.0), (60.0, 180.0)];
    let seen = [(70.0, 55.0), (190.0, 75.0), (180.0, 200.0), (55.0, 180.0)];
    let projection = Projection::from_control_points(border, seen).expect("projection");
    let warped = warp(&img, &projection, Interpolation::Bilinear, WHITE);

    let detector = MarkerDetector::default();
    let res = detector.detect_image(&warped).expect("detect");
    assert_eq!(res.ids(), vec![7]);
    assert_eq!(res.rejected_count, 0);
    assert_corners(&res, seen, 3.0);
    assert!(res.markers[0].confidence < 1.0);
}

#[test]
fn jpeg_input_is_sniffed_from_bytes() {
    let img = render_marker(&DICT_4X4_50, 11, 20, 2).expect("render");
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90)
        .encode_image(&img)
        .expect("encode jpeg");

    let res = detect_markers(&jpeg).expect("detect");
    assert_eq!(res.ids(), vec![11]);
}
