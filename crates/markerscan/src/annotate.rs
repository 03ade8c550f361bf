//! Overlay rendering for detection results.

use crate::{DetectedMarker, DetectionResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use log::warn;
use nalgebra::Point2;

const OUTLINE: Rgb<u8> = Rgb([0, 255, 0]);
const FIRST_CORNER: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL: Rgb<u8> = Rgb([0, 0, 255]);

/// 3x5 glyphs, one row per byte, bit 2 = leftmost column.
const GLYPH_W: i32 = 3;
const GLYPH_H: i32 = 5;

fn glyph(c: char) -> Option<[u8; 5]> {
    Some(match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'i' => [0b010, 0b000, 0b010, 0b010, 0b010],
        'd' => [0b001, 0b001, 0b111, 0b101, 0b111],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        _ => return None,
    })
}

fn draw_label(img: &mut RgbImage, text: &str, x: i32, y: i32, scale: u32) {
    let s = scale as i32;
    let mut cursor = x;
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (row, &bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits >> (GLYPH_W - 1 - col) & 1 == 1 {
                        let rect =
                            Rect::at(cursor + col * s, y + row as i32 * s).of_size(scale, scale);
                        draw_filled_rect_mut(img, rect, LABEL);
                    }
                }
            }
        }
        cursor += (GLYPH_W + 1) * s;
    }
}

/// Draw every detected marker onto a copy of `image`.
///
/// Each marker gets a green outline, a red square on its logical top-left
/// corner and an `id=N` label next to it. The input is never modified; an
/// empty result or unusable geometry yields a plain copy.
pub fn annotate(image: &RgbImage, result: &DetectionResult) -> RgbImage {
    let mut out = image.clone();
    if result.markers.is_empty() {
        return out;
    }

    let finite = |p: &Point2<f32>| p.x.is_finite() && p.y.is_finite();
    let usable = |m: &DetectedMarker| m.corners.iter().all(finite);
    if !result.markers.iter().all(usable) {
        warn!("skipping annotation: marker corners are not finite");
        return out;
    }

    let scale = (image.width().min(image.height()) / 320).clamp(1, 4);
    let dot = scale as i32 * 2 + 2;

    for m in &result.markers {
        for k in 0..4 {
            let a = m.corners[k];
            let b = m.corners[(k + 1) % 4];
            draw_line_segment_mut(&mut out, (a.x, a.y), (b.x, b.y), OUTLINE);
        }

        let c0 = m.corners[0];
        let (cx, cy) = (c0.x.round() as i32, c0.y.round() as i32);
        let rect = Rect::at(cx - dot / 2, cy - dot / 2).of_size(dot as u32, dot as u32);
        draw_filled_rect_mut(&mut out, rect, FIRST_CORNER);

        let label_y = cy - dot - GLYPH_H * scale as i32;
        draw_label(&mut out, &format!("id={}", m.id), cx, label_y, scale);
    }

    out
}
