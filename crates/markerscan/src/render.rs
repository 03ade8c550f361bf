//! Synthetic marker images.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use markerscan_aruco::{rotate_code_u64, Dictionary};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Where and how to draw one marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerPlacement {
    pub id: u32,
    /// Quarter turns clockwise.
    pub rotation: u8,
    /// Top-left pixel of the black border.
    pub x: u32,
    pub y: u32,
    /// Side of one cell in pixels.
    pub cell_px: u32,
}

/// Draw a marker with a one-cell black border onto `canvas`.
///
/// Returns `false` (and draws nothing) when the id is not in the
/// dictionary or the marker does not fit.
pub fn draw_marker(canvas: &mut RgbImage, dict: &Dictionary, placement: MarkerPlacement) -> bool {
    let Some(code) = dict.code(placement.id) else {
        return false;
    };
    let n = dict.marker_size;
    let cells = n as u32 + 2;
    let side = cells * placement.cell_px;
    if placement.cell_px == 0
        || placement.x + side > canvas.width()
        || placement.y + side > canvas.height()
    {
        return false;
    }

    let code = rotate_code_u64(code, n, placement.rotation);
    let cell = placement.cell_px;
    let outer = Rect::at(placement.x as i32, placement.y as i32).of_size(side, side);
    draw_filled_rect_mut(canvas, outer, BLACK);
    for cy in 0..n {
        for cx in 0..n {
            if (code >> (cy * n + cx)) & 1 == 0 {
                let x = placement.x + (cx as u32 + 1) * cell;
                let y = placement.y + (cy as u32 + 1) * cell;
                let rect = Rect::at(x as i32, y as i32).of_size(cell, cell);
                draw_filled_rect_mut(canvas, rect, WHITE);
            }
        }
    }
    true
}

/// Render marker `id` centred on a white canvas with `quiet_cells` of
/// white margin on every side.
pub fn render_marker(
    dict: &Dictionary,
    id: u32,
    cell_px: u32,
    quiet_cells: u32,
) -> Option<RgbImage> {
    if cell_px == 0 || dict.code(id).is_none() {
        return None;
    }
    let side = (dict.marker_size as u32 + 2 + 2 * quiet_cells) * cell_px;
    let mut canvas = RgbImage::from_pixel(side, side, WHITE);
    let placement = MarkerPlacement {
        id,
        rotation: 0,
        x: quiet_cells * cell_px,
        y: quiet_cells * cell_px,
        cell_px,
    };
    draw_marker(&mut canvas, dict, placement).then_some(canvas)
}
