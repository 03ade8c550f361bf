//! Thresholding utilities for localization and cell binarization.

use markerscan_core::GrayImageView;

/// Compute the Otsu threshold of a set of intensities.
///
/// Samples `<= t` form the dark class. Degenerate inputs (empty, constant,
/// or only two distinct levels) fall back to the midpoint of the range.
pub(crate) fn otsu_threshold_from_samples(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }

    let mut hist = [0u32; 256];
    let (mut min_v, mut max_v) = (255u8, 0u8);
    for &v in samples {
        hist[v as usize] += 1;
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v == max_v {
        return min_v;
    }
    if hist.iter().filter(|&&h| h > 0).count() <= 2 {
        return ((min_v as u16 + max_v as u16) / 2) as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

/// Inverted adaptive mean threshold.
///
/// A pixel becomes foreground (`1`) when it is darker than the mean of its
/// `window × window` neighbourhood minus `offset`. The window is clipped at
/// the image border. Output is row-major `0/1`, one byte per pixel.
pub(crate) fn adaptive_threshold_inv(
    img: &GrayImageView<'_>,
    window: usize,
    offset: f32,
) -> Vec<u8> {
    let (w, h) = (img.width, img.height);
    let mut out = vec![0u8; w * h];
    if w == 0 || h == 0 {
        return out;
    }
    let radius = (window.max(3) / 2) as isize;

    // Summed-area table with a zero row/column in front.
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += img.data[y * w + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    for y in 0..h {
        let y0 = (y as isize - radius).max(0) as usize;
        let y1 = ((y as isize + radius) as usize).min(h - 1) + 1;
        for x in 0..w {
            let x0 = (x as isize - radius).max(0) as usize;
            let x1 = ((x as isize + radius) as usize).min(w - 1) + 1;
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0];
            let sum = sum - integral[y0 * stride + x1] - integral[y1 * stride + x0];
            let area = ((y1 - y0) * (x1 - x0)) as f32;
            let mean = sum as f32 / area;
            if (img.data[y * w + x] as f32) < mean - offset {
                out[y * w + x] = 1;
            }
        }
    }

    out
}
