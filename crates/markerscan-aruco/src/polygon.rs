//! Douglas-Peucker simplification of closed pixel contours.

use nalgebra::Point2;

fn distance_to_segment_line(p: Point2<i32>, a: Point2<i32>, b: Point2<i32>) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let (px, py) = ((p.x - a.x) as f64, (p.y - a.y) as f64);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return px.hypot(py);
    }
    (px * dy - py * dx).abs() / len
}

fn farthest_from(contour: &[Point2<i32>], from: Point2<i32>) -> usize {
    let mut best = (0i64, 0usize);
    for (i, p) in contour.iter().enumerate() {
        let (dx, dy) = ((p.x - from.x) as i64, (p.y - from.y) as i64);
        let d = dx * dx + dy * dy;
        if d > best.0 {
            best = (d, i);
        }
    }
    best.1
}

/// Mark the vertices of the open chain `start -> end` (walking forward
/// around the closed contour) that deviate more than `epsilon`.
fn simplify_chain(
    contour: &[Point2<i32>],
    start: usize,
    end: usize,
    epsilon: f64,
    keep: &mut [bool],
) {
    let n = contour.len();
    let mut stack = vec![(start, end)];
    while let Some((s, e)) = stack.pop() {
        let span = (e + n - s) % n;
        if span < 2 {
            continue;
        }
        let (a, b) = (contour[s], contour[e]);
        let mut best = (0.0f64, s);
        for k in 1..span {
            let i = (s + k) % n;
            let d = distance_to_segment_line(contour[i], a, b);
            if d > best.0 {
                best = (d, i);
            }
        }
        if best.0 > epsilon {
            keep[best.1] = true;
            stack.push((s, best.1));
            stack.push((best.1, e));
        }
    }
}

/// Approximate a closed contour with a polygon whose edges stay within
/// `epsilon` pixels of the original points.
///
/// The contour is split at two mutually distant points, each half is
/// simplified independently, and the surviving vertices are returned in
/// contour order.
pub(crate) fn approx_closed_polygon(contour: &[Point2<i32>], epsilon: f64) -> Vec<Point2<i32>> {
    let n = contour.len();
    if n < 3 {
        return contour.to_vec();
    }

    let a = farthest_from(contour, contour[0]);
    let b = farthest_from(contour, contour[a]);
    if a == b {
        return vec![contour[a]];
    }

    let mut keep = vec![false; n];
    keep[a] = true;
    keep[b] = true;
    simplify_chain(contour, a, b, epsilon, &mut keep);
    simplify_chain(contour, b, a, epsilon, &mut keep);

    (0..n)
        .map(|k| (a + k) % n)
        .filter(|&i| keep[i])
        .map(|i| contour[i])
        .collect()
}
