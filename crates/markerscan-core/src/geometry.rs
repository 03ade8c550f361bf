//! Small polygon helpers shared by the localizer, the scorer and the
//! nested-candidate filter.

use nalgebra::Point2;

/// Signed shoelace area. Positive for clockwise winding in image
/// coordinates (y pointing down).
pub fn signed_area(poly: &[Point2<f32>]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0_f64;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        acc += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    0.5 * acc
}

/// Absolute polygon area.
#[inline]
pub fn polygon_area(poly: &[Point2<f32>]) -> f64 {
    signed_area(poly).abs()
}

/// Length of the closed polyline through `poly`.
pub fn closed_perimeter(poly: &[Point2<f32>]) -> f64 {
    let n = poly.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            (b.x as f64 - a.x as f64).hypot(b.y as f64 - a.y as f64)
        })
        .sum()
}

/// Shortest edge of the closed polygon.
pub fn min_side_length(poly: &[Point2<f32>]) -> f64 {
    let n = poly.len();
    (0..n)
        .map(|i| {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            (b.x as f64 - a.x as f64).hypot(b.y as f64 - a.y as f64)
        })
        .fold(f64::INFINITY, f64::min)
}

/// Strict convexity: every turn has the same non-zero orientation.
pub fn is_convex(poly: &[Point2<f32>]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0_f64;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let c = poly[(i + 2) % n];
        let cross = (b.x as f64 - a.x as f64) * (c.y as f64 - b.y as f64)
            - (b.y as f64 - a.y as f64) * (c.x as f64 - b.x as f64);
        if cross == 0.0 {
            return false;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Arithmetic mean of the vertices.
pub fn centroid(poly: &[Point2<f32>]) -> Point2<f32> {
    if poly.is_empty() {
        return Point2::origin();
    }
    let n = poly.len() as f32;
    let (sx, sy) = poly
        .iter()
        .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

/// Even-odd point-in-polygon test.
pub fn contains_point(poly: &[Point2<f32>], p: Point2<f32>) -> bool {
    let n = poly.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = poly[i];
        let b = poly[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
