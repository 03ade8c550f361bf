//! Border following on binary images (Suzuki & Abe, 1985).

use nalgebra::Point2;

/// One traced border.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    /// Border pixels in tracing order, starting at the first pixel met by
    /// the raster scan.
    pub points: Vec<Point2<i32>>,
    /// `true` when the border separates a hole from its surrounding component.
    pub hole: bool,
}

/// 8-neighbourhood, counter-clockwise on screen starting east.
const NEIGHBORS: [(i32, i32); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const EAST: usize = 0;
const WEST: usize = 4;

/// Trace every outer and hole border of a row-major `0/non-zero` image.
///
/// Contours come out in raster-scan order of their starting pixel
/// (top-to-bottom, left-to-right).
pub fn find_contours(binary: &[u8], width: usize, height: usize) -> Vec<Contour> {
    if width == 0 || height == 0 || binary.len() != width * height {
        return Vec::new();
    }

    // One pixel of zero padding so neighbour lookups never leave the buffer.
    let stride = width + 2;
    let mut labels = vec![0i32; stride * (height + 2)];
    for y in 0..height {
        for x in 0..width {
            if binary[y * width + x] != 0 {
                labels[(y + 1) * stride + x + 1] = 1;
            }
        }
    }
    let offsets = NEIGHBORS.map(|(dx, dy)| dx as isize + dy as isize * stride as isize);

    let mut contours = Vec::new();
    let mut nbd = 1i32;
    for y in 1..=height {
        for x in 1..=width {
            let pos = y * stride + x;
            let f = labels[pos];
            if f == 0 {
                continue;
            }
            let start = if f == 1 && labels[pos - 1] == 0 {
                Some((false, WEST))
            } else if f >= 1 && labels[pos + 1] == 0 {
                Some((true, EAST))
            } else {
                None
            };
            if let Some((hole, from)) = start {
                nbd += 1;
                let origin = Point2::new(x as i32 - 1, y as i32 - 1);
                let points = follow_border(&mut labels, &offsets, pos, from, nbd, origin);
                contours.push(Contour { points, hole });
            }
        }
    }

    contours
}

#[inline]
fn step(pos: usize, offset: isize) -> usize {
    (pos as isize + offset) as usize
}

fn follow_border(
    labels: &mut [i32],
    offsets: &[isize; 8],
    start: usize,
    from: usize,
    nbd: i32,
    origin: Point2<i32>,
) -> Vec<Point2<i32>> {
    // Clockwise search around the start pixel, beginning at the background
    // neighbour that triggered the trace.
    let first = (0..8)
        .map(|k| (from + 8 - k) % 8)
        .find(|&d| labels[step(start, offsets[d])] != 0);
    let Some(first_dir) = first else {
        labels[start] = -nbd;
        return vec![origin];
    };
    let second = step(start, offsets[first_dir]);

    let mut points = Vec::new();
    let mut current = start;
    let mut point = origin;
    let mut back_dir = first_dir;
    loop {
        // Counter-clockwise search starting just after the previous pixel.
        let mut east_is_background = false;
        let mut next_dir = back_dir;
        for k in 1..=8 {
            let d = (back_dir + k) % 8;
            if labels[step(current, offsets[d])] != 0 {
                next_dir = d;
                break;
            }
            if d == EAST {
                east_is_background = true;
            }
        }
        let next = step(current, offsets[next_dir]);

        if east_is_background {
            labels[current] = -nbd;
        } else if labels[current] == 1 {
            labels[current] = nbd;
        }
        points.push(point);

        if next == start && current == second {
            break;
        }

        back_dir = (next_dir + 4) % 8;
        current = next;
        let (dx, dy) = NEIGHBORS[next_dir];
        point = Point2::new(point.x + dx, point.y + dy);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(rows: &[&str]) -> (Vec<u8>, usize, usize) {
        let w = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| (b == b'#') as u8))
            .collect();
        (data, w, rows.len())
    }

    #[test]
    fn ring_has_outer_and_hole_border() {
        let (data, w, h) = image(&[".....", ".###.", ".#.#.", ".###.", "....."]);
        let contours = find_contours(&data, w, h);
        assert_eq!(contours.len(), 2);
        assert!(!contours[0].hole);
        assert!(contours[1].hole);
        assert_eq!(contours[0].points.len(), 8);
        assert_eq!(contours[0].points[0], Point2::new(1, 1));
    }

    #[test]
    fn filled_block_traces_its_boundary_once() {
        let (data, w, h) = image(&["......", ".####.", ".####.", ".####.", "......"]);
        let contours = find_contours(&data, w, h);
        assert_eq!(contours.len(), 1);
        let pts = &contours[0].points;
        assert_eq!(pts.len(), 10);
        for corner in [(1, 1), (4, 1), (4, 3), (1, 3)] {
            assert!(pts.contains(&Point2::new(corner.0, corner.1)));
        }
        assert!(!pts.contains(&Point2::new(2, 2)));
    }

    #[test]
    fn isolated_pixel_and_raster_order() {
        let (data, w, h) = image(&["....#", ".....", "##...", "....."]);
        let contours = find_contours(&data, w, h);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].points, vec![Point2::new(4, 0)]);
        assert_eq!(contours[1].points[0], Point2::new(0, 2));
    }
}
