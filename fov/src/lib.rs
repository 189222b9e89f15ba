//! Generic field-of-view computation.
//!
//! Recursive shadowcasting over the eight octants of a square grid. The
//! caller provides the transparency predicate and a sink for revealed
//! cells, so the algorithm has no opinion about map storage.

/// Octant transform rows: x-from-col, x-from-row, y-from-col, y-from-row.
const OCTANTS: [[i32; 4]; 8] = [
    [1, 0, 0, 1],
    [0, 1, 1, 0],
    [0, -1, 1, 0],
    [-1, 0, 0, 1],
    [-1, 0, 0, -1],
    [0, -1, -1, 0],
    [0, 1, -1, 0],
    [1, 0, 0, -1],
];

/// Compute the visible cell set from `origin` out to `radius`.
///
/// `transparent` reports whether sight passes through a cell; cells
/// outside the caller's map should report `false`. Every visible cell is
/// passed to `reveal`, the origin always first. Cells are bounded by
/// Euclidean distance, and a cell may be revealed more than once when it
/// lies on an octant seam.
pub fn compute(
    origin: (i32, i32),
    radius: i32,
    transparent: &mut impl FnMut(i32, i32) -> bool,
    reveal: &mut impl FnMut(i32, i32),
) {
    assert!(radius >= 0, "fov::compute: negative radius");

    reveal(origin.0, origin.1);
    for oct in &OCTANTS {
        cast(origin, radius, oct, 1, 1.0, 0.0, transparent, reveal);
    }
}

#[allow(clippy::too_many_arguments)]
fn cast(
    origin: (i32, i32),
    radius: i32,
    oct: &[i32; 4],
    row: i32,
    mut start: f32,
    end: f32,
    transparent: &mut impl FnMut(i32, i32) -> bool,
    reveal: &mut impl FnMut(i32, i32),
) {
    if start < end {
        return;
    }

    let r2 = radius * radius;

    for j in row..=radius {
        let dy = -j;
        let mut dx = -j;
        let mut blocked = false;
        let mut new_start = start;

        while dx <= 0 {
            // Slopes along the outer corners of the scanned cell.
            let l_slope = (dx as f32 - 0.5) / (dy as f32 + 0.5);
            let r_slope = (dx as f32 + 0.5) / (dy as f32 - 0.5);

            if start < r_slope {
                dx += 1;
                continue;
            }
            if end > l_slope {
                break;
            }

            let x = origin.0 + dx * oct[0] + dy * oct[1];
            let y = origin.1 + dx * oct[2] + dy * oct[3];

            if dx * dx + dy * dy <= r2 {
                reveal(x, y);
            }

            if blocked {
                if !transparent(x, y) {
                    new_start = r_slope;
                } else {
                    blocked = false;
                    start = new_start;
                }
            } else if !transparent(x, y) && j < radius {
                // Wall starts a shadow, scan the lit section recursively
                // and continue this row past the wall run.
                blocked = true;
                cast(origin, radius, oct, j + 1, start, l_slope, transparent, reveal);
                new_start = r_slope;
            }

            dx += 1;
        }

        if blocked {
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Run the algorithm over an ASCII map, '#' for walls. Returns the
    /// visibility mask as a set of coordinates.
    fn visible_set(
        map: &str,
        origin: (i32, i32),
        radius: i32,
    ) -> std::collections::HashSet<(i32, i32)> {
        let cells: Vec<Vec<char>> =
            map.trim().lines().map(|l| l.trim().chars().collect()).collect();
        let h = cells.len() as i32;
        let w = cells[0].len() as i32;

        let mut seen = std::collections::HashSet::new();
        compute(
            origin,
            radius,
            &mut |x, y| {
                x >= 0
                    && y >= 0
                    && x < w
                    && y < h
                    && cells[y as usize][x as usize] != '#'
            },
            &mut |x, y| {
                if x >= 0 && y >= 0 && x < w && y < h {
                    seen.insert((x, y));
                }
            },
        );
        seen
    }

    #[test]
    fn open_room_fully_visible() {
        let seen = visible_set(
            "
            .....
            .....
            .....
            .....
            .....",
            (2, 2),
            10,
        );
        assert_eq!(seen.len(), 25);
    }

    #[test]
    fn pillar_casts_shadow() {
        let seen = visible_set(
            "
            .....
            .....
            ..#..
            .....
            .....",
            (2, 4),
            10,
        );
        // The pillar itself is visible, the column behind it is not.
        assert!(seen.contains(&(2, 2)));
        assert!(!seen.contains(&(2, 1)));
        assert!(!seen.contains(&(2, 0)));
        // Cells beside the shadow stay lit.
        assert!(seen.contains(&(0, 2)));
        assert!(seen.contains(&(4, 2)));
    }

    #[test]
    fn walls_contain_sight() {
        let seen = visible_set(
            "
            .......
            .#####.
            .#...#.
            .#####.
            .......",
            (3, 2),
            10,
        );
        // Room interior and its walls are visible.
        assert!(seen.contains(&(2, 2)));
        assert!(seen.contains(&(4, 2)));
        assert!(seen.contains(&(3, 1)));
        assert!(seen.contains(&(3, 3)));
        // Nothing outside the enclosing walls is.
        assert!(!seen.contains(&(0, 0)));
        assert!(!seen.contains(&(6, 2)));
        assert!(!seen.contains(&(3, 4)));
    }

    #[test]
    fn radius_bounds_the_scan() {
        let seen = visible_set(
            "
            .........
            .........
            .........
            .........
            .........
            .........
            .........
            .........
            .........",
            (4, 4),
            2,
        );
        assert!(seen.contains(&(4, 4)));
        assert!(seen.contains(&(6, 4)));
        assert!(seen.contains(&(4, 2)));
        // Euclidean bound, distance 3 along an axis is out.
        assert!(!seen.contains(&(7, 4)));
        // And so is the radius-2 square's corner at distance sqrt(8).
        assert!(!seen.contains(&(6, 6)));
    }

    #[test]
    fn zero_radius_reveals_only_origin() {
        let seen = visible_set(
            "
            ...
            ...
            ...",
            (1, 1),
            0,
        );
        assert_eq!(seen, [(1, 1)].into_iter().collect());
    }
}
