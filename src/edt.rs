//! The 8-point sequential Euclidean distance transform (8SSEDT).
//!
//! Two raster sweeps move every pixel's closest known boundary point to its neighbours. Each
//! sweep covers one half-plane of propagation directions, so two sweeps reach every pixel.
//! Each check may depend on a value written earlier in the same sweep, so the visiting order
//! below is part of the result and must not be changed or parallelised.

use crate::scratch::{ClosestPointGrid, Point};

/// A neighbour offset `(dx, dy)`; negative `dy` is the row above.
type Offset = (isize, isize);

const N: Offset = (0, -1);
const NE: Offset = (1, -1);
const E: Offset = (1, 0);
const SE: Offset = (1, 1);
const S: Offset = (0, 1);
const SW: Offset = (-1, 1);
const W: Offset = (-1, 0);
const NW: Offset = (-1, -1);

/// The neighbour checks of one raster sweep.
///
/// Rows (excluding the top and bottom border) are visited in sweep order. In each row, the
/// leading column is checked against `leading`, the interior columns against `interior` and
/// the trailing column against `trailing`. The row is then scanned back towards the leading
/// column, checking `rescan`, so that points found late in the row can also travel backwards
/// before moving on.
struct Sweep {
    /// Visits rows top to bottom and columns left to right when set; the mirror image otherwise.
    ascending: bool,
    leading: &'static [Offset],
    interior: &'static [Offset],
    trailing: &'static [Offset],
    rescan: Offset,
}

const FORWARD: Sweep = Sweep {
    ascending: true,
    leading: &[N, NE],
    interior: &[NW, N, NE, W],
    trailing: &[NW, N, W],
    rescan: E,
};

const BACKWARD: Sweep = Sweep {
    ascending: false,
    leading: &[S, SW],
    interior: &[E, SW, S, SE],
    trailing: &[S, SE, E],
    rescan: W,
};

impl Sweep {
    fn run(&self, grid: &mut ClosestPointGrid) {
        let (width, height) = (grid.width, grid.height);
        let oriented = |i: usize, len: usize| if self.ascending { i } else { len - 1 - i };

        for row in 1..height - 1 {
            let y = oriented(row, height);

            for col in 0..width {
                let offsets = match col {
                    0 => self.leading,
                    col if col == width - 1 => self.trailing,
                    _ => self.interior,
                };
                let x = oriented(col, width);
                for offset in offsets {
                    update_point(grid, x, y, *offset);
                }
            }

            for col in (0..width - 1).rev() {
                update_point(grid, oriented(col, width), y, self.rescan);
            }
        }
    }
}

/// Adopts the neighbour's closest point when it is nearer than the pixel's own.
///
/// Estimates only ever improve, and only points some pixel already knows about are moved.
#[inline]
fn update_point(grid: &mut ClosestPointGrid, x: usize, y: usize, (dx, dy): Offset) {
    let width = grid.width;
    let k = x + y * width;
    let kn = x.wrapping_add_signed(dx) + y.wrapping_add_signed(dy) * width;

    let current = grid.dist[k];
    if grid.dist[kn] < current {
        let candidate = grid.points[kn];
        let d = Point::pixel_center(x, y).distance_sq(&candidate);
        if d < current {
            grid.points[k] = candidate;
            grid.dist[k] = d;
        }
    }
}

/// Spreads the seeded boundary points across the grid, top-down and then bottom-up.
///
/// The top and bottom border rows are left untouched.
pub(crate) fn propagate(grid: &mut ClosestPointGrid) {
    FORWARD.run(grid);
    BACKWARD.run(grid);
}

#[cfg(test)]
mod tests {
    use super::propagate;
    use crate::scratch::{ClosestPointGrid, Point, UNKNOWN_DISTANCE};

    #[test]
    fn test_single_seed_reaches_every_row() {
        let (width, height) = (9, 7);
        let seed = Point::new(3.25, 2.5);

        let mut grid = ClosestPointGrid::try_new(width, height).unwrap();
        grid.seed(3, 2, seed);
        propagate(&mut grid);

        for y in 1..height - 1 {
            for x in 0..width {
                assert_eq!(grid.closest_point(x, y), Some(seed), "at ({x}, {y})");
                let expected = Point::new(x as f32, y as f32).distance_sq(&seed);
                assert!((grid.distance_sq(x, y) - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_border_rows_stay_unknown() {
        let mut grid = ClosestPointGrid::try_new(5, 5).unwrap();
        grid.seed(2, 2, Point::new(2.0, 2.0));
        propagate(&mut grid);

        for x in 0..5 {
            assert_eq!(grid.distance_sq(x, 0), UNKNOWN_DISTANCE);
            assert_eq!(grid.distance_sq(x, 4), UNKNOWN_DISTANCE);
        }
    }

    #[test]
    fn test_nearest_seed_wins() {
        let (width, height) = (12, 8);
        let left = Point::new(1.5, 3.0);
        let right = Point::new(9.5, 4.0);

        let mut grid = ClosestPointGrid::try_new(width, height).unwrap();
        grid.seed(2, 3, left);
        grid.seed(9, 4, right);
        propagate(&mut grid);

        assert_eq!(grid.closest_point(0, 1), Some(left));
        assert_eq!(grid.closest_point(3, 6), Some(left));
        assert_eq!(grid.closest_point(11, 1), Some(right));
        assert_eq!(grid.closest_point(8, 6), Some(right));
    }

    #[test]
    fn test_seeds_are_never_worsened() {
        let mut grid = ClosestPointGrid::try_new(6, 5).unwrap();
        grid.seed(2, 2, Point::new(2.0, 2.25));
        grid.seed(3, 2, Point::new(3.5, 2.0));
        propagate(&mut grid);

        assert_eq!(grid.closest_point(2, 2), Some(Point::new(2.0, 2.25)));
        assert_eq!(grid.closest_point(3, 2), Some(Point::new(3.5, 2.0)));
    }

    #[test]
    fn test_no_seeds_stays_unknown() {
        let mut grid = ClosestPointGrid::try_new(4, 4).unwrap();
        propagate(&mut grid);
        assert!(grid.dist.iter().all(|d| *d == UNKNOWN_DISTANCE));
    }

    /// Which of `seeds` ends up closest to each pixel, as one letter per seed (`.` for none).
    fn owners(grid: &ClosestPointGrid, seeds: &[Point]) -> Vec<String> {
        (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .map(|x| match grid.closest_point(x, y) {
                        Some(p) => seeds
                            .iter()
                            .position(|s| *s == p)
                            .map_or('?', |i| (b'a' + i as u8) as char),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_sweep_order() {
        // Some pixels keep a seed that isn't the true nearest one (8SSEDT is an approximation),
        // and which one they keep depends on the exact order of every check, including the
        // edge columns and the rescan of each row.
        let seeds = [
            ((2, 2), Point::new(2.5, 1.75)),
            ((3, 6), Point::new(2.5, 6.0)),
            ((2, 5), Point::new(1.75, 4.5)),
            ((1, 4), Point::new(1.25, 4.0)),
            ((2, 3), Point::new(1.75, 3.25)),
        ];

        let mut grid = ClosestPointGrid::try_new(10, 8).unwrap();
        for ((x, y), point) in seeds {
            grid.seed(x, y, point);
        }
        propagate(&mut grid);

        let points: Vec<Point> = seeds.iter().map(|(_, p)| *p).collect();
        assert_eq!(
            owners(&grid, &points),
            [
                "..........",
                "aaaaaaaaaa",
                "eeaaaaaaaa",
                "deeeaaaaaa",
                "ddcccbbbbb",
                "dccbbbbbbb",
                "cbbbbbbbbb",
                "..........",
            ]
        );

        // Distances follow the adopted points.
        for y in 1..7 {
            for x in 0..10 {
                let point = grid.closest_point(x, y).unwrap();
                let expected = Point::new(x as f32, y as f32).distance_sq(&point);
                assert_eq!(grid.distance_sq(x, y), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_two_column_grid() {
        let mut grid = ClosestPointGrid::try_new(2, 4).unwrap();
        grid.seed(1, 1, Point::new(1.0, 1.5));
        propagate(&mut grid);

        assert_eq!(grid.closest_point(0, 1), Some(Point::new(1.0, 1.5)));
        assert_eq!(grid.closest_point(0, 2), Some(Point::new(1.0, 1.5)));
        assert_eq!(grid.closest_point(1, 2), Some(Point::new(1.0, 1.5)));
    }
}
