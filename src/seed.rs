use crate::edge::{edge_distance, gradient, is_open_background};
use crate::grid::CoverageImage;
use crate::scratch::{ClosestPointGrid, Point};

/// Gradients with both components below this are flat areas, not edges.
const FLAT_GRADIENT: f32 = 0.001;

/// Gradients are only normalised when their squared length exceeds this.
const MIN_GRADIENT_LENGTH_SQ: f32 = 0.0001;

/// Records the sub-pixel edge position of every antialiased interior pixel.
///
/// Fully covered pixels, open background and flat areas are left unknown for the
/// propagation sweeps to fill in. Border pixels are never seeded.
pub(crate) fn seed_closest_points(image: &CoverageImage, grid: &mut ClosestPointGrid) {
    for y in 1..image.height() - 1 {
        for x in 1..image.width() - 1 {
            let coverage = image.at(x, y);
            if coverage == 255 || is_open_background(image, x, y) {
                continue;
            }

            let (mut gx, mut gy) = gradient(image, x, y);
            if gx.abs() < FLAT_GRADIENT && gy.abs() < FLAT_GRADIENT {
                continue;
            }

            let length_sq = gx * gx + gy * gy;
            if length_sq > MIN_GRADIENT_LENGTH_SQ {
                let inv_length = length_sq.sqrt().recip();
                gx *= inv_length;
                gy *= inv_length;
            }

            let d = edge_distance(gx, gy, f32::from(coverage) / 255.0);
            grid.seed(x, y, Point::new(x as f32 + gx * d, y as f32 + gy * d));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::seed_closest_points;
    use crate::grid::CoverageImage;
    use crate::scratch::{ClosestPointGrid, Point};

    fn seeded(data: &[u8], width: usize, height: usize) -> ClosestPointGrid {
        let image = CoverageImage::packed(data, width, height).unwrap();
        let mut grid = ClosestPointGrid::try_new(width, height).unwrap();
        seed_closest_points(&image, &mut grid);
        grid
    }

    #[test]
    fn test_lone_pixel_in_3x3_seeds_nothing() {
        #[rustfmt::skip]
        let data = [
            0, 0,   0,
            0, 255, 0,
            0, 0,   0,
        ];
        let grid = seeded(&data, 3, 3);
        assert!((0..3).all(|y| (0..3).all(|x| grid.closest_point(x, y).is_none())));
    }

    #[test]
    fn test_hard_pixel_seeds_only_orthogonal_neighbours() {
        #[rustfmt::skip]
        let data = [
            0, 0, 0,   0, 0,
            0, 0, 0,   0, 0,
            0, 0, 255, 0, 0,
            0, 0, 0,   0, 0,
            0, 0, 0,   0, 0,
        ];
        let grid = seeded(&data, 5, 5);

        // Empty pixels touching the covered pixel along an axis carry its edge.
        for (x, y) in [(2, 1), (1, 2), (3, 2), (2, 3)] {
            assert!(grid.closest_point(x, y).is_some(), "({x}, {y}) not seeded");
        }

        // Diagonal neighbours only touch it at a corner.
        for (x, y) in [(1, 1), (3, 1), (1, 3), (3, 3)] {
            assert!(grid.closest_point(x, y).is_none(), "({x}, {y}) seeded");
        }

        // The covered pixel itself is interior.
        assert!(grid.closest_point(2, 2).is_none());
    }

    #[test]
    fn test_vertical_edge_seeds_half_pixel_away() {
        #[rustfmt::skip]
        let data = [
            255, 255, 0, 0,
            255, 255, 0, 0,
            255, 255, 0, 0,
        ];
        let grid = seeded(&data, 4, 3);
        let point = grid.closest_point(2, 1).unwrap();

        assert!((point.x - 1.5).abs() < 1e-4);
        assert!((point.y - 1.0).abs() < 1e-4);
        assert!((grid.distance_sq(2, 1) - 0.25).abs() < 1e-4);
        assert!(grid.closest_point(1, 1).is_none());
    }

    #[test]
    fn test_antialiased_edge_seeds_inside_pixel() {
        #[rustfmt::skip]
        let data = [
            255, 255, 64, 0, 0,
            255, 255, 64, 0, 0,
            255, 255, 64, 0, 0,
        ];
        let grid = seeded(&data, 5, 3);

        // A quarter covered column puts the edge a quarter pixel left of its center.
        let point = grid.closest_point(2, 1).unwrap();
        let expected = Point::new(2.0 - (0.5 - 64.0 / 255.0), 1.0);
        assert!(point.distance_sq(&expected) < 1e-6);

        // The empty column next to it has no fully covered neighbour.
        assert!(grid.closest_point(3, 1).is_none());
    }
}
