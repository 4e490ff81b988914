use std::f32::consts::SQRT_2;

use crate::grid::CoverageImage;

/// Estimates the signed distance from a pixel center to the edge passing through it.
///
/// The coverage `a` (in the range [0, 1]) is assumed to be the exact box-filtered area of a
/// straight edge whose coverage increases along `(gx, gy)`, which should be normalised.
/// The distance is positive when the pixel center lies outside the shape, so the edge point
/// nearest to the center is `center + (gx, gy) * distance`.
///
/// This follows the edge model used by Gustavson & Strand's anti-aliased Euclidean distance
/// transform: the edge can cut the pixel either through a corner (a triangle is covered) or
/// through two opposite sides (a trapezoid is covered).
#[must_use]
pub fn edge_distance(gx: f32, gy: f32, a: f32) -> f32 {
    if gx == 0.0 || gy == 0.0 {
        // Axis aligned edges are exact under the linear approximation, and it's a fair guess
        // when there is no gradient at all.
        return 0.5 - a;
    }

    // Everything is symmetric with respect to sign and transposition, so fold the
    // gradient into the first octant (gx >= gy >= 0).
    let (gx, gy) = {
        let (gx, gy) = (gx.abs(), gy.abs());
        if gx < gy {
            (gy, gx)
        } else {
            (gx, gy)
        }
    };

    let a1 = 0.5 * gy / gx;
    if a < a1 {
        // Only a corner triangle is covered
        0.5 * (gx + gy) - (2.0 * gx * gy * a).sqrt()
    } else if a < 1.0 - a1 {
        (0.5 - a) * gx
    } else {
        // Only a corner triangle is uncovered
        -0.5 * (gx + gy) + (2.0 * gx * gy * (1.0 - a)).sqrt()
    }
}

/// Sobel-like gradient of the 3x3 neighbourhood around an interior pixel.
///
/// Diagonal neighbours are weighted by 1 and orthogonal neighbours by √2, so the magnitude is
/// the same for every edge direction.
pub(crate) fn gradient(image: &CoverageImage, x: usize, y: usize) -> (f32, f32) {
    let sample = |x: usize, y: usize| f32::from(image.at(x, y));

    let nw = sample(x - 1, y - 1);
    let n = sample(x, y - 1);
    let ne = sample(x + 1, y - 1);
    let w = sample(x - 1, y);
    let e = sample(x + 1, y);
    let sw = sample(x - 1, y + 1);
    let s = sample(x, y + 1);
    let se = sample(x + 1, y + 1);

    let gx = -nw - SQRT_2 * w - sw + ne + SQRT_2 * e + se;
    let gy = -nw - SQRT_2 * n - ne + sw + SQRT_2 * s + se;

    (gx, gy)
}

/// Checks whether an interior pixel is empty background that should carry no edge.
///
/// An empty pixel still carries an edge when one of its orthogonal neighbours is fully
/// covered; without that check, hard (non antialiased) edges would never be found.
pub(crate) fn is_open_background(image: &CoverageImage, x: usize, y: usize) -> bool {
    image.at(x, y) == 0
        && image.at(x - 1, y) != 255
        && image.at(x + 1, y) != 255
        && image.at(x, y - 1) != 255
        && image.at(x, y + 1) != 255
}
