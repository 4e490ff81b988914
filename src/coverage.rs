use std::f32::consts::SQRT_2;

use crate::edge::{edge_distance, gradient, is_open_background};
use crate::grid::{CoverageImage, DistanceField};
use crate::quantize::clamp01;
use crate::SdfError;

/// Gradients with both components below this fall back to the linear estimate.
const FLAT_GRADIENT: f32 = 0.0001;

/// Converts a coverage bitmap straight into a distance field with a narrow band of √2 pixels.
///
/// This is the fastest way to turn an antialiased bitmap into a contour texture: each pixel
/// only looks at its own 3x3 neighbourhood and no scratch space is needed. It is a good fit
/// when the field is only used to draw sharp edges; outlines, glows and drop shadows need the
/// wider band of [`build_distance_field`](crate::build_distance_field). Pixels further than
/// about √2 pixels from the outline saturate to 0 (outside) or 255 (inside), and border pixels
/// are always 0.
///
/// The output must be a separate buffer, since every pixel reads neighbours that an in-place
/// write would already have replaced. The borrow checker enforces this:
///
/// ```compile_fail
/// use coverage_sdf::{coverage_to_distance_field, CoverageImage, DistanceField};
///
/// let mut pixels = vec![0u8; 16];
/// let image = CoverageImage::packed(&pixels, 4, 4).unwrap();
/// let mut out = DistanceField::packed(&mut pixels, 4, 4).unwrap();
/// coverage_to_distance_field(&mut out, &image).unwrap();
/// ```
pub fn coverage_to_distance_field(
    out: &mut DistanceField,
    image: &CoverageImage,
) -> Result<(), SdfError> {
    out.check_matches(image)?;
    out.clear_border();

    for y in 1..image.height() - 1 {
        for x in 1..image.width() - 1 {
            out.set(x, y, edge_value(image, x, y));
        }
    }

    Ok(())
}

fn edge_value(image: &CoverageImage, x: usize, y: usize) -> u8 {
    let coverage = image.at(x, y);
    if coverage == 255 {
        return 255;
    }
    if is_open_background(image, x, y) {
        return 0;
    }

    let a = f32::from(coverage) / 255.0;
    let (gx, gy) = gradient(image, x, y);
    let d = if gx.abs() < FLAT_GRADIENT && gy.abs() < FLAT_GRADIENT {
        (0.5 - a) * SQRT_2
    } else {
        let length = (gx * gx + gy * gy).sqrt();
        edge_distance(gx / length, gy / length, a)
    };

    (clamp01(0.5 - d / SQRT_2) * 255.0) as u8
}
