use crate::coverage::coverage_to_distance_field;
use crate::edt::propagate;
use crate::grid::{CoverageImage, DistanceField};
use crate::quantize::{quantize, NarrowBand};
use crate::scratch::ClosestPointGrid;
use crate::seed::seed_closest_points;
use crate::SdfError;

/// Builds a distance field for the given coverage bitmap, recording distances out to the
/// radii of `band` from the shape outline (the rest will be clamped).
///
/// Antialiased pixels are used to place the outline with sub-pixel accuracy, assuming the
/// coverage is a box-filter sampling of the ideal, crisp edge; antialiasing wider than one
/// pixel makes the result inaccurate. Border pixels are not computed and are set to 0.
///
/// Scratch space for the closest point of every pixel is allocated for the duration of the
/// call. Use [`build_distance_field_into`] to provide it yourself.
pub fn build_distance_field(
    out: &mut DistanceField,
    image: &CoverageImage,
    band: &NarrowBand,
) -> Result<(), SdfError> {
    out.check_matches(image)?;
    let mut scratch = ClosestPointGrid::try_new(image.width(), image.height())?;
    build_distance_field_into(out, image, band, &mut scratch)
}

/// Same as [`build_distance_field`], but uses caller provided scratch space, which must have
/// been created for the same dimensions as the image.
pub fn build_distance_field_into(
    out: &mut DistanceField,
    image: &CoverageImage,
    band: &NarrowBand,
    scratch: &mut ClosestPointGrid,
) -> Result<(), SdfError> {
    out.check_matches(image)?;
    scratch.check_fits(image.width(), image.height())?;

    scratch.reset();
    seed_closest_points(image, scratch);
    propagate(scratch);
    quantize(scratch, &band.quantizer(), Some(image), out);

    Ok(())
}

/// Replaces a coverage bitmap with its distance field.
///
/// `pixels` is laid out as for [`CoverageImage::new`]; padding between rows is left untouched.
pub fn build_distance_field_in_place(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    band: &NarrowBand,
) -> Result<(), SdfError> {
    CoverageImage::new(pixels, width, height, stride)?;
    let mut scratch = ClosestPointGrid::try_new(width, height)?;
    build_in_place_with(pixels, width, height, stride, band, &mut scratch)
}

pub(crate) fn build_in_place_with(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    band: &NarrowBand,
    scratch: &mut ClosestPointGrid,
) -> Result<(), SdfError> {
    scratch.check_fits(width, height)?;
    scratch.reset();

    let image = CoverageImage::new(pixels, width, height, stride)?;
    seed_closest_points(&image, scratch);
    propagate(scratch);

    // Quantizing reads each pixel's coverage just before overwriting it.
    let mut field = DistanceField::new(pixels, width, height, stride)?;
    quantize(scratch, &band.quantizer(), None, &mut field);

    Ok(())
}

impl CoverageImage<'_> {
    /// Renders a tightly packed distance field using [`build_distance_field`].
    pub fn render_distance_field(&self, band: &NarrowBand) -> Result<Vec<u8>, SdfError> {
        let mut data = vec![0u8; self.width() * self.height()];
        let mut out = DistanceField::packed(&mut data, self.width(), self.height())?;
        build_distance_field(&mut out, self, band)?;
        Ok(data)
    }

    /// Renders a tightly packed narrow band field using [`coverage_to_distance_field`].
    pub fn render_coverage_field(&self) -> Result<Vec<u8>, SdfError> {
        let mut data = vec![0u8; self.width() * self.height()];
        let mut out = DistanceField::packed(&mut data, self.width(), self.height())?;
        coverage_to_distance_field(&mut out, self)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::{build_distance_field, build_distance_field_in_place, build_distance_field_into};
    use crate::grid::{CoverageImage, DistanceField};
    use crate::quantize::{FieldEncoding, NarrowBand};
    use crate::scratch::ClosestPointGrid;
    use crate::SdfError;

    /// A 12x12 bitmap with an antialiased disc in the middle.
    fn disc() -> Vec<u8> {
        let mut data = vec![0u8; 144];
        for y in 0..12 {
            for x in 0..12 {
                let dx = x as f32 - 5.5;
                let dy = y as f32 - 5.5;
                let coverage = (3.5 - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0);
                data[x + y * 12] = (coverage * 255.0).round() as u8;
            }
        }
        data
    }

    #[test]
    fn test_in_place_matches_separate_buffers() {
        let data = disc();
        let band = NarrowBand::uniform(3.0).unwrap();
        let image = CoverageImage::packed(&data, 12, 12).unwrap();
        let expected = image.render_distance_field(&band).unwrap();

        let mut pixels = data.clone();
        build_distance_field_in_place(&mut pixels, 12, 12, 12, &band).unwrap();
        assert_eq!(pixels, expected);

        let signed = band.with_encoding(FieldEncoding::Signed);
        let expected = image.render_distance_field(&signed).unwrap();
        let mut pixels = data;
        build_distance_field_in_place(&mut pixels, 12, 12, 12, &signed).unwrap();
        assert_eq!(pixels, expected);
    }

    #[test]
    fn test_strided_output_keeps_padding() {
        let data = disc();
        let band = NarrowBand::uniform(3.0).unwrap();
        let image = CoverageImage::packed(&data, 12, 12).unwrap();
        let expected = image.render_distance_field(&band).unwrap();

        let mut padded = vec![7u8; 16 * 12];
        let mut out = DistanceField::new(&mut padded, 12, 12, 16).unwrap();
        build_distance_field(&mut out, &image, &band).unwrap();

        for y in 0..12 {
            assert_eq!(&padded[y * 16..y * 16 + 12], &expected[y * 12..y * 12 + 12]);
            assert_eq!(&padded[y * 16 + 12..y * 16 + 16], &[7, 7, 7, 7]);
        }
    }

    #[test]
    fn test_signed_field_orders_inside_above_outside() {
        let data = disc();
        let band = NarrowBand::uniform(3.0)
            .unwrap()
            .with_encoding(FieldEncoding::Signed);
        let image = CoverageImage::packed(&data, 12, 12).unwrap();
        let field = image.render_distance_field(&band).unwrap();

        // Moving from the center of the disc outwards along a row never increases the value.
        let row = &field[5 * 12 + 6..6 * 12];
        assert!(row.windows(2).all(|w| w[0] >= w[1]), "{row:?}");
        assert!(row[0] > 200);
        assert_eq!(row[5], 0);
    }

    #[test]
    fn test_scratch_must_fit() {
        let data = disc();
        let band = NarrowBand::uniform(3.0).unwrap();
        let image = CoverageImage::packed(&data, 12, 12).unwrap();
        let mut out = vec![0u8; 144];
        let mut field = DistanceField::packed(&mut out, 12, 12).unwrap();
        let mut scratch = ClosestPointGrid::try_new(12, 11).unwrap();

        assert!(matches!(
            build_distance_field_into(&mut field, &image, &band, &mut scratch),
            Err(SdfError::InvalidScratchSize(12, 11, 12, 12))
        ));
    }
}
