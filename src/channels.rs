use crate::core::build_in_place_with;
use crate::quantize::NarrowBand;
use crate::scratch::ClosestPointGrid;
use crate::SdfError;

/// Checks that `pixels_len` bytes hold `width * height` interleaved pixels of `components`
/// bytes each, and that every index in `channels` names one of those components.
pub fn check_interleaved(
    pixels_len: usize,
    width: usize,
    height: usize,
    components: usize,
    channels: &[usize],
) -> Result<(), SdfError> {
    if let Some(channel) = channels.iter().find(|channel| **channel >= components) {
        return Err(SdfError::InvalidChannel(*channel, components));
    }

    // An overflowing size can't match any buffer, so it is reported as usize::MAX.
    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(components))
        .unwrap_or(usize::MAX);
    if pixels_len != expected {
        return Err(SdfError::InvalidDataDimensions(
            "width * height * components",
            expected,
            pixels_len,
        ));
    }

    Ok(())
}

/// Bakes a distance field into selected channels of an interleaved bitmap.
///
/// `pixels` holds `width * height` pixels of `components` bytes each (for example RGBA with
/// `components = 4`). Every channel index listed in `channels` is treated as a coverage bitmap
/// of its own and replaced with its distance field; the other channels are left as they are.
/// One scratch grid is shared by all channels.
pub fn bake_channels(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    components: usize,
    channels: &[usize],
    band: &NarrowBand,
) -> Result<(), SdfError> {
    check_interleaved(pixels.len(), width, height, components, channels)?;
    if channels.is_empty() {
        return Ok(());
    }

    let mut plane = vec![0u8; width * height];
    let mut scratch = ClosestPointGrid::try_new(width, height)?;

    for &channel in channels {
        for (dst, src) in plane
            .iter_mut()
            .zip(pixels.iter().skip(channel).step_by(components))
        {
            *dst = *src;
        }

        build_in_place_with(&mut plane, width, height, width, band, &mut scratch)?;

        for (dst, src) in pixels
            .iter_mut()
            .skip(channel)
            .step_by(components)
            .zip(plane.iter())
        {
            *dst = *src;
        }
    }

    Ok(())
}
