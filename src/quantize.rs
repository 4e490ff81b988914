use crate::grid::{is_border, CoverageImage, DistanceField};
use crate::scratch::ClosestPointGrid;
use crate::SdfError;

/// Selects how distances on either side of the shape outline are encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldEncoding {
    /// Every pixel encodes its distance to the outline as `(1 - d / outside_radius) / 2`, so
    /// the outline sits at 128 and the value falls off to 0 on *both* sides of it. This is
    /// the behaviour of the classic `sdfBuildDistanceField`, which never reaches its inside
    /// branch for 8-bit input, and the inside radius is unused.
    #[default]
    Unsigned,

    /// Pixels on the covered side of the outline (coverage of at least 50%) encode
    /// `(1 + d / inside_radius) / 2` instead, producing a true signed field where 0 lies
    /// `outside_radius` outside the shape and 255 lies `inside_radius` inside it.
    Signed,
}

/// The narrow band of distances recorded around the shape outline, in pixels.
///
/// The radii may differ to give an asymmetric band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NarrowBand {
    outside_radius: f32,
    inside_radius: f32,
    encoding: FieldEncoding,
}

impl NarrowBand {
    /// Creates a band using [`FieldEncoding::Unsigned`]. Both radii must be positive.
    pub fn new(outside_radius: f32, inside_radius: f32) -> Result<NarrowBand, SdfError> {
        for radius in [outside_radius, inside_radius] {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(SdfError::InvalidRadius(radius));
            }
        }

        Ok(NarrowBand {
            outside_radius,
            inside_radius,
            encoding: FieldEncoding::default(),
        })
    }

    /// Creates a band with the same radius on both sides of the outline.
    pub fn uniform(radius: f32) -> Result<NarrowBand, SdfError> {
        Self::new(radius, radius)
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: FieldEncoding) -> NarrowBand {
        self.encoding = encoding;
        self
    }

    pub fn outside_radius(&self) -> f32 {
        self.outside_radius
    }

    pub fn inside_radius(&self) -> f32 {
        self.inside_radius
    }

    pub fn encoding(&self) -> FieldEncoding {
        self.encoding
    }

    #[must_use]
    pub(crate) fn quantizer(&self) -> Quantizer {
        Quantizer {
            outside_scale: self.outside_radius.recip(),
            inside_scale: self.inside_radius.recip(),
            encoding: self.encoding,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Quantizer {
    outside_scale: f32,
    inside_scale: f32,
    encoding: FieldEncoding,
}

impl Quantizer {
    /// Encodes the squared distance of a pixel with the given coverage into a byte.
    #[inline]
    pub(crate) fn encode(&self, dist_sq: f32, coverage: u8) -> u8 {
        let dist = dist_sq.sqrt();
        let alpha = match self.encoding {
            FieldEncoding::Signed if coverage >= 128 => dist * self.inside_scale * 0.5 + 0.5,
            _ => (1.0 - dist * self.outside_scale) * 0.5,
        };

        (clamp01(alpha + 0.5 / 255.0) * 255.0) as u8
    }
}

#[inline]
pub(crate) fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Writes the encoded distance of every pixel into `out`, zeroing the border.
///
/// Coverage is read from `image` when given, and from `out` itself otherwise (for in-place
/// builds, where each pixel is read just before it is overwritten).
pub(crate) fn quantize(
    grid: &ClosestPointGrid,
    quantizer: &Quantizer,
    image: Option<&CoverageImage>,
    out: &mut DistanceField,
) {
    let (width, height) = (out.width(), out.height());
    for y in 0..height {
        for x in 0..width {
            let value = if is_border(x, y, width, height) {
                0
            } else {
                let coverage = match image {
                    Some(image) => image.at(x, y),
                    None => out.get(x, y),
                };
                quantizer.encode(grid.distance_sq(x, y), coverage)
            };
            out.set(x, y, value);
        }
    }
}
