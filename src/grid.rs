use crate::SdfError;

/// Validates that a byte buffer can hold a `width` x `height` grid with rows `stride` bytes apart.
fn check_layout(len: usize, width: usize, height: usize, stride: usize) -> Result<(), SdfError> {
    if width < 2 || height < 2 {
        return Err(SdfError::ImageTooSmall(width, height));
    }

    if stride < width {
        return Err(SdfError::InvalidStride { stride, width });
    }

    // The final row does not need to be padded out to a full stride.
    let expected = (height - 1) * stride + width;
    if len < expected {
        return Err(SdfError::InvalidDataDimensions(
            "(height - 1) * stride + width",
            expected,
            len,
        ));
    }

    Ok(())
}

#[inline]
pub(crate) fn is_border(x: usize, y: usize, width: usize, height: usize) -> bool {
    x == 0 || y == 0 || x == width - 1 || y == height - 1
}

/// A read-only bitmap of 8-bit coverage samples.
///
/// Each sample is the box-filtered area of the shape covering that pixel: 0 is background and
/// 255 is the fully covered interior. Samples are addressed as `data[x + y * stride]`, so a
/// sub-rectangle of a larger bitmap can be described by slicing from its first sample and
/// passing the stride of the parent bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverageImage<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> CoverageImage<'a> {
    /// Wraps a coverage bitmap whose rows start `stride` bytes apart.
    ///
    /// Border pixels never carry a boundary, so both dimensions must be at least 2.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<CoverageImage<'a>, SdfError> {
        check_layout(data.len(), width, height, stride)?;

        Ok(CoverageImage {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wraps a tightly packed coverage bitmap (`stride == width`).
    pub fn packed(data: &'a [u8], width: usize, height: usize) -> Result<CoverageImage<'a>, SdfError> {
        Self::new(data, width, height, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> u8 {
        self.data[x + y * self.stride]
    }
}

/// A writable bitmap receiving one encoded distance byte per pixel.
#[derive(Debug, PartialEq, Eq)]
pub struct DistanceField<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> DistanceField<'a> {
    /// Wraps an output bitmap whose rows start `stride` bytes apart.
    ///
    /// Bytes between the end of one row and the start of the next are left untouched.
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<DistanceField<'a>, SdfError> {
        check_layout(data.len(), width, height, stride)?;

        Ok(DistanceField {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wraps a tightly packed output bitmap (`stride == width`).
    pub fn packed(
        data: &'a mut [u8],
        width: usize,
        height: usize,
    ) -> Result<DistanceField<'a>, SdfError> {
        Self::new(data, width, height, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> u8 {
        self.data[x + y * self.stride]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[x + y * self.stride] = value;
    }

    /// Zeroes the outermost rows and columns.
    pub(crate) fn clear_border(&mut self) {
        let (width, height) = (self.width, self.height);
        for x in 0..width {
            self.set(x, 0, 0);
            self.set(x, height - 1, 0);
        }
        for y in 1..height - 1 {
            self.set(0, y, 0);
            self.set(width - 1, y, 0);
        }
    }

    pub(crate) fn check_matches(&self, image: &CoverageImage) -> Result<(), SdfError> {
        if self.width != image.width || self.height != image.height {
            return Err(SdfError::MismatchedDimensions(
                self.width,
                self.height,
                image.width,
                image.height,
            ));
        }

        Ok(())
    }
}
