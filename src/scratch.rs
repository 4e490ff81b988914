use crate::SdfError;

/// Squared distance recorded for pixels whose closest boundary point is not known yet.
/// Larger than any real distance inside a grid.
pub(crate) const UNKNOWN_DISTANCE: f32 = 1e37;

/// A point in pixel coordinates, where `(x, y)` is the center of pixel `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    #[inline]
    pub(crate) fn pixel_center(x: usize, y: usize) -> Point {
        Point::new(x as f32, y as f32)
    }

    #[inline]
    #[must_use]
    pub fn distance_sq(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

/// Scratch space holding the closest known boundary point of every pixel.
///
/// Building a distance field needs one of these per invocation; callers generating many fields
/// of the same size can allocate a grid once and pass it to
/// [`build_distance_field_into`](crate::build_distance_field_into) to skip the allocation.
/// The grid is reset at the start of every build, so nothing leaks from one call to the next.
#[derive(Clone, Debug)]
pub struct ClosestPointGrid {
    pub(crate) dist: Vec<f32>,
    pub(crate) points: Vec<Point>,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl ClosestPointGrid {
    /// Allocates a grid for `width` x `height` pixels, reporting allocation failure
    /// instead of aborting.
    pub fn try_new(width: usize, height: usize) -> Result<ClosestPointGrid, SdfError> {
        // An overflowing pixel count can never be allocated; saturating lets the allocator
        // report it like any other failure.
        let pixels = width.saturating_mul(height);

        let mut dist = Vec::new();
        dist.try_reserve_exact(pixels)
            .map_err(|source| SdfError::ScratchAllocation { pixels, source })?;
        let mut points = Vec::new();
        points
            .try_reserve_exact(pixels)
            .map_err(|source| SdfError::ScratchAllocation { pixels, source })?;

        dist.resize(pixels, UNKNOWN_DISTANCE);
        points.resize(pixels, Point::default());

        Ok(ClosestPointGrid {
            dist,
            points,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The squared distance from the center of pixel `(x, y)` to its closest known
    /// boundary point.
    pub fn distance_sq(&self, x: usize, y: usize) -> f32 {
        self.dist[x + y * self.width]
    }

    /// The closest known boundary point of pixel `(x, y)`, if any boundary reached it.
    pub fn closest_point(&self, x: usize, y: usize) -> Option<Point> {
        let k = x + y * self.width;
        (self.dist[k] < UNKNOWN_DISTANCE).then_some(self.points[k])
    }

    pub(crate) fn reset(&mut self) {
        self.dist.fill(UNKNOWN_DISTANCE);
        self.points.fill(Point::default());
    }

    pub(crate) fn seed(&mut self, x: usize, y: usize, point: Point) {
        let k = x + y * self.width;
        self.dist[k] = Point::pixel_center(x, y).distance_sq(&point);
        self.points[k] = point;
    }

    pub(crate) fn check_fits(&self, width: usize, height: usize) -> Result<(), SdfError> {
        if self.width != width || self.height != height {
            return Err(SdfError::InvalidScratchSize(
                self.width,
                self.height,
                width,
                height,
            ));
        }

        Ok(())
    }
}
