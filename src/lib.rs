//! This crate generates signed distance fields from antialiased coverage bitmaps, such as
//! rasterised glyphs or silhouette masks, for the resolution independent rendering technique
//! demonstrated by [Valve](https://steamcdn-a.akamaihd.net/apps/valve/2007/SIGGRAPH2007_AlphaTestedMagnification.pdf).
//! A low resolution distance field texture can be magnified while keeping edges sharp, and is
//! enough to draw outlines, glows and drop shadows.
//!
//! Two generators are provided:
//!
//! * [`build_distance_field`] finds the outline with sub-pixel accuracy from the antialiased
//!   pixels (assuming a box-filter sampling of the ideal, crisp edge) and spreads the closest
//!   outline point to every pixel with the two pass 8-point sequential Euclidean distance
//!   transform (8SSEDT) of [Gustavson & Strand](https://doi.org/10.1016/j.patrec.2010.08.010).
//!   Distances are recorded out to a configurable [`NarrowBand`].
//! * [`coverage_to_distance_field`] skips the transform and estimates each pixel's distance
//!   from its own neighbourhood. It is much cheaper, but the band is only √2 pixels wide.
//!
//! Bitmaps are plain byte slices addressed as `data[x + y * stride]`. See [`CoverageImage`]
//! and [`DistanceField`]. Border pixels are never computed and are always set to 0, so leave
//! a pixel of padding around the shape.
//!
//! ```
//! use coverage_sdf::{CoverageImage, NarrowBand};
//!
//! let mut coverage = vec![0u8; 16 * 16];
//! for y in 4..12 {
//!     for x in 4..12 {
//!         coverage[x + y * 16] = 255;
//!     }
//! }
//!
//! let image = CoverageImage::packed(&coverage, 16, 16)?;
//! let field = image.render_distance_field(&NarrowBand::uniform(4.0)?)?;
//! assert_eq!(field.len(), 256);
//! # Ok::<(), coverage_sdf::SdfError>(())
//! ```

mod channels;
pub use crate::channels::{bake_channels, check_interleaved};

mod core;
pub use crate::core::*;

mod coverage;
pub use crate::coverage::coverage_to_distance_field;

mod edge;
pub use crate::edge::edge_distance;

mod edt;

mod error;
pub use crate::error::SdfError;

mod grid;
pub use crate::grid::{CoverageImage, DistanceField};

mod quantize;
pub use crate::quantize::{FieldEncoding, NarrowBand};

mod scratch;
pub use crate::scratch::{ClosestPointGrid, Point};

mod seed;
