//! Conversion of floating-point masked channels to 8-bit planes.
//!
//! Values are clamped to `[0, 1]`, scaled by 255 and rounded half to even.
//! The fill value is scaled the same way but truncated. Masks are carried
//! along unchanged. Indexed images are expanded to `RGB`/`RGBA` on a copy
//! first; the source image is never modified.
//!
//! ```rust
//! use maskimg_core::{Image, Mode};
//! use maskimg_io::finalize::finalize;
//!
//! let img = Image::builder(Mode::L)
//!     .masked_rows(vec![vec![Some(0.0), Some(0.5), Some(1.2), None]])
//!     .fill_value([0.5])
//!     .build()
//!     .unwrap();
//!
//! let fin = finalize(&img).unwrap();
//! assert_eq!(fin.planes[0].values, vec![0, 128, 255, 0]);
//! assert_eq!(fin.planes[0].mask, vec![false, false, false, true]);
//! assert_eq!(fin.fill_value, Some(vec![127]));
//! ```

use crate::IoResult;
use maskimg_color::Convert;
use maskimg_core::{Channel, Image, Mode};
use tracing::trace;

/// One finalized channel: 8-bit values plus the validity mask.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FinalizedPlane {
    /// Row-major 8-bit values.
    pub values: Vec<u8>,
    /// Row-major mask; `true` marks missing data.
    pub mask: Vec<bool>,
}

impl FinalizedPlane {
    /// Values with masked positions replaced by `fill`.
    pub fn filled(&self, fill: u8) -> Vec<u8> {
        self.values
            .iter()
            .zip(&self.mask)
            .map(|(&v, &m)| if m { fill } else { v })
            .collect()
    }
}

impl From<&Channel> for FinalizedPlane {
    fn from(channel: &Channel) -> Self {
        Self {
            values: channel.values().iter().map(|&v| quantize_u8(v)).collect(),
            mask: channel.mask().to_vec(),
        }
    }
}

/// An image reduced to 8-bit planes, ready for codec layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedImage {
    /// Direct mode of the planes.
    pub mode: Mode,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
    /// One plane per channel.
    pub planes: Vec<FinalizedPlane>,
    /// Integer fill value, one entry per plane.
    pub fill_value: Option<Vec<u8>>,
}

impl FinalizedImage {
    /// Returns `true` when there are no planes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

/// Maps a `[0, 1]` value to `0..=255`, rounding half to even.
///
/// Out-of-range values clamp; NaN maps to 0.
#[inline]
pub fn quantize_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round_ties_even() as u8
}

/// Maps a fill value to `0..=255`, truncating.
#[inline]
pub fn fill_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

/// Finalizes `image` into 8-bit planes.
///
/// An empty image yields an empty payload in its mode.
pub fn finalize(image: &Image) -> IoResult<FinalizedImage> {
    let expanded;
    let source = match image.mode() {
        Mode::P | Mode::PA if !image.is_empty() => {
            let target = if image.mode().has_alpha() { Mode::Rgba } else { Mode::Rgb };
            expanded = image.converted(target)?;
            &expanded
        }
        _ => image,
    };
    trace!(mode = %source.mode(), height = source.height(), width = source.width(), "finalize");

    Ok(FinalizedImage {
        mode: source.mode(),
        height: source.height(),
        width: source.width(),
        planes: source.channels().iter().map(FinalizedPlane::from).collect(),
        fill_value: source
            .fill_value()
            .map(|fill| fill.iter().map(|&v| fill_to_u8(v)).collect()),
    })
}
