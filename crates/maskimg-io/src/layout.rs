//! Codec channel layouts.
//!
//! A [`FinalizedImage`] still carries masks; codecs only take plain 8-bit
//! planes. [`CodecImage::from_finalized`] resolves the masks per mode:
//!
//! | Mode   | Fill set                         | No fill                                         |
//! |--------|----------------------------------|-------------------------------------------------|
//! | `L`    | `L`, masked -> fill              | `LA`, masked -> 0, alpha 0 where masked else 255 |
//! | `LA`   | `LA`, L filled, alpha as is      | `LA`, L masked -> 0, alpha 0 where L masked      |
//! | `RGB`  | `RGB`, each channel filled       | `RGBA`, alpha 0 where all three are masked       |
//! | `RGBA` | `RGBA`, each channel filled      | `RGBA`, alpha 0 where all four are masked        |
//!
//! `YCbCr` and `YCbCrA` have no codec layout.

use crate::finalize::FinalizedImage;
use crate::{IoError, IoResult};
use maskimg_core::Mode;

/// Channel layout of a codec payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecLayout {
    /// Grayscale.
    L,
    /// Grayscale with alpha.
    LA,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl CodecLayout {
    /// Number of planes.
    pub const fn channel_count(self) -> usize {
        match self {
            CodecLayout::L => 1,
            CodecLayout::LA => 2,
            CodecLayout::Rgb => 3,
            CodecLayout::Rgba => 4,
        }
    }

    /// Whether the last plane is alpha.
    pub const fn has_alpha(self) -> bool {
        matches!(self, CodecLayout::LA | CodecLayout::Rgba)
    }
}

/// Plain 8-bit planes handed to a [`Codec`](crate::Codec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecImage {
    /// Channel layout.
    pub layout: CodecLayout,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// One row-major plane per layout channel.
    pub planes: Vec<Vec<u8>>,
}

impl CodecImage {
    /// Resolves the masks of `image` into a codec layout.
    ///
    /// # Errors
    ///
    /// [`IoError::EmptyImage`] for an empty payload and
    /// [`IoError::UnsupportedMode`] for `YCbCr`/`YCbCrA` (and indexed modes,
    /// which [`finalize`](crate::finalize::finalize) already expands).
    pub fn from_finalized(image: &FinalizedImage) -> IoResult<Self> {
        if image.is_empty() {
            return Err(IoError::EmptyImage);
        }
        if image.planes.len() != image.mode.channel_count() {
            return Err(maskimg_core::Error::channel_count(image.mode, image.planes.len()).into());
        }
        let planes = &image.planes;
        let fill = image.fill_value.as_deref();

        let (layout, out) = match image.mode {
            Mode::L => match fill {
                Some(f) => (CodecLayout::L, vec![planes[0].filled(f[0])]),
                None => (
                    CodecLayout::LA,
                    vec![planes[0].filled(0), alpha_from_mask(&planes[0].mask, None)],
                ),
            },
            Mode::LA => {
                let l = planes[0].filled(fill.map_or(0, |f| f[0]));
                let alpha = match fill {
                    Some(_) => planes[1].values.clone(),
                    None => alpha_from_mask(&planes[0].mask, Some(&planes[1].values)),
                };
                (CodecLayout::LA, vec![l, alpha])
            }
            Mode::Rgb => match fill {
                Some(f) => (
                    CodecLayout::Rgb,
                    planes.iter().zip(f).map(|(p, &v)| p.filled(v)).collect(),
                ),
                None => {
                    let mask = combined_mask(planes.iter().map(|p| p.mask.as_slice()));
                    let mut out: Vec<Vec<u8>> = planes.iter().map(|p| p.filled(0)).collect();
                    out.push(alpha_from_mask(&mask, None));
                    (CodecLayout::Rgba, out)
                }
            },
            Mode::Rgba => match fill {
                Some(f) => (
                    CodecLayout::Rgba,
                    planes.iter().zip(f).map(|(p, &v)| p.filled(v)).collect(),
                ),
                None => {
                    let mask = combined_mask(planes.iter().map(|p| p.mask.as_slice()));
                    let mut out: Vec<Vec<u8>> = planes[..3].iter().map(|p| p.filled(0)).collect();
                    out.push(alpha_from_mask(&mask, Some(&planes[3].values)));
                    (CodecLayout::Rgba, out)
                }
            },
            other => return Err(IoError::UnsupportedMode(other)),
        };

        Ok(Self {
            layout,
            width: image.width,
            height: image.height,
            planes: out,
        })
    }

    /// Number of planes.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.layout.channel_count()
    }

    /// Pixel-interleaved bytes, row by row.
    pub fn interleaved(&self) -> Vec<u8> {
        let n = self.width * self.height;
        let mut out = Vec::with_capacity(n * self.planes.len());
        for i in 0..n {
            out.extend(self.planes.iter().map(|p| p[i]));
        }
        out
    }
}

/// Conjunction of several masks.
fn combined_mask<'a>(masks: impl Iterator<Item = &'a [bool]>) -> Vec<bool> {
    let mut acc: Option<Vec<bool>> = None;
    for mask in masks {
        acc = Some(match acc {
            None => mask.to_vec(),
            Some(a) => a.iter().zip(mask).map(|(&x, &y)| x && y).collect(),
        });
    }
    acc.unwrap_or_default()
}

/// Alpha plane: 0 where masked, else `alpha` (or 255 without one).
fn alpha_from_mask(mask: &[bool], alpha: Option<&[u8]>) -> Vec<u8> {
    mask.iter()
        .enumerate()
        .map(|(i, &m)| match (m, alpha) {
            (true, _) => 0,
            (false, Some(a)) => a[i],
            (false, None) => 255,
        })
        .collect()
}
