//! Mask-aware compositing.
//!
//! - [`putalpha`] - set (or add) the alpha channel
//! - [`merge`] - fill missing data from a background image
//! - [`blend`] - Porter-Duff "over" of two RGBA images
//!
//! # Blend formula
//!
//! With `src` the image on top and `dst` the image being modified:
//!
//! ```text
//! outA = srcA + dstA * (1 - srcA)
//! outC = (srcC * srcA + dstC * dstA * (1 - srcA)) / outA     (0 where outA == 0)
//! ```
//!
//! # Example
//!
//! ```rust
//! use maskimg_core::{Channel, Image, Mode};
//! use maskimg_ops::composite::putalpha;
//!
//! let mut img = Image::builder(Mode::L).rows(vec![vec![0.2, 0.8]]).build().unwrap();
//! putalpha(&mut img, Channel::from_rows(&[vec![1.0, 0.5]]).unwrap()).unwrap();
//! assert_eq!(img.mode(), Mode::LA);
//! assert_eq!(img.channel(1).unwrap().values(), &[1.0, 0.5]);
//! ```

use crate::guard::{ensure_mode, ensure_not_empty, ensure_shape};
use crate::OpsResult;
use maskimg_color::Convert;
use maskimg_core::{mask_all, Channel, Image, Mode};
use tracing::{debug, trace};

/// Adds `alpha` as the alpha channel, or replaces the existing one.
///
/// The image moves to its alpha variant if needed. The new channel replaces
/// the old one wholesale, values and mask. An empty image accepts an empty
/// alpha and only changes mode.
pub fn putalpha(image: &mut Image, alpha: Channel) -> OpsResult<()> {
    if !(image.is_empty() && alpha.is_empty()) {
        ensure_shape(image.shape(), alpha.shape())?;
    }
    let mode = image.mode();
    trace!(%mode, "composite::putalpha");
    if !mode.has_alpha() {
        image.convert(mode.with_alpha())?;
    }
    if !image.is_empty() {
        let last = image.channels().len() - 1;
        image.set_channel(last, alpha)?;
    }
    Ok(())
}

/// Uses `other` as background where `image` has missing data.
///
/// A pixel counts as missing only where every channel of `image` is masked.
/// There, each channel takes `other`'s value and `other`'s mask, so the
/// pixel stays invalid only where both images lack it. Elsewhere values and
/// masks of `image` are kept, partially masked pixels included.
///
/// # Errors
///
/// Fails if `image` is empty, if the images differ in mode or shape, or if
/// either image breaks its channel invariants.
pub fn merge(image: &mut Image, other: &Image) -> OpsResult<()> {
    ensure_not_empty(image, "merge")?;
    ensure_mode(other, image.mode())?;
    ensure_shape(image.shape(), other.shape())?;
    image.check()?;
    other.check()?;
    trace!(height = image.height(), width = image.width(), "composite::merge");

    let missing = mask_all(image.channels());
    debug!(
        missing = missing.iter().filter(|m| **m).count(),
        "Merging background into missing pixels"
    );

    let (height, width) = image.shape();
    for (i, bg) in other.channels().iter().enumerate() {
        let fg = &image.channels()[i];
        let values = fg
            .values()
            .iter()
            .zip(bg.values())
            .zip(&missing)
            .map(|((&f, &b), &m)| if m { b } else { f })
            .collect();
        let mask = fg
            .mask()
            .iter()
            .zip(bg.mask())
            .zip(&missing)
            .map(|((&f, &b), &m)| if m { b } else { f })
            .collect();
        image.set_channel(i, Channel::new(height, width, values, mask)?)?;
    }
    Ok(())
}

/// Alpha-blends `other` on top of `image` (source-over), in place.
///
/// Both images must be RGBA with the same shape. Derived channel masks are
/// the disjunction of the masks they are computed from.
pub fn blend(image: &mut Image, other: &Image) -> OpsResult<()> {
    ensure_mode(image, Mode::Rgba)?;
    ensure_mode(other, Mode::Rgba)?;
    ensure_shape(image.shape(), other.shape())?;
    image.check()?;
    other.check()?;
    trace!(height = image.height(), width = image.width(), "composite::blend");
    debug!(height = image.height(), width = image.width(), "Blending over");

    let src = other.channels();
    let dst = image.channels();
    let (sa, da) = (src[3].values(), dst[3].values());
    let out_alpha = Channel::derive(&[&src[3], &dst[3]], |i| sa[i] + da[i] * (1.0 - sa[i]))?;

    let oa = out_alpha.values();
    let mut colors = Vec::with_capacity(3);
    for c in 0..3 {
        let (sc, dc) = (src[c].values(), dst[c].values());
        let chn = Channel::derive(&[&src[c], &src[3], &dst[c], &dst[3]], |i| {
            if oa[i] == 0.0 {
                0.0
            } else {
                (sc[i] * sa[i] + dc[i] * da[i] * (1.0 - sa[i])) / oa[i]
            }
        })?;
        colors.push(chn);
    }

    for (c, chn) in colors.into_iter().enumerate() {
        image.set_channel(c, chn)?;
    }
    image.set_channel(3, out_alpha)?;
    Ok(())
}
