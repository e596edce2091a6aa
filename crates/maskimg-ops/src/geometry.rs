//! Integer-factor resizing and luminance replacement.

use crate::guard::ensure_not_empty;
use crate::{OpsError, OpsResult};
use maskimg_color::Convert;
use maskimg_core::{Channel, Image, Mode};
use tracing::debug;

/// Resizes `image` to `height x width` in place.
///
/// Each axis either zooms by an integer factor (nearest neighbour, every
/// row or column repeated) or shrinks by an integer factor (decimation,
/// every n-th row or column kept). Masks follow their values.
///
/// ```rust
/// use maskimg_core::{Image, Mode};
/// use maskimg_ops::geometry::resize;
///
/// let mut img = Image::builder(Mode::L).rows(vec![vec![0.0, 1.0]]).build().unwrap();
/// resize(&mut img, 2, 4).unwrap();
/// assert_eq!(img.channel(0).unwrap().values(), &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
/// ```
///
/// # Errors
///
/// [`OpsError::EmptyImage`] for an empty image and
/// [`OpsError::InvalidParameter`] for zero or non-integer factors.
pub fn resize(image: &mut Image, height: usize, width: usize) -> OpsResult<()> {
    ensure_not_empty(image, "resize")?;
    let rows = axis_indices(image.height(), height)?;
    let cols = axis_indices(image.width(), width)?;
    debug!(
        from_height = image.height(),
        from_width = image.width(),
        height,
        width,
        "Resizing image"
    );

    let mut layout = image.layout();
    layout.channels = image.channels().iter().map(|c| c.select(&rows, &cols)).collect();
    image.apply_layout(layout)?;
    Ok(())
}

/// Source index for every output position along one axis.
fn axis_indices(current: usize, target: usize) -> OpsResult<Vec<usize>> {
    if target == 0 || current == 0 {
        return Err(OpsError::invalid_parameter(format!(
            "cannot resize from {current} to {target}"
        )));
    }
    if target >= current {
        if target % current != 0 {
            return Err(OpsError::invalid_parameter(format!(
                "resize from {current} to {target} is not of integer factor"
            )));
        }
        let factor = target / current;
        Ok((0..target).map(|i| i / factor).collect())
    } else {
        if current % target != 0 {
            return Err(OpsError::invalid_parameter(format!(
                "resize from {current} to {target} is not of integer factor"
            )));
        }
        let factor = current / target;
        Ok((0..target).map(|i| i * factor).collect())
    }
}

/// Replaces the luminance of `image` with `luminance`.
///
/// The image is converted to `YCbCr` (or `YCbCrA`), its Y channel replaced,
/// and converted back to its original mode. A larger luminance with the
/// same aspect ratio first upsizes the image with [`resize`]. Empty images
/// are left alone.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] when the luminance is smaller than the image
/// or has a different aspect ratio; conversion and resize errors propagate.
/// On error the image is unchanged.
pub fn replace_luminance(image: &mut Image, luminance: Channel) -> OpsResult<()> {
    if image.is_empty() {
        return Ok(());
    }
    let mut work = image.clone();
    let (h, w) = work.shape();
    let (lh, lw) = luminance.shape();
    if (lh, lw) != (h, w) {
        if lh * w != lw * h {
            return Err(OpsError::SizeMismatch(format!(
                "luminance {lh}x{lw} does not match the aspect ratio of {h}x{w}"
            )));
        }
        if lh < h {
            return Err(OpsError::SizeMismatch(format!(
                "luminance {lh}x{lw} is smaller than the image {h}x{w}"
            )));
        }
        resize(&mut work, lh, lw)?;
    }

    let mode = work.mode();
    let luma_mode = if mode.has_alpha() { Mode::YCbCrA } else { Mode::YCbCr };
    debug!(%mode, "Replacing luminance");
    work.convert(luma_mode)?;
    work.set_channel(0, luminance)?;
    work.convert(mode)?;
    *image = work;
    Ok(())
}
