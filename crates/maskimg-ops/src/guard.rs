//! Precondition guards for image operations.
//!
//! Operations check their inputs up front so that a rejected call leaves the
//! image untouched.
//!
//! # Example
//!
//! ```rust
//! use maskimg_core::{Image, Mode};
//! use maskimg_ops::guard::ensure_not_empty;
//!
//! let img = Image::empty(Mode::L);
//! assert!(ensure_not_empty(&img, "resize").is_err());
//! ```

use crate::{OpsError, OpsResult};
use maskimg_core::{Image, Mode};

/// Fails with [`OpsError::EmptyImage`] if `image` has no channels.
///
/// `op` names the operation in the error message.
pub fn ensure_not_empty(image: &Image, op: &'static str) -> OpsResult<()> {
    if image.is_empty() {
        return Err(OpsError::EmptyImage(op));
    }
    Ok(())
}

/// Fails with [`OpsError::ModeMismatch`] unless `image` is in `mode`.
pub fn ensure_mode(image: &Image, mode: Mode) -> OpsResult<()> {
    if image.mode() != mode {
        return Err(OpsError::mode_mismatch(mode, image.mode()));
    }
    Ok(())
}

/// Fails with [`OpsError::SizeMismatch`] unless both shapes agree.
pub fn ensure_shape(expected: (usize, usize), got: (usize, usize)) -> OpsResult<()> {
    if expected != got {
        return Err(OpsError::size_mismatch(expected, got));
    }
    Ok(())
}

/// Checks a per-channel parameter list against the image's channel count.
///
/// `what` names the parameter in the error message.
pub fn ensure_per_channel<T>(image: &Image, values: &[T], what: &str) -> OpsResult<()> {
    let count = image.channels().len();
    if values.len() != count {
        return Err(OpsError::invalid_parameter(format!(
            "number of channels ({count}) and {what} components ({}) differ",
            values.len()
        )));
    }
    Ok(())
}

/// Number of leading channels that carry color (alpha excluded).
#[inline]
pub fn color_channel_count(image: &Image) -> usize {
    let n = image.channels().len();
    if image.mode().has_alpha() { n.saturating_sub(1) } else { n }
}
