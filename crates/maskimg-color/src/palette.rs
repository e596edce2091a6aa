//! Palette quantization and expansion.
//!
//! [`quantize`] turns direct color channels into one index channel plus a
//! [`Palette`] of exact colors, in first-seen (row-major) order.
//! [`expand`] goes the other way, interpolating each output channel against
//! the palette so fractional indices blend neighbouring entries.

use maskimg_core::interp::interp_uniform;
use maskimg_core::{mask_any, Channel, Error, Palette, Result};
use tracing::debug;

/// Quantizes `colors` into an index channel and a palette.
///
/// Each pixel tuple is matched exactly against the palette built so far and
/// appended when unseen. Underlying values of masked pixels take part in the
/// matching; the index mask is the disjunction of all color masks.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for no channels and
/// [`Error::ShapeMismatch`] for channels of different shapes.
///
/// # Example
///
/// ```rust
/// use maskimg_color::palette::quantize;
/// use maskimg_core::Channel;
///
/// let r = Channel::from_rows(&[vec![1.0, 0.0, 1.0]]).unwrap();
/// let g = Channel::from_rows(&[vec![0.0, 1.0, 0.0]]).unwrap();
/// let (index, palette) = quantize(&[r, g]).unwrap();
/// assert_eq!(index.values(), &[0.0, 1.0, 0.0]);
/// assert_eq!(palette.len(), 2);
/// ```
pub fn quantize(colors: &[Channel]) -> Result<(Channel, Palette)> {
    let first = colors
        .first()
        .ok_or_else(|| Error::invalid_parameter("cannot quantize zero channels"))?;
    let (height, width) = first.shape();
    if let Some(bad) = colors.iter().find(|c| c.shape() != first.shape()) {
        return Err(Error::shape_mismatch(first.shape(), bad.shape()));
    }

    let mut palette = Palette::new(colors.len());
    let mut tuple = vec![0.0f32; colors.len()];
    let mut indices = Vec::with_capacity(first.len());
    for i in 0..first.len() {
        for (slot, chn) in tuple.iter_mut().zip(colors) {
            *slot = chn.values()[i];
        }
        indices.push(palette.register(&tuple) as f32);
    }
    debug!(colors = palette.len(), height, width, "Quantized to palette");

    let index = Channel::new(height, width, indices, mask_any(colors))?;
    Ok((index, palette))
}

/// Expands an index channel into one channel per palette component.
///
/// Index values are abscissae against knots `0..len-1`; values outside the
/// palette clamp to its ends. The index mask is copied to every output.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for an empty palette.
pub fn expand(index: &Channel, palette: &Palette) -> Result<Vec<Channel>> {
    if palette.is_empty() {
        return Err(Error::invalid_parameter("cannot expand an empty palette"));
    }
    let (height, width) = index.shape();
    (0..palette.width())
        .map(|c| {
            let fp = palette.component(c);
            let mut chn = Channel::new(height, width, index.values().to_vec(), index.mask().to_vec())?;
            chn.map_values(|x| interp_uniform(x, &fp));
            Ok(chn)
        })
        .collect()
}

/// Palette entry referenced by a (possibly fractional) index fill value.
///
/// The index is truncated toward zero before lookup.
pub fn entry_for_index(palette: &Palette, index: f32) -> Result<Vec<f32>> {
    let idx = index.trunc();
    if idx < 0.0 || !idx.is_finite() {
        return Err(Error::invalid_parameter(format!("palette index {index} is invalid")));
    }
    palette
        .get(idx as usize)
        .map(<[f32]>::to_vec)
        .ok_or_else(|| {
            Error::invalid_parameter(format!(
                "palette index {index} out of range for {} entries",
                palette.len()
            ))
        })
}
