//! BT.601 luma/chroma transforms.
//!
//! Fixed coefficients `kr = 0.299`, `kb = 0.114`:
//!
//! ```text
//! Y  = kr·R + (1 − kr − kb)·G + kb·B
//! Cb = (B − Y) / (2(1 − kb))
//! Cr = (R − Y) / (2(1 − kr))
//!
//! R = Y + 2·Cr·(1 − kr)
//! B = Y + 2·Cb·(1 − kb)
//! G = (Y − kr·R − kb·B) / (1 − kr − kb)
//! ```
//!
//! Channel-level functions propagate masks by the formulas' dependencies:
//! Y, Cb and Cr each depend on all of R, G, B; R depends on Y and Cr, B on
//! Y and Cb, G on all three.
//!
//! ```rust
//! use maskimg_color::ycbcr::{rgb_to_ycbcr, ycbcr_to_rgb};
//!
//! let (y, cb, cr) = rgb_to_ycbcr(1.0, 0.0, 0.0);
//! assert!((y - 0.299).abs() < 1e-6);
//! assert!((cb + 0.1687).abs() < 1e-4);
//! assert!((cr - 0.5).abs() < 1e-6);
//!
//! let (r, g, b) = ycbcr_to_rgb(y, cb, cr);
//! assert!((r - 1.0).abs() < 1e-5 && g.abs() < 1e-5 && b.abs() < 1e-5);
//! ```

use maskimg_core::{Channel, Result};

/// Red luma coefficient.
pub const KR: f32 = 0.299;
/// Blue luma coefficient.
pub const KB: f32 = 0.114;
/// Green luma coefficient.
pub const KG: f32 = 1.0 - KR - KB;

/// Luma of an RGB triple.
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    KR * r + KG * g + KB * b
}

/// RGB to YCbCr for one triple.
#[inline]
pub fn rgb_to_ycbcr(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = luma(r, g, b);
    let cb = (b - y) / (2.0 * (1.0 - KB));
    let cr = (r - y) / (2.0 * (1.0 - KR));
    (y, cb, cr)
}

/// YCbCr to RGB for one triple.
#[inline]
pub fn ycbcr_to_rgb(y: f32, cb: f32, cr: f32) -> (f32, f32, f32) {
    let r = red(y, cr);
    let b = blue(y, cb);
    let g = (y - KR * r - KB * b) / KG;
    (r, g, b)
}

#[inline]
fn red(y: f32, cr: f32) -> f32 {
    y + 2.0 * cr * (1.0 - KR)
}

#[inline]
fn blue(y: f32, cb: f32) -> f32 {
    y + 2.0 * cb * (1.0 - KB)
}

/// Luma channel of three RGB channels.
pub fn luma_channel(r: &Channel, g: &Channel, b: &Channel) -> Result<Channel> {
    let (rv, gv, bv) = (r.values(), g.values(), b.values());
    Channel::derive(&[r, g, b], |i| luma(rv[i], gv[i], bv[i]))
}

/// Converts three RGB channels to `[Y, Cb, Cr]`.
pub fn rgb_to_ycbcr_channels(r: &Channel, g: &Channel, b: &Channel) -> Result<[Channel; 3]> {
    let (rv, bv) = (r.values(), b.values());
    let y = luma_channel(r, g, b)?;
    let yv = y.values();
    let cb = Channel::derive(&[r, g, b], |i| (bv[i] - yv[i]) / (2.0 * (1.0 - KB)))?;
    let cr = Channel::derive(&[r, g, b], |i| (rv[i] - yv[i]) / (2.0 * (1.0 - KR)))?;
    Ok([y, cb, cr])
}

/// Converts three YCbCr channels to `[R, G, B]`.
pub fn ycbcr_to_rgb_channels(y: &Channel, cb: &Channel, cr: &Channel) -> Result<[Channel; 3]> {
    let (yv, cbv, crv) = (y.values(), cb.values(), cr.values());
    let r = Channel::derive(&[y, cr], |i| red(yv[i], crv[i]))?;
    let b = Channel::derive(&[y, cb], |i| blue(yv[i], cbv[i]))?;
    let (rv, bv) = (r.values(), b.values());
    let g = Channel::derive(&[y, cb, cr], |i| (yv[i] - KR * rv[i] - KB * bv[i]) / KG)?;
    Ok([r, g, b])
}
