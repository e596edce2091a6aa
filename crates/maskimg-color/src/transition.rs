//! The direct transition table.
//!
//! Alpha handling is done by the state machine in [`crate::convert`]; this
//! module covers the color-space and structural moves between the
//! non-alpha modes. Each move is a [`Transition`] variant dispatching to a
//! pure function from the current [`Image`] to a new [`Layout`]. Channels
//! after the color channels (alpha) are carried over unchanged.
//!
//! | from \ to | L | RGB | YCbCr | P |
//! |-----------|---|-----|-------|---|
//! | L         |   | [`LToRgb`](Transition::LToRgb) | [`LToYCbCr`](Transition::LToYCbCr) | [`ToPalette`](Transition::ToPalette) |
//! | RGB       | [`RgbToL`](Transition::RgbToL) | | [`RgbToYCbCr`](Transition::RgbToYCbCr) | [`ToPalette`](Transition::ToPalette) |
//! | YCbCr     | [`YCbCrToL`](Transition::YCbCrToL) | [`YCbCrToRgb`](Transition::YCbCrToRgb) | | [`ToPalette`](Transition::ToPalette) |
//! | P         | [`FromPalette`](Transition::FromPalette) | [`FromPalette`](Transition::FromPalette) | [`FromPalette`](Transition::FromPalette) | |

use crate::palette::{entry_for_index, expand, quantize};
use crate::ycbcr::{luma_channel, rgb_to_ycbcr, rgb_to_ycbcr_channels, ycbcr_to_rgb, ycbcr_to_rgb_channels};
use maskimg_core::{Channel, Error, Image, Layout, Mode, Result};

/// A direct move between two non-alpha modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// RGB to YCbCr.
    RgbToYCbCr,
    /// RGB to L (luma only).
    RgbToL,
    /// YCbCr to RGB.
    YCbCrToRgb,
    /// YCbCr to L (drop chroma).
    YCbCrToL,
    /// L to RGB (replicate).
    LToRgb,
    /// L to YCbCr (zero chroma).
    LToYCbCr,
    /// Direct mode to palette index.
    ToPalette,
    /// Palette index to the palette's direct mode.
    FromPalette,
}

impl Transition {
    /// Looks up the move between two modes, ignoring their alpha variants.
    ///
    /// Returns `None` for pairs absent from the table, including identical
    /// modes.
    pub fn lookup(from: Mode, to: Mode) -> Option<Self> {
        use Mode::*;
        let t = match (from.without_alpha(), to.without_alpha()) {
            (Rgb, YCbCr) => Self::RgbToYCbCr,
            (Rgb, L) => Self::RgbToL,
            (YCbCr, Rgb) => Self::YCbCrToRgb,
            (YCbCr, L) => Self::YCbCrToL,
            (L, Rgb) => Self::LToRgb,
            (L, YCbCr) => Self::LToYCbCr,
            (Rgb | YCbCr | L, P) => Self::ToPalette,
            (P, Rgb | YCbCr | L) => Self::FromPalette,
            _ => return None,
        };
        Some(t)
    }

    /// Modes accepted as the source of this move.
    fn accepts(self, mode: Mode) -> bool {
        let base = mode.without_alpha();
        match self {
            Self::RgbToYCbCr | Self::RgbToL => base == Mode::Rgb,
            Self::YCbCrToRgb | Self::YCbCrToL => base == Mode::YCbCr,
            Self::LToRgb | Self::LToYCbCr => base == Mode::L,
            Self::ToPalette => !base.is_indexed(),
            Self::FromPalette => base.is_indexed(),
        }
    }

    /// Computes the layout reached by applying this move to `image`.
    ///
    /// `target` is the mode the new layout is tagged with; its alpha variant
    /// must match the image's.
    pub fn apply(self, image: &Image, target: Mode) -> Result<Layout> {
        let mode = image.mode();
        if !self.accepts(mode) {
            return Err(Error::wrong_mode(format!("a source mode for {self:?}"), mode));
        }
        if mode.has_alpha() != target.has_alpha() {
            return Err(Error::unsupported_conversion(mode, target));
        }
        match self {
            Self::RgbToYCbCr => rgb_to_ycbcr_layout(image, target),
            Self::YCbCrToRgb => ycbcr_to_rgb_layout(image, target),
            Self::RgbToL => rgb_to_l_layout(image, target),
            Self::YCbCrToL => ycbcr_to_l_layout(image, target),
            Self::LToRgb => l_to_rgb_layout(image, target),
            Self::LToYCbCr => l_to_ycbcr_layout(image, target),
            Self::ToPalette => to_palette_layout(image, target),
            Self::FromPalette => from_palette_layout(image, target),
        }
    }
}

fn layout(image: &Image, mode: Mode, channels: Vec<Channel>, fill_value: Option<Vec<f32>>) -> Layout {
    Layout {
        mode,
        channels,
        fill_value,
        palette: image.palette().cloned(),
        secondary_mode: image.secondary_mode(),
    }
}

fn rgb_to_ycbcr_layout(image: &Image, target: Mode) -> Result<Layout> {
    let ch = image.channels();
    let converted = rgb_to_ycbcr_channels(&ch[0], &ch[1], &ch[2])?;
    let channels = converted.into_iter().chain(ch[3..].iter().cloned()).collect();
    let fill = image.fill_value().map(|f| {
        let (y, cb, cr) = rgb_to_ycbcr(f[0], f[1], f[2]);
        [y, cb, cr].into_iter().chain(f[3..].iter().copied()).collect()
    });
    Ok(layout(image, target, channels, fill))
}

fn ycbcr_to_rgb_layout(image: &Image, target: Mode) -> Result<Layout> {
    let ch = image.channels();
    let converted = ycbcr_to_rgb_channels(&ch[0], &ch[1], &ch[2])?;
    let channels = converted.into_iter().chain(ch[3..].iter().cloned()).collect();
    let fill = image.fill_value().map(|f| {
        let (r, g, b) = ycbcr_to_rgb(f[0], f[1], f[2]);
        [r, g, b].into_iter().chain(f[3..].iter().copied()).collect()
    });
    Ok(layout(image, target, channels, fill))
}

fn rgb_to_l_layout(image: &Image, target: Mode) -> Result<Layout> {
    let ch = image.channels();
    let luma = luma_channel(&ch[0], &ch[1], &ch[2])?;
    let channels = std::iter::once(luma).chain(ch[3..].iter().cloned()).collect();
    let fill = image.fill_value().map(|f| {
        let (y, _, _) = rgb_to_ycbcr(f[0], f[1], f[2]);
        std::iter::once(y).chain(f[3..].iter().copied()).collect()
    });
    Ok(layout(image, target, channels, fill))
}

fn ycbcr_to_l_layout(image: &Image, target: Mode) -> Result<Layout> {
    let ch = image.channels();
    let channels = std::iter::once(&ch[0]).chain(&ch[3..]).cloned().collect();
    let fill = image
        .fill_value()
        .map(|f| std::iter::once(f[0]).chain(f[3..].iter().copied()).collect());
    Ok(layout(image, target, channels, fill))
}

fn l_to_ycbcr_layout(image: &Image, target: Mode) -> Result<Layout> {
    let ch = image.channels();
    let luma = &ch[0];
    let (height, width) = luma.shape();
    let chroma = Channel::new(height, width, vec![0.0; luma.len()], luma.mask().to_vec())?;
    let channels = [luma.clone(), chroma.clone(), chroma]
        .into_iter()
        .chain(ch[1..].iter().cloned())
        .collect();
    let fill = image
        .fill_value()
        .map(|f| [f[0], 0.0, 0.0].into_iter().chain(f[1..].iter().copied()).collect());
    Ok(layout(image, target, channels, fill))
}

fn l_to_rgb_layout(image: &Image, target: Mode) -> Result<Layout> {
    let ch = image.channels();
    let channels = [&ch[0], &ch[0], &ch[0]]
        .into_iter()
        .chain(&ch[1..])
        .cloned()
        .collect();
    let fill = image
        .fill_value()
        .map(|f| [f[0], f[0], f[0]].into_iter().chain(f[1..].iter().copied()).collect());
    Ok(layout(image, target, channels, fill))
}

fn to_palette_layout(image: &Image, target: Mode) -> Result<Layout> {
    let source = image.mode();
    let ch = image.channels();
    let n_color = source.color_channel_count();
    let (index, mut palette) = quantize(&ch[..n_color])?;

    let fill = image.fill_value().map(|f| {
        let idx = palette.register(&f[..n_color]) as f32;
        std::iter::once(idx).chain(f[n_color..].iter().copied()).collect()
    });

    let channels = std::iter::once(index).chain(ch[n_color..].iter().cloned()).collect();
    Ok(Layout {
        mode: target,
        channels,
        fill_value: fill,
        palette: Some(palette),
        secondary_mode: source.without_alpha(),
    })
}

fn from_palette_layout(image: &Image, target: Mode) -> Result<Layout> {
    let source = image.mode();
    let palette = image.palette().ok_or(Error::MissingPalette(source))?;
    let reached = if source.has_alpha() {
        image.secondary_mode().with_alpha()
    } else {
        image.secondary_mode()
    };
    if reached != target {
        return Err(Error::unsupported_conversion(source, target));
    }
    if palette.width() != reached.color_channel_count() {
        return Err(Error::invalid_parameter(format!(
            "palette entries have {} components, {} needs {}",
            palette.width(),
            reached,
            reached.color_channel_count()
        )));
    }

    let ch = image.channels();
    let mut channels = expand(&ch[0], palette)?;
    channels.extend(ch[1..].iter().cloned());

    let fill = match image.fill_value() {
        Some(f) => {
            let mut color = entry_for_index(palette, f[0])?;
            color.extend_from_slice(&f[1..]);
            Some(color)
        }
        None => None,
    };

    Ok(Layout {
        mode: target,
        channels,
        fill_value: fill,
        palette: None,
        secondary_mode: image.secondary_mode(),
    })
}
