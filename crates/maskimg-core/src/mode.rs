//! Mode registry.
//!
//! A [`Mode`] names the color-space/structural layout of an image's channels.
//! Every mode has an alpha variant with a trailing `A`, and the number of
//! uppercase letters in the name is the number of channels:
//!
//! | Mode     | Channels              |
//! |----------|-----------------------|
//! | `L`      | luminance             |
//! | `LA`     | luminance, alpha      |
//! | `RGB`    | red, green, blue      |
//! | `RGBA`   | red, green, blue, alpha |
//! | `YCbCr`  | luma, blue-difference, red-difference |
//! | `YCbCrA` | luma, Cb, Cr, alpha   |
//! | `P`      | palette index         |
//! | `PA`     | palette index, alpha  |
//!
//! ```rust
//! use maskimg_core::Mode;
//!
//! let mode: Mode = "YCbCrA".parse().unwrap();
//! assert_eq!(mode.channel_count(), 4);
//! assert_eq!(mode.without_alpha(), Mode::YCbCr);
//! assert_eq!(Mode::L.with_alpha(), Mode::LA);
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Color mode of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Single luminance channel.
    #[default]
    L,
    /// Luminance plus alpha.
    LA,
    /// Red, green, blue.
    #[cfg_attr(feature = "serde", serde(rename = "RGB"))]
    Rgb,
    /// Red, green, blue plus alpha.
    #[cfg_attr(feature = "serde", serde(rename = "RGBA"))]
    Rgba,
    /// BT.601 luma and chroma differences.
    YCbCr,
    /// YCbCr plus alpha.
    YCbCrA,
    /// Palette index.
    P,
    /// Palette index plus alpha.
    PA,
}

impl Mode {
    /// All registered modes, in registry order.
    pub const ALL: [Mode; 8] = [
        Mode::L,
        Mode::LA,
        Mode::Rgb,
        Mode::Rgba,
        Mode::YCbCr,
        Mode::YCbCrA,
        Mode::P,
        Mode::PA,
    ];

    /// Canonical name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::L => "L",
            Mode::LA => "LA",
            Mode::Rgb => "RGB",
            Mode::Rgba => "RGBA",
            Mode::YCbCr => "YCbCr",
            Mode::YCbCrA => "YCbCrA",
            Mode::P => "P",
            Mode::PA => "PA",
        }
    }

    /// Number of channels the mode implies (uppercase letter count).
    pub const fn channel_count(self) -> usize {
        match self {
            Mode::L | Mode::P => 1,
            Mode::LA | Mode::PA => 2,
            Mode::Rgb | Mode::YCbCr => 3,
            Mode::Rgba | Mode::YCbCrA => 4,
        }
    }

    /// Channel names in semantic order.
    pub const fn channel_names(self) -> &'static [&'static str] {
        match self {
            Mode::L => &["L"],
            Mode::LA => &["L", "A"],
            Mode::Rgb => &["R", "G", "B"],
            Mode::Rgba => &["R", "G", "B", "A"],
            Mode::YCbCr => &["Y", "Cb", "Cr"],
            Mode::YCbCrA => &["Y", "Cb", "Cr", "A"],
            Mode::P => &["P"],
            Mode::PA => &["P", "A"],
        }
    }

    /// Returns `true` if the last channel is alpha.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Mode::LA | Mode::Rgba | Mode::YCbCrA | Mode::PA)
    }

    /// Returns `true` for palette-indexed modes.
    #[inline]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Mode::P | Mode::PA)
    }

    /// The alpha variant of this mode (identity for alpha modes).
    pub const fn with_alpha(self) -> Mode {
        match self {
            Mode::L | Mode::LA => Mode::LA,
            Mode::Rgb | Mode::Rgba => Mode::Rgba,
            Mode::YCbCr | Mode::YCbCrA => Mode::YCbCrA,
            Mode::P | Mode::PA => Mode::PA,
        }
    }

    /// The non-alpha variant of this mode (identity for non-alpha modes).
    pub const fn without_alpha(self) -> Mode {
        match self {
            Mode::L | Mode::LA => Mode::L,
            Mode::Rgb | Mode::Rgba => Mode::Rgb,
            Mode::YCbCr | Mode::YCbCrA => Mode::YCbCr,
            Mode::P | Mode::PA => Mode::P,
        }
    }

    /// Number of color (non-alpha) channels.
    #[inline]
    pub const fn color_channel_count(self) -> usize {
        self.without_alpha().channel_count()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownMode(s.to_string()))
    }
}
