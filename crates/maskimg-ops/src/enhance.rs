//! Inversion, gamma correction, clipping and the enhancement pipeline.
//!
//! [`enhance`] runs a fixed pipeline over an image: invert, then stretch,
//! then gamma. Callers needing another order call the primitives directly.
//!
//! ```rust
//! use maskimg_core::{Image, Mode};
//! use maskimg_ops::enhance::{enhance, EnhanceOptions, GammaSpec};
//! use maskimg_ops::stretch::Stretch;
//!
//! let mut img = Image::builder(Mode::L)
//!     .rows(vec![vec![0.0, 0.25], vec![0.5, 1.0]])
//!     .build()
//!     .unwrap();
//!
//! let opts = EnhanceOptions {
//!     invert: true.into(),
//!     stretch: Stretch::No,
//!     gamma: GammaSpec::Uniform(0.5),
//! };
//! enhance(&mut img, &opts).unwrap();
//!
//! // 1 - 0.25 = 0.75, then 0.75 ^ (1 / 0.5)
//! assert_eq!(img.channel(0).unwrap().value(0, 1), 0.5625);
//! ```

use crate::guard::{color_channel_count, ensure_per_channel};
use crate::stretch::{stretch, Stretch};
use crate::{OpsError, OpsResult};
use maskimg_core::Image;
use tracing::debug;

/// Which channels an operation touches.
///
/// `All(flag)` selects every channel when `flag` is set (and none
/// otherwise); `PerChannel` holds one flag per channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum ChannelSelection {
    /// Every channel or none.
    All(bool),
    /// One flag per channel, by index.
    PerChannel(Vec<bool>),
}

/// Channel selection for [`invert`].
pub type InvertSpec = ChannelSelection;

impl Default for ChannelSelection {
    fn default() -> Self {
        Self::All(false)
    }
}

impl From<bool> for ChannelSelection {
    fn from(flag: bool) -> Self {
        Self::All(flag)
    }
}

impl From<Vec<bool>> for ChannelSelection {
    fn from(flags: Vec<bool>) -> Self {
        Self::PerChannel(flags)
    }
}

impl ChannelSelection {
    /// Indices of the selected channels of `image`.
    fn indices(&self, image: &Image) -> OpsResult<Vec<usize>> {
        let count = image.channels().len();
        match self {
            Self::All(true) => Ok((0..count).collect()),
            Self::All(false) => Ok(Vec::new()),
            Self::PerChannel(flags) => {
                ensure_per_channel(image, flags, "selection")?;
                Ok(flags
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &on)| on.then_some(i))
                    .collect())
            }
        }
    }
}

/// Gamma exponents for [`gamma`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum GammaSpec {
    /// One gamma for every non-alpha channel.
    Uniform(f32),
    /// One gamma per channel (alpha included), by index.
    PerChannel(Vec<f32>),
}

impl Default for GammaSpec {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

impl GammaSpec {
    /// One exponent per affected channel, validated.
    fn resolve(&self, image: &Image) -> OpsResult<Vec<f32>> {
        let gammas = match self {
            Self::Uniform(g) => vec![*g; color_channel_count(image)],
            Self::PerChannel(gs) => {
                ensure_per_channel(image, gs, "gamma")?;
                gs.clone()
            }
        };
        if let Some(bad) = gammas.iter().find(|g| g.is_nan() || **g < 0.0) {
            return Err(OpsError::invalid_parameter(format!(
                "gamma correction must be a positive number, got {bad}"
            )));
        }
        Ok(gammas)
    }
}

impl From<f32> for GammaSpec {
    fn from(g: f32) -> Self {
        Self::Uniform(g)
    }
}

impl From<Vec<f32>> for GammaSpec {
    fn from(gammas: Vec<f32>) -> Self {
        Self::PerChannel(gammas)
    }
}

/// Parameters of the [`enhance`] pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EnhanceOptions {
    /// Channels to invert first.
    pub invert: InvertSpec,
    /// Stretch applied second.
    pub stretch: Stretch,
    /// Gamma applied last.
    pub gamma: GammaSpec,
}

/// Inverts selected channels: `v -> 1 - v`. Masks are untouched.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if a per-channel list has the wrong length.
pub fn invert(image: &mut Image, spec: &InvertSpec) -> OpsResult<()> {
    let indices = spec.indices(image)?;
    debug!(?spec, "Applying invert");
    for i in indices {
        image.channels_mut()[i].map_values(|v| 1.0 - v);
    }
    Ok(())
}

/// Gamma correction: `v -> v ^ (1 / g)`.
///
/// A uniform gamma applies to non-alpha channels; a per-channel list needs
/// one entry per channel and may target alpha. Channels with `g == 1` are
/// skipped, so they stay bit-identical.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] for negative or NaN gammas and for lists of
/// the wrong length; nothing is modified in that case.
pub fn gamma(image: &mut Image, spec: &GammaSpec) -> OpsResult<()> {
    let gammas = spec.resolve(image)?;
    for (chn, g) in image.channels_mut().iter_mut().zip(gammas) {
        debug!(gamma = g, "Applying gamma");
        if g == 1.0 {
            continue;
        }
        let exponent = 1.0 / g;
        chn.map_values(|v| v.powf(exponent));
    }
    Ok(())
}

/// Clamps selected channels to `[0, 1]`. Masks are untouched.
pub fn clip(image: &mut Image, channels: &ChannelSelection) -> OpsResult<()> {
    for i in channels.indices(image)? {
        image.channels_mut()[i].clip(0.0, 1.0);
    }
    Ok(())
}

/// Runs invert, stretch and gamma in that order.
///
/// All parameters are validated before the first step runs.
pub fn enhance(image: &mut Image, options: &EnhanceOptions) -> OpsResult<()> {
    options.invert.indices(image)?;
    options
        .stretch
        .validate(color_channel_count(image), image.channels().len())?;
    options.gamma.resolve(image)?;

    invert(image, &options.invert)?;
    stretch(image, &options.stretch)?;
    gamma(image, &options.gamma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskimg_core::{Channel, Mode};

    fn la_image() -> Image {
        Image::builder(Mode::LA)
            .masked_rows(vec![vec![Some(0.25), None]])
            .rows(vec![vec![0.5, 1.0]])
            .build()
            .unwrap()
    }

    #[test]
    fn test_invert_all_and_per_channel() {
        let mut img = la_image();
        invert(&mut img, &true.into()).unwrap();
        assert_eq!(img.channel(0).unwrap().values(), &[0.75, 1.0]);
        assert_eq!(img.channel(0).unwrap().mask(), &[false, true]);
        assert_eq!(img.channel(1).unwrap().values(), &[0.5, 0.0]);

        let mut img = la_image();
        invert(&mut img, &vec![false, true].into()).unwrap();
        assert_eq!(img.channel(0).unwrap().values(), &[0.25, 0.0]);
        assert_eq!(img.channel(1).unwrap().values(), &[0.5, 0.0]);

        let err = invert(&mut img, &vec![true].into()).unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_gamma_one_is_identity() {
        let mut img = Image::builder(Mode::Rgb)
            .rows(vec![vec![0.1, 0.7]])
            .rows(vec![vec![0.3, 0.9]])
            .rows(vec![vec![0.333, 0.0]])
            .build()
            .unwrap();
        let before = img.clone();
        gamma(&mut img, &GammaSpec::Uniform(1.0)).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_gamma_skips_alpha_unless_listed() {
        let mut img = la_image();
        gamma(&mut img, &GammaSpec::Uniform(0.5)).unwrap();
        assert_eq!(img.channel(0).unwrap().values()[0], 0.0625);
        assert_eq!(img.channel(1).unwrap().values(), &[0.5, 1.0]);

        let mut img = la_image();
        gamma(&mut img, &GammaSpec::PerChannel(vec![1.0, 0.5])).unwrap();
        assert_eq!(img.channel(0).unwrap().values()[0], 0.25);
        assert_eq!(img.channel(1).unwrap().values(), &[0.25, 1.0]);
    }

    #[test]
    fn test_negative_gamma_rejected() {
        let mut img = la_image();
        let before = img.clone();
        assert!(gamma(&mut img, &GammaSpec::Uniform(-1.0)).is_err());
        assert!(gamma(&mut img, &GammaSpec::PerChannel(vec![1.0, 2.0, 3.0])).is_err());
        assert_eq!(img, before);
    }

    #[test]
    fn test_clip() {
        let chn = Channel::from_rows(&[vec![-0.5, 0.5, 1.5]]).unwrap();
        let mut img = Image::new(vec![chn], Mode::L).unwrap();
        clip(&mut img, &ChannelSelection::All(false)).unwrap();
        assert_eq!(img.channel(0).unwrap().values(), &[-0.5, 0.5, 1.5]);
        clip(&mut img, &ChannelSelection::All(true)).unwrap();
        assert_eq!(img.channel(0).unwrap().values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_enhance_order() {
        let mut img = Image::builder(Mode::L).rows(vec![vec![0.0, 0.5, 1.0]]).build().unwrap();
        let opts = EnhanceOptions {
            invert: true.into(),
            stretch: Stretch::Crude(crate::stretch::CrudeBounds::new(0.0, 2.0)),
            gamma: GammaSpec::Uniform(0.5),
        };
        enhance(&mut img, &opts).unwrap();
        // invert -> [1, .5, 0], crude /2 -> [.5, .25, 0], gamma -> squares
        assert_eq!(img.channel(0).unwrap().values(), &[0.25, 0.0625, 0.0]);
    }

    #[test]
    fn test_enhance_validates_first() {
        let mut img = la_image();
        let before = img.clone();
        let opts = EnhanceOptions {
            invert: true.into(),
            stretch: Stretch::from((2.0, 0.0)),
            gamma: GammaSpec::default(),
        };
        assert!(enhance(&mut img, &opts).is_err());
        let opts = EnhanceOptions {
            invert: true.into(),
            gamma: GammaSpec::Uniform(-2.0),
            ..Default::default()
        };
        assert!(enhance(&mut img, &opts).is_err());
        assert_eq!(img, before);
    }
}
