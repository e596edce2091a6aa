//! Contrast stretching.
//!
//! Each stretch works on one [`Channel`] at a time and only moves values,
//! never the mask. Degenerate input (fully masked or constant channels) is
//! not an error: the channel is left unchanged and a warning is logged, so
//! unattended batch runs keep going.
//!
//! Image-level dispatch goes through [`stretch`] with a [`Stretch`] value,
//! which applies the chosen method to every non-alpha channel in order.
//!
//! # Methods
//!
//! | Method | Mapping |
//! |--------|---------|
//! | [`Stretch::Linear`] | `(v - left) / (right - left)`, bounds from cutoff percentiles |
//! | [`Stretch::Histogram`] | through the empirical CDF (2048 equal-count bins) |
//! | [`Stretch::Logarithmic`] | range to `[1, factor]`, then `ln(v) / ln(factor)` |
//! | [`Stretch::Crude`] | `(v - min) / (max - min)`, optional explicit bounds |
//! | [`Stretch::No`] | nothing |
//!
//! # Example
//!
//! ```rust
//! use maskimg_core::{Image, Mode};
//! use maskimg_ops::stretch::{stretch, Stretch};
//!
//! let mut img = Image::builder(Mode::L)
//!     .rows(vec![vec![0.2, 0.4], vec![0.6, 0.7]])
//!     .build()
//!     .unwrap();
//!
//! stretch(&mut img, &"crude".parse::<Stretch>().unwrap()).unwrap();
//! let chn = img.channel(0).unwrap();
//! assert_eq!(chn.value(0, 0), 0.0);
//! assert_eq!(chn.value(1, 1), 1.0);
//! ```

use std::str::FromStr;

use crate::guard::color_channel_count;
use crate::stats::{percentile, sorted_valid};
use crate::{OpsError, OpsResult};
use maskimg_core::interp::interp;
use maskimg_core::{Channel, Image};
use tracing::{debug, info, warn};

/// Default linear stretch cutoffs (fraction trimmed on each side).
pub const DEFAULT_CUTOFFS: (f32, f32) = (0.005, 0.005);

/// Default logarithmic stretch factor.
pub const DEFAULT_LOG_FACTOR: f32 = 100.0;

/// Number of equal-count bins used by histogram equalization.
pub const HISTOGRAM_BINS: usize = 2048;

/// One explicit crude-stretch bound: shared or one per channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum Bound {
    /// Same bound for every channel.
    Uniform(f32),
    /// One bound per channel, by channel index.
    PerChannel(Vec<f32>),
}

impl Bound {
    fn for_channel(&self, index: usize) -> Option<f32> {
        match self {
            Self::Uniform(v) => Some(*v),
            Self::PerChannel(values) => values.get(index).copied(),
        }
    }
}

impl From<f32> for Bound {
    fn from(v: f32) -> Self {
        Self::Uniform(v)
    }
}

impl From<Vec<f32>> for Bound {
    fn from(values: Vec<f32>) -> Self {
        Self::PerChannel(values)
    }
}

/// Optional explicit bounds for [`Stretch::Crude`].
///
/// A missing bound falls back to the channel's valid minimum or maximum.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct CrudeBounds {
    /// Value mapped to `0.0`.
    pub min: Option<Bound>,
    /// Value mapped to `1.0`.
    pub max: Option<Bound>,
}

impl CrudeBounds {
    /// Bounds given explicitly on both ends.
    pub fn new(min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }
}

/// Stretch method applied by [`stretch`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum Stretch {
    /// Leave the image unchanged.
    #[default]
    No,
    /// Linear stretch between the cutoff percentiles.
    Linear {
        /// Fractions of valid data trimmed on the low and high side.
        cutoffs: (f32, f32),
    },
    /// Histogram equalization.
    Histogram,
    /// Min-max normalization.
    Crude(CrudeBounds),
    /// Logarithmic enhancement towards white.
    Logarithmic {
        /// Upper end of the range the data is moved into; must exceed 1.
        factor: f32,
    },
}

impl Stretch {
    /// Linear stretch with [`DEFAULT_CUTOFFS`].
    pub fn linear() -> Self {
        Self::Linear { cutoffs: DEFAULT_CUTOFFS }
    }

    /// Logarithmic stretch with [`DEFAULT_LOG_FACTOR`].
    pub fn logarithmic() -> Self {
        Self::Logarithmic { factor: DEFAULT_LOG_FACTOR }
    }

    /// Checks parameters against an image with `color_channels` non-alpha
    /// channels out of `channels` total.
    pub fn validate(&self, color_channels: usize, channels: usize) -> OpsResult<()> {
        match self {
            Self::Linear { cutoffs: (low, high) } => {
                for c in [low, high] {
                    if !(0.0..=1.0).contains(c) {
                        return Err(OpsError::invalid_parameter(format!(
                            "stretch cutoff {c} outside [0, 1]"
                        )));
                    }
                }
            }
            Self::Logarithmic { factor } => {
                if !(factor.is_finite() && *factor > 1.0) {
                    return Err(OpsError::invalid_parameter(format!(
                        "logarithmic factor must be finite and greater than 1, got {factor}"
                    )));
                }
            }
            Self::Crude(bounds) => {
                for bound in [&bounds.min, &bounds.max].into_iter().flatten() {
                    if let Bound::PerChannel(values) = bound {
                        if values.len() != color_channels && values.len() != channels {
                            return Err(OpsError::invalid_parameter(format!(
                                "{} crude bounds given for {color_channels} color channels",
                                values.len()
                            )));
                        }
                    }
                }
            }
            Self::No | Self::Histogram => {}
        }
        Ok(())
    }
}

impl From<(f32, f32)> for Stretch {
    fn from(cutoffs: (f32, f32)) -> Self {
        Self::Linear { cutoffs }
    }
}

impl FromStr for Stretch {
    type Err = OpsError;

    /// Parses a method name with default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(Self::No),
            "linear" => Ok(Self::linear()),
            "histogram" => Ok(Self::Histogram),
            "crude" | "crude-stretch" => Ok(Self::Crude(CrudeBounds::default())),
            "log" | "logarithmic" => Ok(Self::logarithmic()),
            other => Err(OpsError::invalid_parameter(format!(
                "stretching method {other} not recognized"
            ))),
        }
    }
}

/// Applies `method` to every non-alpha channel of `image`.
///
/// Parameters are validated before any channel changes.
pub fn stretch(image: &mut Image, method: &Stretch) -> OpsResult<()> {
    debug!(?method, "Applying stretch");
    let n = color_channel_count(image);
    method.validate(n, image.channels().len())?;

    for (i, chn) in image.channels_mut().iter_mut().take(n).enumerate() {
        match method {
            Stretch::No => return Ok(()),
            Stretch::Linear { cutoffs } => {
                stretch_linear(chn, *cutoffs);
            }
            Stretch::Histogram => {
                stretch_hist_equalize(chn);
            }
            Stretch::Crude(bounds) => {
                let min = bounds.min.as_ref().and_then(|b| b.for_channel(i));
                let max = bounds.max.as_ref().and_then(|b| b.for_channel(i));
                crude_stretch(chn, min, max);
            }
            Stretch::Logarithmic { factor } => {
                stretch_logarithmic(chn, *factor);
            }
        }
    }
    Ok(())
}

/// Linear contrast stretch between the `cutoffs` percentiles of valid data.
///
/// `cutoffs.0` is trimmed from the low end and `cutoffs.1` from the high
/// end. Returns `false` if the channel was left unchanged.
pub fn stretch_linear(channel: &mut Channel, cutoffs: (f32, f32)) -> bool {
    debug!("Perform a linear contrast stretch");
    if !has_spread(channel) {
        return false;
    }
    let sorted = sorted_valid(channel);
    let (lq, rq) = (cutoffs.0 * 100.0, 100.0 - cutoffs.1 * 100.0);
    debug!(left = lq, right = rq, "Left and right percentiles");
    let (Some(left), Some(right)) = (percentile(&sorted, lq), percentile(&sorted, rq)) else {
        return false;
    };

    let delta = right - left;
    debug!(left, right, width = delta, "Stretch interval");
    if delta > 0.0 {
        channel.map_valid(|v| (v - left) / delta);
        true
    } else {
        warn!("Unable to make a contrast stretch!");
        false
    }
}

/// Histogram equalization of valid data.
///
/// Bin edges are the percentiles `k / 2048` of the valid values; each value
/// is mapped by interpolating edges against those fractions, so results
/// lie in `[0, 1)`.
pub fn stretch_hist_equalize(channel: &mut Channel) -> bool {
    info!("Perform a histogram equalized contrast stretch");
    if !has_spread(channel) {
        return false;
    }
    let sorted = sorted_valid(channel);
    let cdf: Vec<f32> = (0..HISTOGRAM_BINS)
        .map(|k| k as f32 / HISTOGRAM_BINS as f32)
        .collect();
    let Some(edges) = cdf
        .iter()
        .map(|&c| percentile(&sorted, c * 100.0))
        .collect::<Option<Vec<f32>>>()
    else {
        return false;
    };
    channel.map_valid(|v| interp(v, &edges, &cdf));
    true
}

/// Logarithmic enhancement: valid range moved to `[1, factor]`, then
/// `ln(v) / ln(factor)`.
///
/// `factor` must exceed 1; [`stretch`] validates this before calling.
pub fn stretch_logarithmic(channel: &mut Channel, factor: f32) -> bool {
    debug!(factor, "Perform a logarithmic contrast stretch");
    let Some((lo, hi)) = spread(channel) else {
        return false;
    };
    let b = 1.0 / factor.ln();
    let slope = (factor - 1.0) / (hi - lo);
    channel.map_valid(|v| b * (1.0 + (v - lo) * slope).ln());
    true
}

/// Min-max normalization without cutoff.
///
/// `min`/`max` default to the valid minimum and maximum. Masked entries are
/// rescaled too; the mask is kept.
pub fn crude_stretch(channel: &mut Channel, min: Option<f32>, max: Option<f32>) -> bool {
    let Some((vmin, vmax)) = channel.valid_range() else {
        warn!("Nothing to stretch !");
        return false;
    };
    let lo = min.unwrap_or(vmin);
    let hi = max.unwrap_or(vmax);
    if (hi - lo).abs() > 0.0 {
        debug!(min = lo, max = hi, "Crude stretch");
        let delta = hi - lo;
        channel.map_values(|v| (v - lo) / delta);
        true
    } else {
        warn!("Nothing to stretch !");
        false
    }
}

/// Valid `(min, max)` when the channel has spread; warns otherwise.
fn spread(channel: &Channel) -> Option<(f32, f32)> {
    match channel.valid_range() {
        Some((lo, hi)) if lo != hi => Some((lo, hi)),
        _ => {
            warn!("Nothing to stretch !");
            None
        }
    }
}

fn has_spread(channel: &Channel) -> bool {
    spread(channel).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use maskimg_core::Mode;

    fn ramp() -> Channel {
        let values: Vec<f32> = (0..=100).map(|v| v as f32 / 100.0).collect();
        Channel::from_values(1, 101, values).unwrap()
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("no".parse::<Stretch>().unwrap(), Stretch::No);
        assert_eq!("linear".parse::<Stretch>().unwrap(), Stretch::Linear { cutoffs: (0.005, 0.005) });
        assert_eq!("crude-stretch".parse::<Stretch>().unwrap(), Stretch::Crude(CrudeBounds::default()));
        assert_eq!("log".parse::<Stretch>().unwrap(), Stretch::Logarithmic { factor: 100.0 });
        assert_eq!("logarithmic".parse::<Stretch>().unwrap(), Stretch::logarithmic());
        assert_eq!("histogram".parse::<Stretch>().unwrap(), Stretch::Histogram);
        let err = "cubic".parse::<Stretch>().unwrap_err();
        assert!(err.is_usage_error());
        assert_eq!(Stretch::from((0.1, 0.2)), Stretch::Linear { cutoffs: (0.1, 0.2) });
    }

    #[test]
    fn test_validate() {
        assert!(Stretch::from((0.0, 1.0)).validate(3, 3).is_ok());
        assert!(Stretch::from((-0.1, 0.0)).validate(3, 3).is_err());
        assert!(Stretch::Logarithmic { factor: 1.0 }.validate(1, 1).is_err());
        let bounds = CrudeBounds::new(vec![0.0, 0.0], 1.0);
        assert!(Stretch::Crude(bounds.clone()).validate(2, 3).is_ok());
        assert!(Stretch::Crude(bounds).validate(3, 3).is_err());
    }

    #[test]
    fn test_linear_stretch_cutoffs() {
        let mut chn = ramp();
        assert!(stretch_linear(&mut chn, (0.1, 0.1)));
        // 10th percentile maps to 0, 90th to 1
        assert_relative_eq!(chn.values()[10], 0.0, epsilon = 1e-5);
        assert_relative_eq!(chn.values()[90], 1.0, epsilon = 1e-5);
        assert_relative_eq!(chn.values()[50], 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_linear_stretch_keeps_mask() {
        let mut chn = Channel::from_masked_rows(&[vec![Some(0.2), None, Some(0.4), Some(0.6)]]).unwrap();
        assert!(stretch_linear(&mut chn, (0.0, 0.0)));
        assert_eq!(chn.mask(), &[false, true, false, false]);
        assert_relative_eq!(chn.values()[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(chn.values()[3], 1.0, epsilon = 1e-6);
        // Masked entry untouched
        assert_eq!(chn.values()[1], 0.0);
    }

    #[test]
    fn test_degenerate_channels_unchanged() {
        let mut flat = Channel::filled(2, 2, 0.3);
        let before = flat.clone();
        assert!(!stretch_linear(&mut flat, DEFAULT_CUTOFFS));
        assert!(!stretch_logarithmic(&mut flat, 100.0));
        assert!(!stretch_hist_equalize(&mut flat));
        assert!(!crude_stretch(&mut flat, None, None));
        assert_eq!(flat, before);

        let mut hidden = Channel::new(1, 2, vec![0.1, 0.9], vec![true, true]).unwrap();
        let before = hidden.clone();
        assert!(!stretch_hist_equalize(&mut hidden));
        assert!(!crude_stretch(&mut hidden, None, None));
        assert_eq!(hidden, before);
    }

    #[test]
    fn test_hist_equalize_is_monotonic() {
        let values: Vec<f32> = (0..500).map(|i| ((i * 37) % 500) as f32 / 500.0).collect();
        let mut chn = Channel::from_values(20, 25, values.clone()).unwrap();
        assert!(stretch_hist_equalize(&mut chn));
        let mut pairs: Vec<(f32, f32)> = values.into_iter().zip(chn.values().iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for w in pairs.windows(2) {
            assert!(w[0].1 <= w[1].1);
        }
        assert!(chn.values().iter().all(|v| (0.0..1.0).contains(v)));
        assert_eq!(pairs[0].1, 0.0);
    }

    #[test]
    fn test_logarithmic_range() {
        let mut chn = ramp();
        assert!(stretch_logarithmic(&mut chn, 100.0));
        assert_relative_eq!(chn.values()[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(chn.values()[100], 1.0, epsilon = 1e-5);
        // Concave: midpoint lifted above linear
        assert!(chn.values()[50] > 0.5);
    }

    #[test]
    fn test_crude_stretch_overrides() {
        let mut chn = Channel::from_rows(&[vec![0.0, 5.0, 10.0]]).unwrap();
        assert!(crude_stretch(&mut chn, Some(0.0), Some(20.0)));
        assert_eq!(chn.values(), &[0.0, 0.25, 0.5]);
    }

    #[test]
    fn test_crude_stretch_scenario() {
        let mut img = Image::builder(Mode::L)
            .masked_rows(vec![vec![Some(0.0), Some(0.5)], vec![Some(1.0), None]])
            .build()
            .unwrap();
        let before = img.clone();
        stretch(&mut img, &Stretch::Crude(CrudeBounds::default())).unwrap();
        assert_eq!(img, before);
        assert!(img.channel(0).unwrap().is_masked(1, 1));
    }

    #[test]
    fn test_stretch_skips_alpha() {
        let mut img = Image::builder(Mode::LA)
            .rows(vec![vec![0.2, 0.4]])
            .rows(vec![vec![0.3, 0.6]])
            .build()
            .unwrap();
        stretch(&mut img, &"crude".parse().unwrap()).unwrap();
        assert_eq!(img.channel(0).unwrap().values(), &[0.0, 1.0]);
        assert_eq!(img.channel(1).unwrap().values(), &[0.3, 0.6]);
    }

    #[test]
    fn test_stretch_no_is_identity() {
        let mut img = Image::builder(Mode::L).rows(vec![vec![0.123, 0.987]]).build().unwrap();
        let before = img.clone();
        stretch(&mut img, &Stretch::No).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_per_channel_crude_bounds() {
        let mut img = Image::builder(Mode::Rgb)
            .rows(vec![vec![0.0, 2.0]])
            .rows(vec![vec![0.0, 4.0]])
            .rows(vec![vec![1.0, 3.0]])
            .build()
            .unwrap();
        let bounds = CrudeBounds {
            min: Some(Bound::PerChannel(vec![0.0, 0.0, 1.0])),
            max: Some(Bound::Uniform(4.0)),
        };
        stretch(&mut img, &Stretch::Crude(bounds)).unwrap();
        assert_eq!(img.channel(0).unwrap().values(), &[0.0, 0.5]);
        assert_eq!(img.channel(1).unwrap().values(), &[0.0, 1.0]);
        assert_relative_eq!(img.channel(2).unwrap().values()[1], 2.0 / 3.0, epsilon = 1e-6);
    }
}
