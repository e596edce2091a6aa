//! The image aggregate.
//!
//! An [`Image`] exclusively owns an ordered, resizable collection of
//! [`Channel`]s together with the [`Mode`] that gives them meaning, an
//! optional [`Palette`] (indexed modes) and an optional per-channel fill
//! value used to render missing data on output.
//!
//! # Invariants
//!
//! - every channel has the same `(height, width)` shape;
//! - the channel count equals [`Mode::channel_count`];
//! - an empty image has no channels and shape `(0, 0)`, and no other
//!   combination of "no channels" and "zero shape" is allowed;
//! - a fill value, when present on a non-empty image, has one entry per
//!   channel.
//!
//! All layout changes go through [`Image::apply_layout`], which validates the
//! full invariant set before replacing anything, so a failing transition
//! leaves the image as it was.
//!
//! # Usage
//!
//! ```rust
//! use maskimg_core::{Channel, ColorRange, Image, Mode};
//!
//! let red = Channel::from_rows(&[vec![0.0, 255.0]]).unwrap();
//! let green = Channel::from_rows(&[vec![0.0, 0.0]]).unwrap();
//! let blue = Channel::from_rows(&[vec![255.0, 0.0]]).unwrap();
//!
//! let img = Image::builder(Mode::Rgb)
//!     .channels([red, green, blue])
//!     .color_range(ColorRange::Shared(0.0, 255.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(img.shape(), (1, 2));
//! assert_eq!(img.channel(0).unwrap().values(), &[0.0, 1.0]);
//! ```

use crate::{Channel, Error, Mode, Palette, Result};
use std::collections::BTreeMap;

/// Per-channel normalization range applied at construction.
///
/// Input values are mapped with `(v - min) / (max - min)` so that `min`
/// lands on `0.0` and `max` on `1.0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorRange {
    /// One `(min, max)` pair for every channel.
    Shared(f32, f32),
    /// One `(min, max)` pair per channel.
    PerChannel(Vec<(f32, f32)>),
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::Shared(0.0, 1.0)
    }
}

impl ColorRange {
    /// Checks the range against a channel count.
    pub fn validate(&self, channels: usize) -> Result<()> {
        let pairs: &[(f32, f32)] = match self {
            Self::Shared(lo, hi) => &[(*lo, *hi)],
            Self::PerChannel(pairs) => {
                if pairs.len() != channels {
                    return Err(Error::invalid_color_range(format!(
                        "{} ranges given for {} channels",
                        pairs.len(),
                        channels
                    )));
                }
                pairs
            }
        };
        for &(lo, hi) in pairs {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(Error::invalid_color_range(format!("non-finite bounds ({lo}, {hi})")));
            }
            if lo == hi {
                return Err(Error::invalid_color_range(format!("empty range ({lo}, {hi})")));
            }
        }
        Ok(())
    }

    /// `(min, max)` for channel `index`.
    pub fn bounds(&self, index: usize) -> (f32, f32) {
        match self {
            Self::Shared(lo, hi) => (*lo, *hi),
            Self::PerChannel(pairs) => pairs[index],
        }
    }
}

/// A complete channel layout: everything a mode transition replaces.
///
/// Produced by transition functions and committed with
/// [`Image::apply_layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Mode of the new layout.
    pub mode: Mode,
    /// Channels in semantic order for `mode`.
    pub channels: Vec<Channel>,
    /// Fill value, one entry per channel.
    pub fill_value: Option<Vec<f32>>,
    /// Palette (indexed modes).
    pub palette: Option<Palette>,
    /// Direct mode the palette was derived from.
    pub secondary_mode: Mode,
}

/// Masked-array based raster image.
///
/// See the [module documentation](self) for invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    channels: Vec<Channel>,
    mode: Mode,
    palette: Option<Palette>,
    fill_value: Option<Vec<f32>>,
    secondary_mode: Mode,
    shape: (usize, usize),
    info: BTreeMap<String, String>,
}

impl Default for Image {
    fn default() -> Self {
        Self::empty(Mode::L)
    }
}

impl Image {
    /// Creates an empty image shell in `mode`.
    pub fn empty(mode: Mode) -> Self {
        Self {
            channels: Vec::new(),
            mode,
            palette: None,
            fill_value: None,
            secondary_mode: Mode::Rgb,
            shape: (0, 0),
            info: BTreeMap::new(),
        }
    }

    /// Creates an image from already normalized channels.
    pub fn new(channels: Vec<Channel>, mode: Mode) -> Result<Self> {
        Self::builder(mode).channels(channels).build()
    }

    /// Starts building an image in `mode`.
    pub fn builder(mode: Mode) -> ImageBuilder {
        ImageBuilder::new(mode)
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Channels in semantic order.
    #[inline]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Mutable channels.
    ///
    /// Channel contents may change freely; replacing a channel with one of a
    /// different shape breaks the image invariant and is caught by
    /// [`check`](Self::check). Use [`set_channel`](Self::set_channel) to
    /// replace a channel with a shape check.
    #[inline]
    pub fn channels_mut(&mut self) -> &mut [Channel] {
        &mut self.channels
    }

    /// Channel at `index`.
    #[inline]
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Mutable channel at `index`.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> Option<&mut Channel> {
        self.channels.get_mut(index)
    }

    /// Replaces channel `index`, checking its shape.
    pub fn set_channel(&mut self, index: usize, channel: Channel) -> Result<()> {
        if channel.shape() != self.shape {
            return Err(Error::shape_mismatch(self.shape, channel.shape()));
        }
        let count = self.channels.len();
        let slot = self.channels.get_mut(index).ok_or_else(|| {
            Error::invalid_parameter(format!("channel index {index} out of range for {count} channels"))
        })?;
        *slot = channel;
        Ok(())
    }

    /// Shape as `(height, width)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape.0
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape.1
    }

    /// Palette of an indexed image.
    #[inline]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Fill value, one entry per channel.
    #[inline]
    pub fn fill_value(&self) -> Option<&[f32]> {
        self.fill_value.as_deref()
    }

    /// Sets or clears the fill value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the entry count differs from
    /// the mode's channel count.
    pub fn set_fill_value(&mut self, fill_value: Option<Vec<f32>>) -> Result<()> {
        if let Some(fill) = &fill_value {
            check_fill(self.mode, fill)?;
        }
        self.fill_value = fill_value;
        Ok(())
    }

    /// Direct mode a palette was (or will be) derived from.
    #[inline]
    pub fn secondary_mode(&self) -> Mode {
        self.secondary_mode
    }

    /// Free-form text metadata forwarded to codecs that support tags.
    #[inline]
    pub fn info(&self) -> &BTreeMap<String, String> {
        &self.info
    }

    /// Mutable text metadata.
    #[inline]
    pub fn info_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.info
    }

    /// Returns `true` for the empty image (no channels, shape `(0, 0)`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Verifies every data-model invariant.
    ///
    /// # Errors
    ///
    /// [`Error::Inconsistent`] if channels and shape disagree on emptiness,
    /// [`Error::ShapeMismatch`] or [`Error::ChannelCount`] otherwise.
    pub fn check(&self) -> Result<()> {
        check_layout(self.mode, &self.channels, self.fill_value.as_deref())?;
        let shape = self.channels.first().map_or((0, 0), Channel::shape);
        if shape != self.shape {
            return Err(Error::Inconsistent(format!(
                "recorded shape {:?} differs from channel shape {:?}",
                self.shape, shape
            )));
        }
        Ok(())
    }

    /// Snapshot of the current layout.
    pub fn layout(&self) -> Layout {
        Layout {
            mode: self.mode,
            channels: self.channels.clone(),
            fill_value: self.fill_value.clone(),
            palette: self.palette.clone(),
            secondary_mode: self.secondary_mode,
        }
    }

    /// Validates `layout` and replaces the current one with it.
    ///
    /// Nothing is modified if validation fails.
    pub fn apply_layout(&mut self, layout: Layout) -> Result<()> {
        check_layout(layout.mode, &layout.channels, layout.fill_value.as_deref())?;
        if layout.channels.is_empty() {
            return Err(Error::Inconsistent(
                "a layout must carry channels; use set_empty_mode for empty images".into(),
            ));
        }
        check_secondary(layout.secondary_mode)?;
        self.shape = layout.channels[0].shape();
        self.mode = layout.mode;
        self.channels = layout.channels;
        self.fill_value = layout.fill_value;
        self.palette = layout.palette;
        self.secondary_mode = layout.secondary_mode;
        Ok(())
    }

    /// Retags an empty image with a new mode; channel data is untouched.
    pub fn set_empty_mode(&mut self, mode: Mode) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::Inconsistent(format!(
                "cannot retag a non-empty {} image",
                self.mode
            )));
        }
        self.mode = mode;
        Ok(())
    }
}

/// Builder for [`Image`].
///
/// ```rust
/// use maskimg_core::{Image, Mode};
///
/// let img = Image::builder(Mode::L)
///     .rows(vec![vec![0.0, 50.0], vec![100.0, 25.0]])
///     .color_range((0.0, 100.0))
///     .fill_value([0.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(img.channel(0).unwrap().value(1, 0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    mode: Mode,
    sources: Vec<Source>,
    color_range: Option<ColorRange>,
    fill_value: Option<Vec<f32>>,
    palette: Option<Palette>,
    secondary_mode: Mode,
    info: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
enum Source {
    Channel(Channel),
    Rows(Vec<Vec<f32>>),
    MaskedRows(Vec<Vec<Option<f32>>>),
}

impl Source {
    fn into_channel(self) -> Result<Channel> {
        match self {
            Source::Channel(chn) => Ok(chn),
            Source::Rows(rows) => Channel::from_rows(&rows),
            Source::MaskedRows(rows) => Channel::from_masked_rows(&rows),
        }
    }
}

impl From<(f32, f32)> for ColorRange {
    fn from((lo, hi): (f32, f32)) -> Self {
        Self::Shared(lo, hi)
    }
}

impl From<Vec<(f32, f32)>> for ColorRange {
    fn from(pairs: Vec<(f32, f32)>) -> Self {
        Self::PerChannel(pairs)
    }
}

impl ImageBuilder {
    /// Creates a builder for `mode` with no channels.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            sources: Vec::new(),
            color_range: None,
            fill_value: None,
            palette: None,
            secondary_mode: Mode::Rgb,
            info: BTreeMap::new(),
        }
    }

    /// Adds one channel.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.sources.push(Source::Channel(channel));
        self
    }

    /// Adds several channels in order.
    pub fn channels(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.sources.extend(channels.into_iter().map(Source::Channel));
        self
    }

    /// Adds a borrowed channel; the data is copied.
    pub fn channel_ref(self, channel: &Channel) -> Self {
        self.channel(channel.clone())
    }

    /// Adds a fully valid channel given as rows.
    pub fn rows(mut self, rows: Vec<Vec<f32>>) -> Self {
        self.sources.push(Source::Rows(rows));
        self
    }

    /// Adds a channel given as rows where `None` marks missing data.
    pub fn masked_rows(mut self, rows: Vec<Vec<Option<f32>>>) -> Self {
        self.sources.push(Source::MaskedRows(rows));
        self
    }

    /// Normalizes input values from `range` to `[0, 1]`.
    pub fn color_range(mut self, range: impl Into<ColorRange>) -> Self {
        self.color_range = Some(range.into());
        self
    }

    /// Sets the fill value (one entry per channel).
    pub fn fill_value(mut self, fill: impl Into<Vec<f32>>) -> Self {
        self.fill_value = Some(fill.into());
        self
    }

    /// Sets one fill value shared by every channel of the mode.
    pub fn fill_scalar(mut self, fill: f32) -> Self {
        self.fill_value = Some(vec![fill; self.mode.channel_count()]);
        self
    }

    /// Sets the palette of an indexed image.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Sets the direct mode the palette entries are expressed in.
    pub fn secondary_mode(mut self, mode: Mode) -> Self {
        self.secondary_mode = mode;
        self
    }

    /// Adds a metadata entry.
    pub fn info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// Validates input and builds the image.
    ///
    /// With no channels the result is an empty image in the builder's mode.
    pub fn build(self) -> Result<Image> {
        let count = self.sources.len();
        if count != 0 && count != self.mode.channel_count() {
            return Err(Error::channel_count(self.mode, count));
        }
        if let Some(range) = &self.color_range {
            if count == 0 {
                return Err(Error::invalid_color_range("color range given without channels"));
            }
            range.validate(count)?;
        }
        if let Some(fill) = &self.fill_value {
            check_fill(self.mode, fill)?;
        }
        check_secondary(self.secondary_mode)?;
        if let Some(palette) = &self.palette {
            if !palette.is_empty() && palette.width() != self.secondary_mode.channel_count() {
                return Err(Error::invalid_parameter(format!(
                    "palette entries have {} components, {} needs {}",
                    palette.width(),
                    self.secondary_mode,
                    self.secondary_mode.channel_count()
                )));
            }
        }

        let mut channels = Vec::with_capacity(count);
        for (i, source) in self.sources.into_iter().enumerate() {
            let mut chn = source.into_channel()?;
            if let Some(range) = &self.color_range {
                let (lo, hi) = range.bounds(i);
                if (lo, hi) != (0.0, 1.0) {
                    let scale = 1.0 / (hi - lo);
                    chn.map_values(|v| (v - lo) * scale);
                }
            }
            if let Some(first) = channels.first().map(Channel::shape) {
                if chn.shape() != first {
                    return Err(Error::shape_mismatch(first, chn.shape()));
                }
            }
            channels.push(chn);
        }

        let shape = channels.first().map_or((0, 0), Channel::shape);
        if !channels.is_empty() && (shape.0 == 0 || shape.1 == 0) {
            return Err(Error::Inconsistent(format!(
                "channels given with degenerate shape {}x{}",
                shape.0, shape.1
            )));
        }

        Ok(Image {
            channels,
            mode: self.mode,
            palette: self.palette,
            fill_value: self.fill_value,
            secondary_mode: self.secondary_mode,
            shape,
            info: self.info,
        })
    }
}

fn check_fill(mode: Mode, fill: &[f32]) -> Result<()> {
    if fill.len() != mode.channel_count() {
        return Err(Error::invalid_parameter(format!(
            "fill value has {} entries, mode {} has {} channels",
            fill.len(),
            mode,
            mode.channel_count()
        )));
    }
    Ok(())
}

fn check_secondary(mode: Mode) -> Result<()> {
    if mode.has_alpha() || mode.is_indexed() {
        return Err(Error::wrong_mode("a direct non-alpha secondary mode", mode));
    }
    Ok(())
}

fn check_layout(mode: Mode, channels: &[Channel], fill: Option<&[f32]>) -> Result<()> {
    if channels.is_empty() {
        return Ok(());
    }
    if channels.len() != mode.channel_count() {
        return Err(Error::channel_count(mode, channels.len()));
    }
    let shape = channels[0].shape();
    if shape.0 == 0 || shape.1 == 0 {
        return Err(Error::Inconsistent(format!(
            "channels present with degenerate shape {}x{}",
            shape.0, shape.1
        )));
    }
    if let Some(bad) = channels.iter().find(|c| c.shape() != shape) {
        return Err(Error::shape_mismatch(shape, bad.shape()));
    }
    if let Some(fill) = fill {
        check_fill(mode, fill)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_channels() -> Vec<Channel> {
        vec![
            Channel::from_rows(&[vec![1.0, 0.0]]).unwrap(),
            Channel::from_rows(&[vec![0.0, 1.0]]).unwrap(),
            Channel::from_rows(&[vec![0.0, 0.0]]).unwrap(),
        ]
    }

    #[test]
    fn test_empty_image() {
        let img = Image::empty(Mode::Rgb);
        assert!(img.is_empty());
        assert_eq!(img.shape(), (0, 0));
        assert!(img.check().is_ok());
        let built = Image::builder(Mode::L).build().unwrap();
        assert!(built.is_empty());
    }

    #[test]
    fn test_channel_count_mismatch() {
        let err = Image::new(rgb_channels(), Mode::L).unwrap_err();
        assert_eq!(err, Error::channel_count(Mode::L, 3));
    }

    #[test]
    fn test_shape_mismatch() {
        let mut chans = rgb_channels();
        chans[2] = Channel::zeros(2, 2);
        let err = Image::new(chans, Mode::Rgb).unwrap_err();
        assert_eq!(err, Error::shape_mismatch((1, 2), (2, 2)));
    }

    #[test]
    fn test_zero_shape_channels_are_inconsistent() {
        let err = Image::new(vec![Channel::zeros(0, 0)], Mode::L).unwrap_err();
        assert!(matches!(err, Error::Inconsistent(_)));
    }

    #[test]
    fn test_color_range_normalizes() {
        let img = Image::builder(Mode::LA)
            .rows(vec![vec![10.0, 20.0]])
            .rows(vec![vec![0.0, 2.0]])
            .color_range(vec![(10.0, 20.0), (0.0, 2.0)])
            .build()
            .unwrap();
        assert_eq!(img.channel(0).unwrap().values(), &[0.0, 1.0]);
        assert_eq!(img.channel(1).unwrap().values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_invalid_color_ranges() {
        let too_few = Image::builder(Mode::Rgb)
            .channels(rgb_channels())
            .color_range(vec![(0.0, 1.0)])
            .build();
        assert!(matches!(too_few, Err(Error::InvalidColorRange(_))));

        let flat = Image::builder(Mode::L).rows(vec![vec![1.0]]).color_range((3.0, 3.0)).build();
        assert!(matches!(flat, Err(Error::InvalidColorRange(_))));
    }

    #[test]
    fn test_fill_value_length_checked() {
        let err = Image::builder(Mode::Rgb).channels(rgb_channels()).fill_value([0.0]).build();
        assert!(err.is_err());
        let ok = Image::builder(Mode::Rgb)
            .channels(rgb_channels())
            .fill_value([0.0, 0.0, 0.0])
            .build()
            .unwrap();
        assert_eq!(ok.fill_value(), Some(&[0.0, 0.0, 0.0][..]));

        let scalar = Image::builder(Mode::Rgba)
            .channels(rgb_channels())
            .channel(Channel::ones(1, 2))
            .fill_scalar(0.5)
            .build()
            .unwrap();
        assert_eq!(scalar.fill_value(), Some(&[0.5; 4][..]));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let flat_rows = Channel::from_rows(&[Vec::<f32>::new(), Vec::new()]).unwrap();
        assert_eq!(flat_rows.shape(), (2, 0));
        let err = Image::new(vec![flat_rows.clone()], Mode::L).unwrap_err();
        assert!(matches!(err, Error::Inconsistent(_)));

        let mut img = Image::new(vec![Channel::zeros(1, 1)], Mode::L).unwrap();
        let mut layout = img.layout();
        layout.channels = vec![flat_rows];
        assert!(matches!(img.apply_layout(layout), Err(Error::Inconsistent(_))));
        assert_eq!(img.shape(), (1, 1));
    }

    #[test]
    fn test_builder_copies_borrowed_channel() {
        let source = Channel::from_rows(&[vec![0.25]]).unwrap();
        let mut img = Image::builder(Mode::L).channel_ref(&source).build().unwrap();
        img.channel_mut(0).unwrap().values_mut()[0] = 0.75;
        assert_eq!(source.values(), &[0.25]);
    }

    #[test]
    fn test_apply_layout_is_atomic() {
        let mut img = Image::new(rgb_channels(), Mode::Rgb).unwrap();
        let before = img.clone();
        let mut bad = img.layout();
        bad.mode = Mode::Rgba;
        assert!(img.apply_layout(bad).is_err());
        assert_eq!(img, before);

        let mut good = img.layout();
        good.channels.push(Channel::ones(1, 2));
        good.mode = Mode::Rgba;
        img.apply_layout(good).unwrap();
        assert_eq!(img.mode(), Mode::Rgba);
        assert_eq!(img.channels().len(), 4);
    }

    #[test]
    fn test_check_detects_reshaped_channel() {
        let mut img = Image::new(rgb_channels(), Mode::Rgb).unwrap();
        *img.channel_mut(1).unwrap() = Channel::zeros(3, 3);
        assert!(img.check().is_err());
    }

    #[test]
    fn test_set_empty_mode() {
        let mut img = Image::empty(Mode::L);
        img.set_empty_mode(Mode::Rgba).unwrap();
        assert_eq!(img.mode(), Mode::Rgba);

        let mut full = Image::new(rgb_channels(), Mode::Rgb).unwrap();
        assert!(full.set_empty_mode(Mode::L).is_err());
    }
}
