//! Method-style access to the operations of this crate.
//!
//! ```rust
//! use maskimg_core::{Channel, Image, Mode};
//! use maskimg_ops::ImageOps;
//!
//! let mut img = Image::builder(Mode::L).rows(vec![vec![0.0, 0.5]]).build().unwrap();
//! img.invert_channels(&true.into()).unwrap();
//! img.putalpha(Channel::from_rows(&[vec![1.0, 1.0]]).unwrap()).unwrap();
//! img.resize(2, 4).unwrap();
//! assert_eq!(img.mode(), Mode::LA);
//! assert_eq!(img.shape(), (2, 4));
//! ```

use crate::composite;
use crate::enhance::{self, ChannelSelection, EnhanceOptions, GammaSpec, InvertSpec};
use crate::geometry;
use crate::stretch::{self, Stretch};
use crate::OpsResult;
use maskimg_core::{Channel, Image};

/// Enhancement, compositing and geometry operations on [`Image`].
///
/// Every method forwards to the free function of the same name.
pub trait ImageOps {
    /// See [`enhance::invert`].
    fn invert_channels(&mut self, spec: &InvertSpec) -> OpsResult<()>;
    /// See [`enhance::gamma`].
    fn gamma(&mut self, spec: &GammaSpec) -> OpsResult<()>;
    /// See [`stretch::stretch`].
    fn stretch(&mut self, method: &Stretch) -> OpsResult<()>;
    /// See [`enhance::enhance`].
    fn enhance(&mut self, options: &EnhanceOptions) -> OpsResult<()>;
    /// See [`enhance::clip`].
    fn clip(&mut self, channels: &ChannelSelection) -> OpsResult<()>;
    /// See [`composite::putalpha`].
    fn putalpha(&mut self, alpha: Channel) -> OpsResult<()>;
    /// See [`composite::merge`].
    fn merge(&mut self, other: &Image) -> OpsResult<()>;
    /// See [`composite::blend`].
    fn blend(&mut self, other: &Image) -> OpsResult<()>;
    /// See [`geometry::resize`].
    fn resize(&mut self, height: usize, width: usize) -> OpsResult<()>;
    /// See [`geometry::replace_luminance`].
    fn replace_luminance(&mut self, luminance: Channel) -> OpsResult<()>;
}

impl ImageOps for Image {
    fn invert_channels(&mut self, spec: &InvertSpec) -> OpsResult<()> {
        enhance::invert(self, spec)
    }

    fn gamma(&mut self, spec: &GammaSpec) -> OpsResult<()> {
        enhance::gamma(self, spec)
    }

    fn stretch(&mut self, method: &Stretch) -> OpsResult<()> {
        stretch::stretch(self, method)
    }

    fn enhance(&mut self, options: &EnhanceOptions) -> OpsResult<()> {
        enhance::enhance(self, options)
    }

    fn clip(&mut self, channels: &ChannelSelection) -> OpsResult<()> {
        enhance::clip(self, channels)
    }

    fn putalpha(&mut self, alpha: Channel) -> OpsResult<()> {
        composite::putalpha(self, alpha)
    }

    fn merge(&mut self, other: &Image) -> OpsResult<()> {
        composite::merge(self, other)
    }

    fn blend(&mut self, other: &Image) -> OpsResult<()> {
        composite::blend(self, other)
    }

    fn resize(&mut self, height: usize, width: usize) -> OpsResult<()> {
        geometry::resize(self, height, width)
    }

    fn replace_luminance(&mut self, luminance: Channel) -> OpsResult<()> {
        geometry::replace_luminance(self, luminance)
    }
}
