//! # maskimg-ops
//!
//! Contrast enhancement and mask-aware compositing for masked raster images.
//!
//! Every operation mutates an [`Image`](maskimg_core::Image) in place and
//! keeps its mode and shape (except [`geometry::resize`] and the mode
//! promotion done by [`composite::putalpha`]). Masks are never altered by
//! enhancement; compositing states its mask rule per operation.
//!
//! # Modules
//!
//! - [`enhance`] - Invert, gamma, clip and the invert/stretch/gamma pipeline
//! - [`stretch`] - Linear, histogram, logarithmic and crude stretches
//! - [`composite`] - putalpha, merge, source-over blend
//! - [`geometry`] - Integer-factor resize and luminance replacement
//! - [`stats`] - Percentiles over valid data
//! - [`guard`] - Precondition checks shared by the operations
//!
//! # Example
//!
//! ```rust
//! use maskimg_core::{Image, Mode};
//! use maskimg_ops::{EnhanceOptions, GammaSpec, ImageOps, Stretch};
//!
//! let mut img = Image::builder(Mode::L)
//!     .masked_rows(vec![vec![Some(10.0), Some(30.0)], vec![Some(50.0), None]])
//!     .color_range((0.0, 100.0))
//!     .build()
//!     .unwrap();
//!
//! img.enhance(&EnhanceOptions {
//!     stretch: Stretch::Histogram,
//!     gamma: GammaSpec::Uniform(1.0),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let chn = img.channel(0).unwrap();
//! assert_eq!(chn.value(0, 0), 0.0);
//! assert!(chn.is_masked(1, 1));
//! ```
//!
//! # Degenerate data
//!
//! Stretching a fully masked or constant channel is not an error: the channel
//! is left as is and a `tracing` warning is emitted.
//!
//! # Feature Flags
//!
//! - `parallel` - Parallel channel maps in `maskimg-core` (enabled by default)
//! - `serde` - Serialization of [`EnhanceOptions`] and its parts

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod composite;
pub mod enhance;
pub mod geometry;
pub mod guard;
pub mod image_ops;
pub mod stats;
pub mod stretch;

pub use enhance::{ChannelSelection, EnhanceOptions, GammaSpec, InvertSpec};
pub use error::{OpsError, OpsResult};
pub use image_ops::ImageOps;
pub use stretch::{Bound, CrudeBounds, Stretch};
