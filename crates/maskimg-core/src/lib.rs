//! # maskimg-core
//!
//! Core types for masked raster images.
//!
//! This crate provides the data model shared by every maskimg crate:
//!
//! - [`Channel`] - A 2-D value grid paired with a validity mask
//! - [`Mode`] - The registry of color modes (`L`, `RGB`, `YCbCr`, `P`, and alpha variants)
//! - [`Palette`] - Ordered color tuples for indexed images
//! - [`Image`] - The aggregate owning channels, mode, palette and fill value
//! - [`interp`] - Piecewise-linear interpolation shared by palette expansion and equalization
//!
//! ## Design Philosophy
//!
//! Missing data is tracked **explicitly**, never through sentinel values. Each
//! channel element has a mask flag, and every operation states how it
//! propagates those flags. The image guarantees that its channel count always
//! matches its mode and that all channels share one shape.
//!
//! ```rust
//! use maskimg_core::{Channel, Image, Mode};
//!
//! let luma = Channel::from_masked_rows(&[vec![Some(0.0), Some(0.5)], vec![Some(1.0), None]]).unwrap();
//! let img = Image::new(vec![luma], Mode::L).unwrap();
//! assert_eq!(img.shape(), (2, 2));
//! assert!(img.channel(0).unwrap().is_masked(1, 1));
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! maskimg-core (this crate)
//!    ^
//!    +-- maskimg-color (mode conversion)
//!    +-- maskimg-ops (enhancement, compositing)
//!    +-- maskimg-io (8-bit finalization, codec hand-off)
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Parallel elementwise channel maps via rayon (enabled by default)
//! - `serde` - Serialization for [`Mode`] and [`ColorRange`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod error;
pub mod image;
pub mod interp;
pub mod mode;
pub mod palette;

pub use channel::{mask_all, mask_any, Channel};
pub use error::{Error, Result};
pub use image::{ColorRange, Image, ImageBuilder, Layout};
pub use mode::Mode;
pub use palette::Palette;

/// Prelude module for convenient imports.
///
/// ```
/// use maskimg_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::channel::{mask_all, mask_any, Channel};
    pub use crate::error::{Error, Result};
    pub use crate::image::{ColorRange, Image, ImageBuilder, Layout};
    pub use crate::mode::Mode;
    pub use crate::palette::Palette;
}
