//! # maskimg-color
//!
//! Color mode conversion for masked raster images.
//!
//! Converts an [`Image`](maskimg_core::Image) between the eight modes of the
//! registry while keeping channel masks and the fill value in lockstep:
//!
//! - **Luma/chroma** - BT.601 RGB ↔ YCbCr, RGB → L, L → RGB/YCbCr
//! - **Palette** - exact-match quantization to `P`/`PA` and interpolated expansion
//! - **Alpha** - adding an opaque alpha channel or dropping the trailing one
//!
//! # Architecture
//!
//! ```text
//!              convert (planner + Convert trait)
//!                  |
//!            transition (direct table)
//!                  |
//!        +---------+---------+
//!        |                   |
//!      ycbcr              palette
//!        |                   |
//!        +---------+---------+
//!                  |
//!            maskimg-core
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use maskimg_color::Convert;
//! use maskimg_core::{Image, Mode};
//!
//! let mut img = Image::builder(Mode::Rgb)
//!     .rows(vec![vec![1.0, 0.0]])
//!     .rows(vec![vec![0.0, 0.0]])
//!     .rows(vec![vec![0.0, 1.0]])
//!     .build()
//!     .unwrap();
//!
//! img.convert(Mode::P).unwrap();
//! assert_eq!(img.palette().unwrap().len(), 2);
//!
//! img.convert(Mode::YCbCr).unwrap();
//! let cr = img.channel(2).unwrap().value(0, 0);
//! assert!((cr - 0.5).abs() < 1e-6);
//! ```
//!
//! # Errors
//!
//! Conversions return [`maskimg_core::Error`]. Every mode error is raised
//! while planning, before channels are touched.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod convert;
pub mod palette;
pub mod transition;
pub mod ycbcr;

pub use convert::{convert, plan, Convert, Step};
pub use transition::Transition;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::convert::{convert, Convert};
    pub use crate::transition::Transition;
    pub use maskimg_core::prelude::*;
}
