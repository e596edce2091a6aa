//! # maskimg-io
//!
//! 8-bit finalization and codec hand-off for masked raster images.
//!
//! Turns a floating-point [`Image`](maskimg_core::Image) into plain byte
//! planes a codec can write, deciding per mode how missing data is shown:
//! painted with the fill value, or made transparent through an alpha
//! channel.
//!
//! # Pipeline
//!
//! ```text
//! Image --finalize--> FinalizedImage --layout--> CodecImage --Codec--> bytes
//!        (clip, x255,   (u8 planes + masks)       (L/LA/RGB/RGBA)
//!         palette expansion)
//! ```
//!
//! # Example
//!
//! ```rust
//! use maskimg_core::{Image, Mode};
//! use maskimg_io::{encode_to_vec, Format, PngCodec};
//!
//! let img = Image::builder(Mode::L)
//!     .masked_rows(vec![vec![Some(0.0), None], vec![Some(0.5), Some(1.0)]])
//!     .build()
//!     .unwrap();
//!
//! let bytes = encode_to_vec(&img, Format::Png, &PngCodec::default()).unwrap();
//! assert_eq!(&bytes[1..4], b"PNG");
//! ```
//!
//! # Feature Flags
//!
//! - `png` - [`PngCodec`] over the `png` crate (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod codec;
pub mod finalize;
pub mod format;
pub mod layout;

#[cfg(feature = "png")]
pub mod png;

pub use codec::{encode_image, encode_to_vec, save, Codec};
pub use error::{IoError, IoResult};
pub use finalize::{finalize, FinalizedImage, FinalizedPlane};
pub use format::Format;
pub use layout::{CodecImage, CodecLayout};

#[cfg(feature = "png")]
pub use crate::png::PngCodec;
