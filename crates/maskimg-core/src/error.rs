//! Error types for maskimg-core operations.
//!
//! Every failure of the data model is reported through the [`Error`] enum:
//!
//! - Construction problems (channel count, shape, color range)
//! - Mode problems (unknown literal, unsupported conversion pair)
//! - Preconditions that need a non-empty image or matching shapes
//! - Usage errors for malformed per-channel parameters
//!
//! Degenerate data (a fully masked channel, a constant channel) is never an
//! error here; operations that meet it log a warning and leave data alone.
//!
//! # Usage
//!
//! ```rust
//! use maskimg_core::{Error, Mode, Result};
//!
//! fn expect_rgb(mode: Mode) -> Result<()> {
//!     if mode != Mode::Rgb {
//!         return Err(Error::wrong_mode("RGB", mode));
//!     }
//!     Ok(())
//! }
//!
//! assert!(expect_rgb(Mode::L).is_err());
//! ```

use crate::Mode;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the channel store, mode registry and image aggregate.
///
/// # Categories
///
/// - **Construction**: [`ChannelCount`](Error::ChannelCount), [`ShapeMismatch`](Error::ShapeMismatch),
///   [`RaggedGrid`](Error::RaggedGrid), [`InvalidColorRange`](Error::InvalidColorRange)
/// - **Mode**: [`UnknownMode`](Error::UnknownMode), [`UnsupportedConversion`](Error::UnsupportedConversion),
///   [`WrongMode`](Error::WrongMode), [`MissingPalette`](Error::MissingPalette)
/// - **Preconditions**: [`EmptyImage`](Error::EmptyImage)
/// - **Usage**: [`InvalidParameter`](Error::InvalidParameter)
/// - **Consistency**: [`Inconsistent`](Error::Inconsistent)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Number of channels does not match the mode.
    #[error("number of channels ({got}) does not match mode {mode} (expected {expected})")]
    ChannelCount {
        /// Mode the channels were given for
        mode: Mode,
        /// Channel count implied by the mode
        expected: usize,
        /// Channel count actually supplied
        got: usize,
    },

    /// Grids that must share a shape do not.
    ///
    /// Shapes are `(height, width)`.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Reference shape
        expected: (usize, usize),
        /// Offending shape
        got: (usize, usize),
    },

    /// A raw grid has rows of different lengths, or a buffer length
    /// disagrees with its declared shape.
    #[error("ragged grid: {0}")]
    RaggedGrid(String),

    /// Normalization range is malformed.
    #[error("invalid color range: {0}")]
    InvalidColorRange(String),

    /// Mode literal is not one of the registered modes.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// No transition exists between the two modes.
    #[error("conversion from {from} to {to} not implemented")]
    UnsupportedConversion {
        /// Source mode
        from: Mode,
        /// Requested mode
        to: Mode,
    },

    /// The image is not in a mode the operation accepts.
    #[error("image not in suitable mode: expected {expected}, got {got}")]
    WrongMode {
        /// Accepted mode(s), human readable
        expected: String,
        /// Actual mode
        got: Mode,
    },

    /// An indexed image has no palette to expand.
    #[error("indexed image in mode {0} has no palette")]
    MissingPalette(Mode),

    /// Operation requires image data.
    #[error("cannot {0} an empty image")]
    EmptyImage(&'static str),

    /// Malformed argument (negative gamma, wrong per-channel count, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Internal state violates the channel/shape invariant.
    #[error("internal inconsistency: {0}")]
    Inconsistent(String),
}

impl Error {
    /// Creates an [`Error::ChannelCount`] error.
    #[inline]
    pub fn channel_count(mode: Mode, got: usize) -> Self {
        Self::ChannelCount {
            mode,
            expected: mode.channel_count(),
            got,
        }
    }

    /// Creates an [`Error::ShapeMismatch`] error.
    #[inline]
    pub fn shape_mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        Self::ShapeMismatch { expected, got }
    }

    /// Creates an [`Error::WrongMode`] error.
    #[inline]
    pub fn wrong_mode(expected: impl Into<String>, got: Mode) -> Self {
        Self::WrongMode {
            expected: expected.into(),
            got,
        }
    }

    /// Creates an [`Error::UnsupportedConversion`] error.
    #[inline]
    pub fn unsupported_conversion(from: Mode, to: Mode) -> Self {
        Self::UnsupportedConversion { from, to }
    }

    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates an [`Error::InvalidColorRange`] error.
    #[inline]
    pub fn invalid_color_range(msg: impl Into<String>) -> Self {
        Self::InvalidColorRange(msg.into())
    }

    /// Returns `true` for errors raised while building an image.
    #[inline]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::ChannelCount { .. }
                | Self::ShapeMismatch { .. }
                | Self::RaggedGrid(_)
                | Self::InvalidColorRange(_)
        )
    }

    /// Returns `true` for mode literal and transition errors.
    #[inline]
    pub fn is_mode_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownMode(_)
                | Self::UnsupportedConversion { .. }
                | Self::WrongMode { .. }
                | Self::MissingPalette(_)
        )
    }
}
