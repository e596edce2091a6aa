//! Error types for finalization and encoding.

use maskimg_core::Mode;
use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error from the image model or a mode conversion.
    #[error(transparent)]
    Core(#[from] maskimg_core::Error),

    /// Format name or extension not recognized.
    #[error("unknown image format '{0}'")]
    UnknownFormat(String),

    /// Format known but not handled by the codec in use.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Mode has no codec channel layout.
    #[error("mode {0} cannot be handed to a codec")]
    UnsupportedMode(Mode),

    /// Attempt to encode an image without data.
    #[error("cannot save an empty image")]
    EmptyImage,

    /// Encoding error reported by a codec.
    #[error("encode error: {0}")]
    EncodeError(String),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
