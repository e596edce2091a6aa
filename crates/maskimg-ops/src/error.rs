//! Error types for image operations.

use maskimg_core::Mode;
use thiserror::Error;

/// Error type for enhancement and compositing operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Error from the image model or a mode conversion.
    #[error(transparent)]
    Core(#[from] maskimg_core::Error),

    /// Images or arrays have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operands are in different or unsuitable modes.
    #[error("mode mismatch: {0}")]
    ModeMismatch(String),

    /// Operation requires image data.
    #[error("cannot {0} an empty image")]
    EmptyImage(&'static str),
}

impl OpsError {
    /// Creates an [`OpsError::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates an [`OpsError::SizeMismatch`] error from two shapes.
    #[inline]
    pub fn size_mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        Self::SizeMismatch(format!(
            "expected {}x{}, got {}x{}",
            expected.0, expected.1, got.0, got.1
        ))
    }

    /// Creates an [`OpsError::ModeMismatch`] error.
    #[inline]
    pub fn mode_mismatch(expected: Mode, got: Mode) -> Self {
        Self::ModeMismatch(format!("expected {expected}, got {got}"))
    }

    /// Returns `true` for argument errors raised before any work is done.
    #[inline]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
            || matches!(self, Self::Core(e) if matches!(e, maskimg_core::Error::InvalidParameter(_)))
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
