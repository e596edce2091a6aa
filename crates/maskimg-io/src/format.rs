//! Output format resolution.
//!
//! Formats are resolved from a name (`"png"`, `"JPEG"`, ...) or from the
//! extension of a file name. Unknown names fail before any image work is
//! done.
//!
//! ```rust
//! use maskimg_io::Format;
//!
//! assert_eq!(Format::from_name("JPG").unwrap(), Format::Jpeg);
//! assert_eq!(Format::from_path("out/scene.tiff").unwrap(), Format::Tiff);
//! assert!(Format::from_name("xyz").is_err());
//! assert!(!Format::Jpeg.supports_alpha());
//! ```

use crate::{IoError, IoResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// TIFF format.
    Tiff,
    /// BMP format.
    Bmp,
    /// GIF format.
    Gif,
    /// WebP format.
    WebP,
}

impl Format {
    /// All formats.
    pub const ALL: [Format; 6] = [
        Format::Png,
        Format::Jpeg,
        Format::Tiff,
        Format::Bmp,
        Format::Gif,
        Format::WebP,
    ];

    /// Resolves a format name, case-insensitively.
    ///
    /// A leading dot is accepted, so extensions can be passed as is.
    pub fn from_name(name: &str) -> IoResult<Self> {
        let lower = name.trim_start_matches('.').to_lowercase();
        match lower.as_str() {
            "png" => Ok(Format::Png),
            "jpg" | "jpeg" | "jpe" | "jfif" => Ok(Format::Jpeg),
            "tif" | "tiff" => Ok(Format::Tiff),
            "bmp" | "dib" => Ok(Format::Bmp),
            "gif" => Ok(Format::Gif),
            "webp" => Ok(Format::WebP),
            _ => Err(IoError::UnknownFormat(name.to_string())),
        }
    }

    /// Resolves the format from a file name's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| IoError::UnknownFormat(path.display().to_string()))?;
        Self::from_name(ext)
    }

    /// Canonical uppercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Format::Png => "PNG",
            Format::Jpeg => "JPEG",
            Format::Tiff => "TIFF",
            Format::Bmp => "BMP",
            Format::Gif => "GIF",
            Format::WebP => "WEBP",
        }
    }

    /// Preferred file extension.
    pub const fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpg",
            Format::Tiff => "tif",
            Format::Bmp => "bmp",
            Format::Gif => "gif",
            Format::WebP => "webp",
        }
    }

    /// Whether the format can store an alpha channel.
    ///
    /// Missing data is rendered transparent only for these formats; the
    /// others get a zero fill when the image has no fill value.
    pub const fn supports_alpha(self) -> bool {
        matches!(self, Format::Png | Format::Tiff | Format::WebP)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
