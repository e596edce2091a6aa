//! PNG encoding via the `png` crate.
//!
//! Writes 8-bit gray, gray-alpha, RGB and RGBA. Image `info` entries become
//! `tEXt` chunks, except for keys that describe encoder parameters.

use crate::codec::Codec;
use crate::layout::{CodecImage, CodecLayout};
use crate::{Format, IoError, IoResult};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::trace;

/// Info keys that are not written as text chunks.
pub const RESERVED_KEYS: [&str; 5] = ["interlace", "gamma", "dpi", "transparency", "aspect"];

/// PNG codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec {
    /// Deflate compression level.
    pub compression: png::Compression,
}

impl Codec for PngCodec {
    fn name(&self) -> &'static str {
        "png"
    }

    fn formats(&self) -> &[Format] {
        &[Format::Png]
    }

    fn encode(
        &self,
        image: &CodecImage,
        _format: Format,
        tags: &BTreeMap<String, String>,
        sink: &mut dyn Write,
    ) -> IoResult<()> {
        let color_type = match image.layout {
            CodecLayout::L => png::ColorType::Grayscale,
            CodecLayout::LA => png::ColorType::GrayscaleAlpha,
            CodecLayout::Rgb => png::ColorType::Rgb,
            CodecLayout::Rgba => png::ColorType::Rgba,
        };
        let width = dimension(image.width)?;
        let height = dimension(image.height)?;

        let mut encoder = png::Encoder::new(sink, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(self.compression);

        for (key, value) in tags {
            if RESERVED_KEYS.contains(&key.as_str()) {
                trace!(key = %key, "Skipping reserved info key");
                continue;
            }
            encoder
                .add_text_chunk(key.clone(), value.clone())
                .map_err(|e| IoError::EncodeError(format!("text chunk '{key}': {e}")))?;
        }

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .write_image_data(&image.interleaved())
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer.finish().map_err(|e| IoError::EncodeError(e.to_string()))?;
        Ok(())
    }
}

fn dimension(n: usize) -> IoResult<u32> {
    u32::try_from(n).map_err(|_| IoError::EncodeError(format!("dimension {n} too large for PNG")))
}
