//! Codec hand-off.
//!
//! [`encode_image`] takes an [`Image`] through the save path:
//!
//! ```text
//! empty check -> format check -> fill policy -> finalize -> layout -> Codec::encode
//! ```
//!
//! Codecs only see [`CodecImage`] planes and the image's `info` tags; byte
//! serialization, compression and metadata are theirs.

use crate::finalize::finalize;
use crate::layout::CodecImage;
use crate::{Format, IoError, IoResult};
use maskimg_core::Image;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

/// Encoder for one or more [`Format`]s.
pub trait Codec {
    /// Short codec name, for logs.
    fn name(&self) -> &'static str;

    /// Formats this codec writes.
    fn formats(&self) -> &[Format];

    /// Writes `image` to `sink` in `format`, with `tags` as metadata.
    fn encode(
        &self,
        image: &CodecImage,
        format: Format,
        tags: &BTreeMap<String, String>,
        sink: &mut dyn Write,
    ) -> IoResult<()>;

    /// Whether [`formats`](Codec::formats) contains `format`.
    fn supports(&self, format: Format) -> bool {
        self.formats().contains(&format)
    }
}

/// Encodes `image` as `format` through `codec` into `sink`.
///
/// Formats without alpha get a zero fill when the image has none, so
/// missing data turns black instead of transparent.
///
/// # Errors
///
/// - [`IoError::EmptyImage`] for an image without channels
/// - [`IoError::UnsupportedFormat`] if `codec` does not write `format`
/// - [`IoError::UnsupportedMode`] for `YCbCr`/`YCbCrA` images
/// - codec errors as reported
pub fn encode_image(image: &Image, format: Format, codec: &dyn Codec, sink: &mut dyn Write) -> IoResult<()> {
    if image.is_empty() {
        return Err(IoError::EmptyImage);
    }
    if !codec.supports(format) {
        return Err(IoError::UnsupportedFormat(format!(
            "{format} is not written by the {} codec",
            codec.name()
        )));
    }
    let zero_fill = !format.supports_alpha() && image.fill_value().is_none();
    if zero_fill {
        debug!("No fill_value provided, setting it to 0.");
    }

    let mut finalized = finalize(image)?;
    if zero_fill {
        finalized.fill_value = Some(vec![0; finalized.planes.len()]);
    }
    let payload = CodecImage::from_finalized(&finalized)?;
    trace!(
        codec = codec.name(),
        %format,
        layout = ?payload.layout,
        width = payload.width,
        height = payload.height,
        "encode"
    );
    codec.encode(&payload, format, image.info(), sink)
}

/// Encodes `image` into a byte buffer.
pub fn encode_to_vec(image: &Image, format: Format, codec: &dyn Codec) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    encode_image(image, format, codec, &mut buf)?;
    Ok(buf)
}

/// Saves `image` to `path`.
///
/// The format is `format` when given, otherwise the extension of `path`.
/// Missing parent directories are created. Nothing is written when encoding
/// fails.
///
/// # Example
///
/// ```rust,ignore
/// use maskimg_io::{save, PngCodec};
///
/// save(&image, "out/composite.png", None, &PngCodec::default())?;
/// ```
pub fn save<P: AsRef<Path>>(image: &Image, path: P, format: Option<&str>, codec: &dyn Codec) -> IoResult<()> {
    let path = path.as_ref();
    let format = match format {
        Some(name) => Format::from_name(name)?,
        None => Format::from_path(path)?,
    };
    let bytes = encode_to_vec(image, format, codec)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), %format, bytes = bytes.len(), "Saved image");
    Ok(())
}
