//! Photo attachment preparation.

use std::io::Cursor;

use image::{codecs::jpeg::JpegEncoder, DynamicImage, GenericImageView};

use super::{encode_base64, ensure_within_limit};
use crate::{Error, Result};

/// How a picked photo is shrunk before it is stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
    /// Upper bound for the base64 output
    pub max_encoded_bytes: usize,
}

impl Default for PhotoOptions {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            jpeg_quality: 50,
            max_encoded_bytes: 1024 * 1024,
        }
    }
}

/// A photo ready to be put on a journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPhoto {
    /// Base64 JPEG without a data-URL prefix
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

/// Decode any supported image, fit it inside the bounds without upscaling
/// and re-encode it as JPEG.
pub fn prepare_photo(source_bytes: &[u8], options: PhotoOptions) -> Result<PreparedPhoto> {
    if source_bytes.is_empty() {
        return Err(Error::Media("Photo file is empty".to_string()));
    }
    if options.max_width == 0 || options.max_height == 0 {
        return Err(Error::InvalidInput(
            "Photo bounds must be greater than zero".to_string(),
        ));
    }

    let source = image::load_from_memory(source_bytes)
        .map_err(|error| Error::Media(format!("Failed to decode photo: {error}")))?;

    let (source_width, source_height) = source.dimensions();
    let resized = if source_width <= options.max_width && source_height <= options.max_height {
        source
    } else {
        source.thumbnail(options.max_width, options.max_height)
    };
    let (width, height) = resized.dimensions();
    tracing::debug!(
        "Photo resized from {}x{} to {}x{}",
        source_width,
        source_height,
        width,
        height
    );

    let jpeg = encode_jpeg(&resized, options.jpeg_quality)?;
    let base64 = encode_base64(&jpeg);
    ensure_within_limit("Photo", &base64, options.max_encoded_bytes)?;

    Ok(PreparedPhoto {
        base64,
        width,
        height,
    })
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let mut cursor = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut cursor, quality)
        .encode_image(&rgb)
        .map_err(|error| Error::Media(format!("Failed to encode JPEG: {error}")))?;
    Ok(cursor.into_inner())
}
