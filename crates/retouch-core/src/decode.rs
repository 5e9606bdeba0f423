//! Decoding encoded image bytes into a raster buffer.
//!
//! Decoding is the pipeline's entry boundary: it runs once per source,
//! before any operation, and a failure here aborts the whole edit without
//! any stage running. The codec work is delegated to the `image` crate.

use thiserror::Error;

use crate::raster::RasterImage;

/// Error types for image decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a recognized image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Decode encoded image bytes (JPEG, PNG, WebP or GIF) into an RGBA raster.
///
/// The format is sniffed from magic bytes; declared MIME types are not
/// trusted. Sources decoded without an alpha channel come back fully
/// opaque.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(RasterImage::from_rgba_image(decoded.to_rgba8()))
}
