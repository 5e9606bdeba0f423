//! Encoding a raster buffer back into uploadable bytes.
//!
//! This is the pipeline's exit boundary. Quality only means something for
//! JPEG; the other supported formats ignore it (PNG/GIF have no quality
//! knob here and WebP is encoded losslessly by the backend).

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use thiserror::Error;

use crate::raster::RasterImage;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The requested MIME type has no encoder backend.
    #[error("Unsupported export MIME type: {0}")]
    UnsupportedMimeType(String),

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder backend failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// An encoded image with a filename, ready for an upload layer.
#[derive(Debug, Clone)]
pub struct EncodedFile {
    /// Target filename, as passed by the caller.
    pub name: String,
    /// MIME type inferred from the filename extension.
    pub mime_type: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// Map a filename extension to an export MIME type.
///
/// `png`, `webp` and `gif` map to their own types; `jpg`, `jpeg` and
/// anything unrecognized fall back to `image/jpeg`.
pub fn mime_type_from_extension(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Encode a raster image to bytes in the requested MIME type.
///
/// `quality` is clamped to 1-100 and applies to JPEG only; other formats
/// pass it through untouched. An unknown MIME type surfaces as
/// `EncodeError::UnsupportedMimeType` at this call, never a panic.
pub fn encode_image(
    image: &RasterImage,
    mime_type: &str,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    match mime_type {
        "image/jpeg" => encode_jpeg(image, quality),
        "image/png" => encode_with_format(image, ImageFormat::Png),
        "image/webp" => encode_with_format(image, ImageFormat::WebP),
        "image/gif" => encode_with_format(image, ImageFormat::Gif),
        other => Err(EncodeError::UnsupportedMimeType(other.to_string())),
    }
}

/// Encode a raster image into a named in-memory file, with the MIME type
/// inferred from the filename extension.
pub fn encode_to_file(
    image: &RasterImage,
    filename: &str,
    quality: u8,
) -> Result<EncodedFile, EncodeError> {
    let mime_type = mime_type_from_extension(filename);
    let bytes = encode_image(image, mime_type, quality)?;

    Ok(EncodedFile {
        name: filename.to_string(),
        mime_type: mime_type.to_string(),
        bytes,
    })
}

/// JPEG has no alpha channel and the only quality knob, so it gets its
/// own path: flatten to RGB and hand the clamped quality to the encoder.
fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(1, 100);

    let mut rgb = Vec::with_capacity((image.pixel_count() as usize) * 3);
    for chunk in image.pixels.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

fn encode_with_format(image: &RasterImage, format: ImageFormat) -> Result<Vec<u8>, EncodeError> {
    let rgba = image
        .to_rgba_image()
        .ok_or_else(|| EncodeError::EncodingFailed("pixel buffer shape mismatch".to_string()))?;

    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut buffer, format)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_image(width: u32, height: u32) -> RasterImage {
        RasterImage::new(width, height, vec![128u8; (width * height * 4) as usize]).unwrap()
    }

    #[test]
    fn test_encode_jpeg_magic_bytes() {
        let jpeg = encode_image(&gray_image(100, 100), "image/jpeg", 90).unwrap();

        // SOI marker at the start, EOI at the end
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_magic_bytes() {
        let png = encode_image(&gray_image(10, 10), "image/png", 100).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_webp_magic_bytes() {
        let webp = encode_image(&gray_image(10, 10), "image/webp", 100).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_encode_gif_magic_bytes() {
        let gif = encode_image(&gray_image(10, 10), "image/gif", 100).unwrap();
        assert_eq!(&gif[0..3], b"GIF");
    }

    #[test]
    fn test_encode_unsupported_mime() {
        let result = encode_image(&gray_image(10, 10), "image/tiff", 90);
        assert!(matches!(result, Err(EncodeError::UnsupportedMimeType(_))));

        let result = encode_image(&gray_image(10, 10), "application/pdf", 90);
        assert!(matches!(result, Err(EncodeError::UnsupportedMimeType(_))));
    }

    #[test]
    fn test_encode_zero_dimensions() {
        let img = RasterImage::new(0, 0, vec![]).unwrap();
        let result = encode_image(&img, "image/jpeg", 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let img = gray_image(10, 10);
        assert!(encode_image(&img, "image/jpeg", 0).is_ok());
        assert!(encode_image(&img, "image/jpeg", 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        // Gradient image so quality differences are visible
        let mut pixels = Vec::new();
        for y in 0..60u32 {
            for x in 0..60u32 {
                pixels.extend_from_slice(&[
                    ((x * 4) % 256) as u8,
                    ((y * 4) % 256) as u8,
                    (((x + y) * 2) % 256) as u8,
                    255,
                ]);
            }
        }
        let img = RasterImage::new(60, 60, pixels).unwrap();

        let low_q = encode_image(&img, "image/jpeg", 20).unwrap();
        let high_q = encode_image(&img, "image/jpeg", 95).unwrap();
        assert!(high_q.len() > low_q.len());
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type_from_extension("photo.png"), "image/png");
        assert_eq!(mime_type_from_extension("photo.webp"), "image/webp");
        assert_eq!(mime_type_from_extension("photo.gif"), "image/gif");
        assert_eq!(mime_type_from_extension("photo.jpg"), "image/jpeg");
        assert_eq!(mime_type_from_extension("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_type_from_extension("photo.JPG"), "image/jpeg");
        assert_eq!(mime_type_from_extension("PHOTO.PNG"), "image/png");
        // Unknown and missing extensions default to JPEG
        assert_eq!(mime_type_from_extension("photo.bmp"), "image/jpeg");
        assert_eq!(mime_type_from_extension("photo"), "image/jpeg");
    }

    #[test]
    fn test_encode_to_file() {
        let file = encode_to_file(&gray_image(10, 10), "edited.png", 90).unwrap();
        assert_eq!(file.name, "edited.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(&file.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_encode_to_file_default_jpeg() {
        let file = encode_to_file(&gray_image(10, 10), "upload.bin", 90).unwrap();
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(&file.bytes[0..2], &[0xFF, 0xD8]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
