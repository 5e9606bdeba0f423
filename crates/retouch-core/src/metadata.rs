//! Read-only metadata extraction from encoded image bytes.
//!
//! Metadata is derived fresh on every call and never cached across
//! mutations. Core fields (dimensions, format, byte size) fail hard when
//! the source cannot be decoded; color depth is enrichment and degrades to
//! `None` instead of failing.

use serde::{Deserialize, Serialize};

use crate::decode::DecodeError;

/// Metadata describing an encoded image source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Short format name ("jpeg", "png", "webp", "gif", ...).
    pub format: String,
    /// Encoded size in bytes.
    pub size: Option<u64>,
    /// Bits per pixel of the decoded representation (e.g. 32 for RGBA,
    /// 24 for RGB). Best-effort: `None` when it cannot be determined.
    pub color_depth: Option<u8>,
}

/// Extract metadata from encoded image bytes.
///
/// Dimensions and format come from a decode of the source; the byte size
/// is the encoded length. Color depth is inferred from the decoded color
/// type and silently omitted if the conversion is not meaningful.
pub fn read_metadata(bytes: &[u8]) -> Result<ImageMetadata, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(ImageMetadata {
        width: decoded.width(),
        height: decoded.height(),
        format: format_name(format).to_string(),
        size: Some(bytes.len() as u64),
        color_depth: color_depth_bits(decoded.color()),
    })
}

fn format_name(format: image::ImageFormat) -> &'static str {
    match format {
        image::ImageFormat::Jpeg => "jpeg",
        image::ImageFormat::Png => "png",
        image::ImageFormat::WebP => "webp",
        image::ImageFormat::Gif => "gif",
        _ => "unknown",
    }
}

/// Bits per pixel for the common decoded color types. Exotic layouts
/// (high bit depth, luma-only) report `None` rather than a wrong number.
fn color_depth_bits(color: image::ColorType) -> Option<u8> {
    match color {
        image::ColorType::Rgba8 | image::ColorType::La16 => Some(32),
        image::ColorType::Rgb8 => Some(24),
        image::ColorType::La8 => Some(16),
        image::ColorType::L8 => Some(8),
        _ => None,
    }
}
