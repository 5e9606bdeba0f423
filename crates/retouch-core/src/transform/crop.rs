//! Image cropping with clamp-to-bounds semantics.
//!
//! Crop requests are expressed in pixel units against the buffer being
//! cropped. A request that would run past an edge is satisfied by shifting
//! the origin back into bounds rather than failing, so interactive crop
//! handles always produce some valid image.

use serde::{Deserialize, Serialize};

use crate::raster::RasterImage;

/// Minimum crop dimension in pixels. Requests below this are grown.
pub const MIN_CROP_SIZE: u32 = 20;

/// A crop rectangle in pixel units, relative to the buffer being cropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropArea {
    /// Left edge of the crop region.
    pub x: u32,
    /// Top edge of the crop region.
    pub y: u32,
    /// Requested crop width.
    pub width: u32,
    /// Requested crop height.
    pub height: u32,
}

impl CropArea {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Maximum safe crop width/height for a given origin and source size.
///
/// Does not clamp the origin itself; callers keeping a crop rectangle in
/// sync with a resize handle use this to cap the size fields only.
pub fn crop_dimensions(x: u32, y: u32, source_width: u32, source_height: u32) -> (u32, u32) {
    (
        source_width.saturating_sub(x),
        source_height.saturating_sub(y),
    )
}

/// Crop an image to the given area, clamping rather than erroring.
///
/// The effective width/height is `max(MIN_CROP_SIZE, requested)` capped at
/// the source dimension, and the origin is then clamped so the rectangle
/// stays inside the source. A request near an edge silently shifts; there
/// is no out-of-bounds error condition.
///
/// # Example
///
/// ```ignore
/// // 50x50 window into a 100x100 image, origin clamped from (1000, 1000)
/// let out = apply_crop(&image, &CropArea::new(1000, 1000, 50, 50));
/// assert_eq!((out.width, out.height), (50, 50));
/// ```
pub fn apply_crop(image: &RasterImage, area: &CropArea) -> RasterImage {
    if image.is_empty() {
        return image.clone();
    }

    let out_width = area.width.max(MIN_CROP_SIZE).min(image.width);
    let out_height = area.height.max(MIN_CROP_SIZE).min(image.height);

    let left = area.x.min(image.width - out_width);
    let top = area.y.min(image.height - out_height);

    let mut output = vec![0u8; (out_width as usize) * (out_height as usize) * 4];

    // Rows are contiguous in RGBA, so copy whole rows at once
    for y in 0..out_height {
        let src_y = top + y;
        let src_start = pixel_offset(left, src_y, image.width);
        let src_end = src_start + (out_width as usize) * 4;
        let dst_start = pixel_offset(0, y, out_width);
        let dst_end = dst_start + (out_width as usize) * 4;

        output[dst_start..dst_end].copy_from_slice(&image.pixels[src_start..src_end]);
    }

    RasterImage {
        width: out_width,
        height: out_height,
        pixels: output,
    }
}

/// Byte offset of pixel (x, y) in a row-major RGBA buffer. Computed in
/// usize: 32-bit index arithmetic overflows past ~32k x 32k sources.
#[inline]
fn pixel_offset(x: u32, y: u32, width: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}


// ============================================================================
// Property-Based Tests
// ============================================================================
