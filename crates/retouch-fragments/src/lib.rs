//! Retouch Fragments - selection fragment extraction
//!
//! This crate carves referenceable fragments out of a larger submission
//! for the critique/annotation feature: a rectangular sub-region of an
//! image re-encoded as a small JPEG preview, or a character range of rich
//! text projected to plain text.
//!
//! Image selections are stored as percentages of the image's *actual*
//! pixel dimensions, never of any on-screen scaled size. That is the one
//! contract callers must not break: rendering scale changes per device
//! and must never leak into stored selection data.

mod text;

pub use text::{extract_text_selection, plain_text_of, TextSelection};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use retouch_core::{apply_crop, encode_image, CropArea, EncodeError, RasterImage};

/// JPEG quality for fragment previews. Fixed: fragments are small inline
/// reference images, not archival exports.
const FRAGMENT_JPEG_QUALITY: u8 = 85;

/// Errors from fragment extraction.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// The source image has no pixels.
    #[error("Cannot extract a fragment from an empty source image")]
    EmptySource,

    /// Re-encoding the cropped fragment failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A rectangular selection on an image, in percentages (0-100) of the
/// image's natural pixel dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSelection {
    /// Left edge as a percentage of the natural width.
    pub x: f64,
    /// Top edge as a percentage of the natural height.
    pub y: f64,
    /// Width as a percentage of the natural width.
    pub width: f64,
    /// Height as a percentage of the natural height.
    pub height: f64,
    /// Where the extracted fragment ended up, once stored.
    pub fragment_url: Option<String>,
}

impl ImageSelection {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fragment_url: None,
        }
    }
}

/// Extract the selected region of an image as JPEG preview bytes.
///
/// Percentages are converted to absolute pixels against the decoded
/// image's natural dimensions, then cropped with the same minimum-size
/// floor and origin clamping as the main editing crop, and re-encoded at
/// a fixed preview quality.
pub fn extract_image_fragment(
    image: &RasterImage,
    selection: &ImageSelection,
) -> Result<Vec<u8>, FragmentError> {
    if image.is_empty() {
        return Err(FragmentError::EmptySource);
    }

    let area = selection_to_pixels(selection, image.width, image.height);
    let cropped = apply_crop(image, &area);

    Ok(encode_image(&cropped, "image/jpeg", FRAGMENT_JPEG_QUALITY)?)
}

/// Convert a percentage selection to a pixel-unit crop area.
fn selection_to_pixels(selection: &ImageSelection, width: u32, height: u32) -> CropArea {
    let to_px = |percent: f64, dimension: u32| -> u32 {
        (percent.clamp(0.0, 100.0) / 100.0 * dimension as f64).round() as u32
    };

    CropArea::new(
        to_px(selection.x, width),
        to_px(selection.y, height),
        to_px(selection.width, width),
        to_px(selection.height, height),
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use retouch_core::MIN_CROP_SIZE;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (20u32..=80, 20u32..=80)
    }

    /// Selections well outside the 0-100 range; percentages clamp, so every
    /// combination must still yield a valid crop.
    fn selection_strategy() -> impl Strategy<Value = ImageSelection> {
        (
            -50.0f64..=200.0,
            -50.0f64..=200.0,
            -50.0f64..=200.0,
            -50.0f64..=200.0,
        )
            .prop_map(|(x, y, width, height)| ImageSelection::new(x, y, width, height))
    }

    fn flat_image(width: u32, height: u32) -> RasterImage {
        RasterImage::new(width, height, vec![120u8; (width * height * 4) as usize]).unwrap()
    }

    proptest! {
        /// Property: the pixel rect derived from any percentage selection
        /// crops to a buffer inside the source, at or above the size floor,
        /// with len == w * h * 4.
        #[test]
        fn prop_fragment_crop_invariants(
            (width, height) in dimensions_strategy(),
            selection in selection_strategy(),
        ) {
            let img = flat_image(width, height);
            let area = selection_to_pixels(&selection, width, height);
            let cropped = apply_crop(&img, &area);

            prop_assert_eq!(
                cropped.pixels.len(),
                (cropped.width as usize) * (cropped.height as usize) * 4
            );
            prop_assert!(cropped.width >= MIN_CROP_SIZE.min(width));
            prop_assert!(cropped.height >= MIN_CROP_SIZE.min(height));
            prop_assert!(cropped.width <= width);
            prop_assert!(cropped.height <= height);
        }

        /// Property: extraction never fails on a non-empty source and the
        /// output is always a JPEG stream.
        #[test]
        fn prop_fragment_always_jpeg(
            (width, height) in (20u32..=40, 20u32..=40),
            selection in selection_strategy(),
        ) {
            let img = flat_image(width, height);
            let bytes = extract_image_fragment(&img, &selection).unwrap();
            prop_assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        }
    }
}
