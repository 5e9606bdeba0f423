//! Color-cast operations: yellowing removal, color evening, cast removal.
//!
//! The evening and cast-removal stages are two-pass: a full pass over all
//! pixels computes the image-wide channel averages before the per-pixel
//! pass starts. Parallel implementations must keep that barrier.

use crate::luminance::{luminance, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::raster::RasterImage;
use crate::tone::map_pixels;

/// Cap on yellow-cast correction of the red/green channels.
const YELLOWING_CAP: f32 = 0.5;

/// Fraction of the yellow correction applied as a blue lift.
const YELLOWING_BLUE_LIFT: f32 = 0.3;

/// Fixed strengths of the auto color correction macro, in execution order.
const AUTO_CAST_STRENGTH: f32 = 80.0;
const AUTO_YELLOWING_STRENGTH: f32 = 60.0;
const AUTO_EVEN_STRENGTH: f32 = 40.0;

/// Reduce a yellow color cast. `amount` is clamped to [0, 100].
///
/// A pixel skews yellow when `(R+G)/2` exceeds B. The correction scales
/// with how strong the skew is (capped at 50%), pulling R and G down and
/// nudging B up by 30% of the same correction.
pub fn remove_yellowing(image: &RasterImage, amount: f32) -> RasterImage {
    let strength = amount.clamp(0.0, 100.0) / 100.0;

    map_pixels(image, |r, g, b| {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let yellow = (r + g) / 2.0 - b;
        if yellow <= 0.0 {
            return (r, g, b);
        }
        let ratio = (yellow / 128.0).min(1.0);
        let correction = strength * ratio * YELLOWING_CAP;
        (
            r - r * correction,
            g - g * correction,
            b + (255.0 - b) * correction * YELLOWING_BLUE_LIFT,
        )
    })
}

/// Normalize pixels toward the image-average color, preserving each
/// pixel's own brightness. `amount` is clamped to [0, 100].
///
/// Pass 1 computes the average R, G, B and their luminance. Pass 2
/// projects every pixel's luminance onto that average color and blends:
/// at amount 100 each pixel lands exactly on its target, at 0 nothing
/// moves.
pub fn even_colors(image: &RasterImage, amount: f32) -> RasterImage {
    let strength = amount.clamp(0.0, 100.0) / 100.0;
    let Some(avg) = channel_averages(image) else {
        return image.clone();
    };
    if avg.luminance <= 0.0 {
        return image.clone();
    }

    map_pixels(image, |r, g, b| {
        let lum = luminance(r, g, b);
        let scale = lum / avg.luminance;
        let (r, g, b) = (r as f32, g as f32, b as f32);
        (
            r + (scale * avg.r - r) * strength,
            g + (scale * avg.g - g) * strength,
            b + (scale * avg.b - b) * strength,
        )
    })
}

/// Remove a global color cast. `amount` is clamped to [0, 100].
///
/// The cast is the deviation of each average channel from the average
/// luminance; that vector, scaled by the amount, is subtracted from every
/// pixel.
pub fn remove_color_cast(image: &RasterImage, amount: f32) -> RasterImage {
    let strength = amount.clamp(0.0, 100.0) / 100.0;
    let Some(avg) = channel_averages(image) else {
        return image.clone();
    };

    let cast_r = (avg.r - avg.luminance) * strength;
    let cast_g = (avg.g - avg.luminance) * strength;
    let cast_b = (avg.b - avg.luminance) * strength;

    map_pixels(image, |r, g, b| {
        (
            r as f32 - cast_r,
            g as f32 - cast_g,
            b as f32 - cast_b,
        )
    })
}

/// Fixed macro for one-click color correction: cast removal at 80, then
/// yellowing removal at 60, then color evening at 40. The order and
/// strengths are part of the output contract and are not configurable.
pub fn auto_color_correction(image: &RasterImage) -> RasterImage {
    let decast = remove_color_cast(image, AUTO_CAST_STRENGTH);
    let deyellowed = remove_yellowing(&decast, AUTO_YELLOWING_STRENGTH);
    even_colors(&deyellowed, AUTO_EVEN_STRENGTH)
}

struct ChannelAverages {
    r: f32,
    g: f32,
    b: f32,
    luminance: f32,
}

/// Image-wide average R, G, B and the luminance of that average color.
/// Returns None for an empty image.
fn channel_averages(image: &RasterImage) -> Option<ChannelAverages> {
    if image.is_empty() {
        return None;
    }

    let mut sum_r = 0.0f64;
    let mut sum_g = 0.0f64;
    let mut sum_b = 0.0f64;

    for chunk in image.pixels.chunks_exact(4) {
        sum_r += chunk[0] as f64;
        sum_g += chunk[1] as f64;
        sum_b += chunk[2] as f64;
    }

    let count = image.pixel_count() as f64;
    let r = (sum_r / count) as f32;
    let g = (sum_g / count) as f32;
    let b = (sum_b / count) as f32;

    Some(ChannelAverages {
        r,
        g,
        b,
        luminance: LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b,
    })
}
