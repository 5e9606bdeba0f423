//! Tone operations: brightness, contrast, shadow and highlight recovery.
//!
//! All stages clamp their input to the documented range instead of
//! rejecting it, so every slider position an editing UI can produce yields
//! a valid image. Each function allocates a fresh output buffer and leaves
//! the alpha channel untouched.

use crate::luminance::luminance;
use crate::raster::RasterImage;

/// Hard cap on shadow lightening: at most 50% of the remaining headroom
/// even at amount=100 on a fully dark pixel.
const SHADOW_RECOVERY_CAP: f32 = 0.5;

/// Hard cap on highlight darkening, symmetric to the shadow cap.
const HIGHLIGHT_RECOVERY_CAP: f32 = 0.5;

/// Adjust brightness. `value` is clamped to [-100, 100] and converted to a
/// multiplier `1 + value/100`: -100 = black, 0 = unchanged, 100 = doubled.
pub fn apply_brightness(image: &RasterImage, value: f32) -> RasterImage {
    let multiplier = 1.0 + value.clamp(-100.0, 100.0) / 100.0;

    map_rgb(image, |c| c * multiplier)
}

/// Adjust contrast around mid-gray. `value` is clamped to [-100, 100] and
/// converted to a factor `1 + value/100` applied as `(c - 128) * f + 128`.
pub fn apply_contrast(image: &RasterImage, value: f32) -> RasterImage {
    let factor = 1.0 + value.clamp(-100.0, 100.0) / 100.0;

    map_rgb(image, |c| (c - 128.0) * factor + 128.0)
}

/// Apply brightness then contrast, in that fixed order.
///
/// Brightness runs first so contrast amplifies the already-clamped result;
/// the reverse order produces numerically different output.
pub fn apply_brightness_contrast(image: &RasterImage, brightness: f32, contrast: f32) -> RasterImage {
    let brightened = apply_brightness(image, brightness);
    apply_contrast(&brightened, contrast)
}

/// Lighten dark regions. `amount` is clamped to [0, 100].
///
/// Pixels with luminance below 128 are blended toward white in proportion
/// to how dark they are, capped at 50% of the remaining headroom. Pixels at
/// or above mid-gray are untouched.
pub fn apply_shadow_recovery(image: &RasterImage, amount: f32) -> RasterImage {
    let strength = amount.clamp(0.0, 100.0) / 100.0;

    map_pixels(image, |r, g, b| {
        let lum = luminance(r, g, b);
        if lum >= 128.0 {
            return (r as f32, g as f32, b as f32);
        }
        let darkness = 1.0 - lum / 128.0;
        let lighten = strength * darkness * SHADOW_RECOVERY_CAP;
        (
            r as f32 + (255.0 - r as f32) * lighten,
            g as f32 + (255.0 - g as f32) * lighten,
            b as f32 + (255.0 - b as f32) * lighten,
        )
    })
}

/// Darken bright regions. `amount` is clamped to [0, 100].
///
/// Symmetric to shadow recovery: pixels with luminance above 128 are pulled
/// down in proportion to how bright they are, capped at 50%.
pub fn apply_highlight_recovery(image: &RasterImage, amount: f32) -> RasterImage {
    let strength = amount.clamp(0.0, 100.0) / 100.0;

    map_pixels(image, |r, g, b| {
        let lum = luminance(r, g, b);
        if lum <= 128.0 {
            return (r as f32, g as f32, b as f32);
        }
        let brightness = (lum - 128.0) / 128.0;
        let darken = strength * brightness * HIGHLIGHT_RECOVERY_CAP;
        (
            r as f32 - r as f32 * darken,
            g as f32 - g as f32 * darken,
            b as f32 - b as f32 * darken,
        )
    })
}

/// Apply shadow then highlight recovery, skipping zero-strength stages.
///
/// Skipping is an optimization only: a skipped stage is bit-identical to
/// running it with amount 0.
pub fn apply_shadows_highlights(image: &RasterImage, shadows: f32, highlights: f32) -> RasterImage {
    let mut result = image.clone();
    if shadows > 0.0 {
        result = apply_shadow_recovery(&result, shadows);
    }
    if highlights > 0.0 {
        result = apply_highlight_recovery(&result, highlights);
    }
    result
}

/// Apply a per-channel function to R, G, B of every pixel, clamping the
/// result to [0, 255]. Alpha passes through unchanged.
pub(crate) fn map_rgb(image: &RasterImage, f: impl Fn(f32) -> f32) -> RasterImage {
    map_pixels(image, |r, g, b| (f(r as f32), f(g as f32), f(b as f32)))
}

/// Apply a per-pixel function to the RGB triple of every pixel, clamping
/// each resulting channel to [0, 255]. Alpha passes through unchanged.
pub(crate) fn map_pixels(
    image: &RasterImage,
    f: impl Fn(u8, u8, u8) -> (f32, f32, f32),
) -> RasterImage {
    let mut pixels = image.pixels.clone();

    for chunk in pixels.chunks_exact_mut(4) {
        let (r, g, b) = f(chunk[0], chunk[1], chunk[2]);
        chunk[0] = r.clamp(0.0, 255.0).round() as u8;
        chunk[1] = g.clamp(0.0, 255.0).round() as u8;
        chunk[2] = b.clamp(0.0, 255.0).round() as u8;
    }

    RasterImage {
        width: image.width,
        height: image.height,
        pixels,
    }
}
