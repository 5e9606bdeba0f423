//! Luminance calculation utilities using ITU-R BT.601 coefficients.
//!
//! This module provides shared luminance calculation functions used by the
//! tone, color-cast, and auto-lighting stages. The coefficients are part of
//! the output contract: every stage that gates on "dark" or "bright" pixels
//! must agree on the same luminance value for a given RGB triple.

/// ITU-R BT.601 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.114;

/// Calculate luminance from u8 RGB values as an f32 in range 0.0-255.0.
///
/// The unrounded value is what the tone stages compare against their
/// thresholds; rounding only happens when binning into histogram buckets.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32
}

/// Calculate luminance from u8 RGB values, rounded to a u8 (0-255).
#[inline]
pub fn luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    luminance(r, g, b).clamp(0.0, 255.0).round() as u8
}
