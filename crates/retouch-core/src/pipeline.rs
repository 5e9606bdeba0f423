//! The ordered operation pipeline that batches an edit session.
//!
//! An edit session is a list of tagged operations applied left to right,
//! each stage consuming the previous stage's output buffer. The list is
//! plain data (serde-serializable) so an edit history can cross a process
//! or RPC boundary; no variant carries more than primitive fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{auto_color_correction, even_colors, remove_yellowing};
use crate::histogram::auto_even_lighting;
use crate::raster::RasterImage;
use crate::tone::{apply_brightness, apply_contrast, apply_shadows_highlights};
use crate::transform::{apply_crop, apply_rotate90, apply_rotation, CropArea};

/// Errors for structurally invalid pipeline input.
///
/// Everything else is clamped: bad slider values, out-of-bounds crops and
/// over-range angles all produce some valid image instead of failing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source buffer has no pixels.
    #[error("Cannot run pipeline on an empty source image")]
    EmptySource,

    /// A rotation angle is NaN or infinite.
    #[error("Rotation angle is not a finite number: {0}")]
    NonFiniteAngle(f64),
}

/// Lighting corrections for one pipeline stage. Every field is
/// independently optional; an absent field skips that correction entirely.
///
/// Out-of-range values are clamped by each stage, never rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingAdjustments {
    /// Brightness, -100 to 100.
    pub brightness: Option<f32>,
    /// Contrast, -100 to 100.
    pub contrast: Option<f32>,
    /// Shadow recovery strength, 0 to 100.
    pub shadows: Option<f32>,
    /// Highlight recovery strength, 0 to 100.
    pub highlights: Option<f32>,
    /// Yellow-cast removal strength, 0 to 100.
    pub remove_yellowing: Option<f32>,
    /// Color evening strength, 0 to 100.
    pub even_colors: Option<f32>,
    /// Run the fixed auto color correction macro after the other stages.
    pub auto_color_correction: Option<bool>,
}

impl LightingAdjustments {
    /// Create adjustments with every stage skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no stage would run.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One editing operation, as stored in an edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ImageOperation {
    /// Crop to a pixel-unit rectangle.
    Crop { area: CropArea },
    /// Rotate by an arbitrary angle in degrees (positive = clockwise).
    Rotate { angle: f64 },
    /// Rotate by exactly 90 degrees.
    Rotate90 { clockwise: bool },
    /// Apply manual lighting/color corrections.
    Lighting { adjustments: LightingAdjustments },
    /// Histogram-adaptive shadow/highlight recovery, no parameters.
    AutoEvenLighting,
}

/// Run an ordered operation list against a source image.
///
/// Operations execute left to right, each consuming the previous output.
/// Nothing is retried and no stage catches another stage's errors; the
/// only failures are structural (empty source, non-finite angle) and they
/// abort before any pixel work for that stage runs.
pub fn apply_operations(
    source: &RasterImage,
    operations: &[ImageOperation],
) -> Result<RasterImage, PipelineError> {
    if source.is_empty() {
        return Err(PipelineError::EmptySource);
    }

    // Validate angles up front so a failing pipeline never returns a
    // partially edited image
    for op in operations {
        if let ImageOperation::Rotate { angle } = op {
            if !angle.is_finite() {
                return Err(PipelineError::NonFiniteAngle(*angle));
            }
        }
    }

    let mut current = source.clone();
    for op in operations {
        current = match op {
            ImageOperation::Crop { area } => apply_crop(&current, area),
            ImageOperation::Rotate { angle } => apply_rotation(&current, *angle),
            ImageOperation::Rotate90 { clockwise } => apply_rotate90(&current, *clockwise),
            ImageOperation::Lighting { adjustments } => apply_lighting(&current, adjustments),
            ImageOperation::AutoEvenLighting => auto_even_lighting(&current),
        };
    }

    Ok(current)
}

/// Apply the optional lighting stages in their fixed order: brightness,
/// contrast, shadows/highlights, yellowing removal, color evening, then
/// the auto color macro.
fn apply_lighting(image: &RasterImage, adjustments: &LightingAdjustments) -> RasterImage {
    let mut current = image.clone();

    if let Some(brightness) = adjustments.brightness {
        current = apply_brightness(&current, brightness);
    }
    if let Some(contrast) = adjustments.contrast {
        current = apply_contrast(&current, contrast);
    }

    let shadows = adjustments.shadows.unwrap_or(0.0);
    let highlights = adjustments.highlights.unwrap_or(0.0);
    if shadows > 0.0 || highlights > 0.0 {
        current = apply_shadows_highlights(&current, shadows, highlights);
    }

    if let Some(amount) = adjustments.remove_yellowing {
        if amount > 0.0 {
            current = remove_yellowing(&current, amount);
        }
    }
    if let Some(amount) = adjustments.even_colors {
        if amount > 0.0 {
            current = even_colors(&current, amount);
        }
    }
    if adjustments.auto_color_correction == Some(true) {
        current = auto_color_correction(&current);
    }

    current
}


// ============================================================================
// Property-Based Tests
// ============================================================================
