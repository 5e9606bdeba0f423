//! Retouch Core - Image processing library
//!
//! This crate provides the core image processing functionality for Retouch:
//! geometry transforms (crop, rotation), tone and color-cast corrections,
//! histogram-adaptive lighting, an ordered operation pipeline, metadata
//! extraction, and encoding of edited images for upload.

pub mod color;
pub mod decode;
pub mod encode;
pub mod histogram;
pub mod luminance;
pub mod metadata;
pub mod pipeline;
pub mod raster;
pub mod tone;
pub mod transform;

pub use color::{auto_color_correction, even_colors, remove_color_cast, remove_yellowing};
pub use decode::{decode_image, DecodeError};
pub use histogram::{auto_even_lighting, compute_luminance_histogram, LuminanceHistogram};
pub use encode::{encode_image, encode_to_file, mime_type_from_extension, EncodeError, EncodedFile};
pub use metadata::{read_metadata, ImageMetadata};
pub use pipeline::{apply_operations, ImageOperation, LightingAdjustments, PipelineError};
pub use raster::{RasterError, RasterImage};
pub use tone::{
    apply_brightness, apply_brightness_contrast, apply_contrast, apply_highlight_recovery,
    apply_shadow_recovery, apply_shadows_highlights,
};
pub use transform::{
    apply_crop, apply_rotate90, apply_rotation, compute_rotated_bounds, crop_dimensions, CropArea,
    MIN_CROP_SIZE,
};
