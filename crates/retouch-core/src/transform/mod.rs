//! Image transformation operations: cropping and rotation.
//!
//! These are the geometry stages of the editing pipeline. Both consume a
//! source raster by reference and allocate a fresh output buffer with
//! recomputed dimensions; the source is never mutated.
//!
//! # Coordinate System
//!
//! - Crop coordinates are in pixel units relative to the buffer being cropped
//! - Rotation angles are in degrees, positive = clockwise
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::{apply_crop, crop_dimensions, CropArea, MIN_CROP_SIZE};
pub use rotation::{apply_rotate90, apply_rotation, compute_rotated_bounds};
