//! The RGBA raster buffer every pipeline stage reads and produces.

use thiserror::Error;

/// Error raised when a pixel buffer does not match its declared dimensions.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The buffer length does not equal width * height * 4.
    #[error("Pixel buffer shape mismatch: expected {expected} bytes (width * height * 4), got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// An owned RGBA image with explicit dimensions.
///
/// Pixel data is row-major, 4 bytes per pixel (R, G, B, A). The length
/// invariant `pixels.len() == width * height * 4` is checked once at
/// construction; every transform in this crate allocates a fresh output
/// buffer satisfying it, so operations never need to re-validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a new RasterImage, validating the buffer shape.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(RasterError::ShapeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a RasterImage from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an `image::RgbaImage` for codec work.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
