//! Image rotation around the image center.
//!
//! Exact multiples of 90 degrees are remapped pixel-for-pixel. Arbitrary
//! angles use inverse mapping: for each pixel in the output canvas we
//! calculate which source position contributes to it and sample with
//! bilinear interpolation.
//!
//! The output canvas is the bounding box of the rotated source rectangle,
//! so nothing is clipped. Border pixels introduced by the rotation are
//! fully transparent (alpha 0), not black.

use crate::raster::RasterImage;

/// Compute the dimensions of the bounding box for a rotated image.
///
/// For 90/270 degrees the dimensions swap exactly; for 0/180 they are
/// unchanged. Arbitrary angles use the rotated-rectangle bounding box:
/// `new_w = w*|cos| + h*|sin|`, `new_h = w*|sin| + h*|cos|`.
///
/// # Example
///
/// ```ignore
/// let (w, h) = compute_rotated_bounds(100, 50, 90.0);
/// assert_eq!((w, h), (50, 100));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let angle = normalize_angle(angle_degrees);

    if is_near(angle, 0.0) || is_near(angle, 360.0) {
        return (width, height);
    }
    if is_near(angle, 90.0) || is_near(angle, 270.0) {
        return (height, width);
    }
    if is_near(angle, 180.0) {
        return (width, height);
    }

    let angle_rad = angle.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image by an arbitrary angle in degrees (positive = clockwise).
///
/// The angle is normalized to [0, 360). Rotation pivots around the image
/// center, and the canvas expands to the rotated bounding box. Non-finite
/// angles are rejected upstream by the pipeline; this function treats them
/// as zero rotation.
pub fn apply_rotation(image: &RasterImage, angle_degrees: f64) -> RasterImage {
    if !angle_degrees.is_finite() || image.is_empty() {
        return image.clone();
    }

    let angle = normalize_angle(angle_degrees);

    if is_near(angle, 0.0) || is_near(angle, 360.0) {
        return image.clone();
    }
    if is_near(angle, 90.0) {
        return rotate_quarter(image, Quarter::Cw90);
    }
    if is_near(angle, 180.0) {
        return rotate_quarter(image, Quarter::Half);
    }
    if is_near(angle, 270.0) {
        return rotate_quarter(image, Quarter::Ccw90);
    }

    rotate_arbitrary(image, angle)
}

/// Rotate an image by exactly 90 degrees.
///
/// Sugar for `apply_rotation` with +90 (clockwise) or -90 (counter-clockwise).
pub fn apply_rotate90(image: &RasterImage, clockwise: bool) -> RasterImage {
    let angle = if clockwise { 90.0 } else { -90.0 };
    apply_rotation(image, angle)
}

/// Normalize an angle in degrees to the range [0, 360).
fn normalize_angle(angle_degrees: f64) -> f64 {
    angle_degrees.rem_euclid(360.0)
}

fn is_near(angle: f64, target: f64) -> bool {
    (angle - target).abs() < 0.001
}

#[derive(Clone, Copy)]
enum Quarter {
    Cw90,
    Half,
    Ccw90,
}

/// Exact pixel remap for multiples of 90 degrees. No interpolation, no
/// transparent border, dimensions swap exactly for the quarter turns.
fn rotate_quarter(image: &RasterImage, quarter: Quarter) -> RasterImage {
    let (w, h) = (image.width as usize, image.height as usize);
    let (out_w, out_h) = match quarter {
        Quarter::Cw90 | Quarter::Ccw90 => (h, w),
        Quarter::Half => (w, h),
    };

    let mut output = vec![0u8; out_w * out_h * 4];

    for dst_y in 0..out_h {
        for dst_x in 0..out_w {
            let (src_x, src_y) = match quarter {
                Quarter::Cw90 => (dst_y, h - 1 - dst_x),
                Quarter::Half => (w - 1 - dst_x, h - 1 - dst_y),
                Quarter::Ccw90 => (w - 1 - dst_y, dst_x),
            };

            let src_idx = (src_y * w + src_x) * 4;
            let dst_idx = (dst_y * out_w + dst_x) * 4;
            output[dst_idx..dst_idx + 4].copy_from_slice(&image.pixels[src_idx..src_idx + 4]);
        }
    }

    RasterImage {
        width: out_w as u32,
        height: out_h as u32,
        pixels: output,
    }
}

fn rotate_arbitrary(image: &RasterImage, angle_degrees: f64) -> RasterImage {
    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    // Inverse mapping undoes the clockwise rotation, so negate the angle
    let angle_rad = -angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; (dst_w as usize) * (dst_h as usize) * 4];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 - dst_cx;
            let dy = dst_y as f64 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx;
            let src_y = dx * sin + dy * cos + src_cy;

            let pixel = sample_bilinear(image, src_x, src_y);

            // usize arithmetic: u32 would wrap past ~32k x 32k canvases
            let dst_idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 4;
            output[dst_idx..dst_idx + 4].copy_from_slice(&pixel);
        }
    }

    RasterImage {
        width: dst_w,
        height: dst_h,
        pixels: output,
    }
}

/// Get a pixel as [f64; 4] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &RasterImage, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * 4;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation over the 4 nearest pixels.
///
/// Out-of-bounds samples are fully transparent, which is what produces the
/// see-through border around a rotated image.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 0.0 || x >= (w - 1) as f64 || y < 0.0 || y >= (h - 1) as f64 {
        return [0, 0, 0, 0];
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
