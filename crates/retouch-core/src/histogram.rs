//! Luminance histogram and histogram-adaptive lighting.
//!
//! `auto_even_lighting` is the content-adaptive counterpart to the manual
//! shadow/highlight sliders: instead of a user-supplied strength it derives
//! its shadow and highlight thresholds from the image's own luminance
//! distribution, so the same call does the right thing on a dark scan and
//! on a washed-out one.

use crate::luminance::{luminance, luminance_u8};
use crate::raster::RasterImage;
use crate::tone::map_pixels;

/// Fraction of pixels below the shadow threshold / above the highlight
/// threshold.
const PERCENTILE: f64 = 0.05;

/// Cap on adaptive shadow lightening (40%).
const AUTO_SHADOW_CAP: f32 = 0.4;

/// Cap on adaptive highlight darkening (30%).
const AUTO_HIGHLIGHT_CAP: f32 = 0.3;

/// Luminance histogram for an image (256 bins).
#[derive(Debug, Clone)]
pub struct LuminanceHistogram {
    /// Pixel count per luminance value.
    pub bins: [u32; 256],
}

impl Default for LuminanceHistogram {
    fn default() -> Self {
        Self { bins: [0; 256] }
    }
}

impl LuminanceHistogram {
    /// Create a new empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of pixels counted.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Luminance value at the given lower percentile: scanning buckets
    /// 0..=255, the first value where the cumulative count reaches
    /// `fraction` of all pixels.
    pub fn lower_percentile(&self, fraction: f64) -> u8 {
        let threshold = (self.total() as f64 * fraction).ceil() as u64;
        let mut cumulative = 0u64;
        for (value, &count) in self.bins.iter().enumerate() {
            cumulative += count as u64;
            if cumulative >= threshold {
                return value as u8;
            }
        }
        255
    }

    /// Luminance value at the given upper percentile: scanning buckets
    /// 255..=0, the first value where the cumulative count from the top
    /// reaches `fraction` of all pixels.
    pub fn upper_percentile(&self, fraction: f64) -> u8 {
        let threshold = (self.total() as f64 * fraction).ceil() as u64;
        let mut cumulative = 0u64;
        for value in (0..256usize).rev() {
            cumulative += self.bins[value] as u64;
            if cumulative >= threshold {
                return value as u8;
            }
        }
        0
    }
}

/// Compute the luminance histogram of an image.
///
/// Single pass, O(pixels); luminance is rounded into one of 256 buckets.
pub fn compute_luminance_histogram(image: &RasterImage) -> LuminanceHistogram {
    let mut hist = LuminanceHistogram::new();

    for chunk in image.pixels.chunks_exact(4) {
        let lum = luminance_u8(chunk[0], chunk[1], chunk[2]);
        hist.bins[lum as usize] += 1;
    }

    hist
}

/// Parameter-free shadow/highlight recovery driven by the image's own
/// luminance distribution.
///
/// The shadow threshold is the 5th-percentile luminance, the highlight
/// threshold the 95th. Pixels below the shadow threshold are lightened in
/// proportion to how far below they sit (cap 40%); pixels above the
/// highlight threshold are darkened symmetrically (cap 30%). On a
/// perfectly flat image the thresholds leave no pixel on either side and
/// the output equals the input.
pub fn auto_even_lighting(image: &RasterImage) -> RasterImage {
    if image.is_empty() {
        return image.clone();
    }

    let hist = compute_luminance_histogram(image);
    let shadow_threshold = hist.lower_percentile(PERCENTILE) as f32;
    let highlight_threshold = hist.upper_percentile(PERCENTILE) as f32;

    map_pixels(image, |r, g, b| {
        let lum = luminance(r, g, b);
        let (r, g, b) = (r as f32, g as f32, b as f32);

        if shadow_threshold > 0.0 && lum < shadow_threshold {
            let darkness = 1.0 - lum / shadow_threshold;
            let lighten = darkness * AUTO_SHADOW_CAP;
            return (
                r + (255.0 - r) * lighten,
                g + (255.0 - g) * lighten,
                b + (255.0 - b) * lighten,
            );
        }

        if highlight_threshold < 255.0 && lum > highlight_threshold {
            let brightness = (lum - highlight_threshold) / (255.0 - highlight_threshold);
            let darken = brightness * AUTO_HIGHLIGHT_CAP;
            return (r - r * darken, g - g * darken, b - b * darken);
        }

        (r, g, b)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of_grays(values: &[u8]) -> RasterImage {
        let mut pixels = Vec::with_capacity(values.len() * 4);
        for &v in values {
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
        RasterImage::new(values.len() as u32, 1, pixels).unwrap()
    }

    #[test]
    fn test_histogram_counts() {
        let img = image_of_grays(&[0, 0, 128, 255]);
        let hist = compute_luminance_histogram(&img);

        assert_eq!(hist.bins[0], 2);
        assert_eq!(hist.bins[128], 1);
        assert_eq!(hist.bins[255], 1);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_histogram_empty_image() {
        let img = RasterImage::new(0, 0, vec![]).unwrap();
        let hist = compute_luminance_histogram(&img);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_lower_percentile_on_gradient() {
        // 100 pixels with luminance 0..=99: the 5th percentile is the
        // bucket where cumulative count first reaches 5 pixels
        let values: Vec<u8> = (0u8..100).collect();
        let hist = compute_luminance_histogram(&image_of_grays(&values));
        assert_eq!(hist.lower_percentile(0.05), 4);
    }

    #[test]
    fn test_upper_percentile_on_gradient() {
        let values: Vec<u8> = (0u8..100).collect();
        let hist = compute_luminance_histogram(&image_of_grays(&values));
        assert_eq!(hist.upper_percentile(0.05), 95);
    }

    #[test]
    fn test_percentiles_on_flat_image() {
        let hist = compute_luminance_histogram(&image_of_grays(&[100; 64]));
        // All pixels share one bucket, so both scans stop at it
        assert_eq!(hist.lower_percentile(0.05), 100);
        assert_eq!(hist.upper_percentile(0.05), 100);
    }

    #[test]
    fn test_auto_even_lighting_flat_image_is_identity() {
        let img = image_of_grays(&[137; 50]);
        let result = auto_even_lighting(&img);
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_auto_even_lighting_black_image_is_identity() {
        // Shadow threshold 0 means no pixel can sit below it
        let img = image_of_grays(&[0; 50]);
        let result = auto_even_lighting(&img);
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_auto_even_lighting_white_image_is_identity() {
        let img = image_of_grays(&[255; 50]);
        let result = auto_even_lighting(&img);
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_auto_even_lighting_lifts_deep_shadows() {
        // 100 pixels: 5 at luminance 40 put the shadow threshold at 40,
        // and one crushed pixel at 1 sits below it
        let mut values = vec![128u8; 94];
        values.extend_from_slice(&[40, 40, 40, 40, 40, 1]);
        let img = image_of_grays(&values);

        let result = auto_even_lighting(&img);

        let last = result.pixels.len() - 4;
        assert!(result.pixels[last] > 1, "crushed pixel lifted");
        assert_eq!(result.pixels[0], 128, "midtones untouched");
    }

    #[test]
    fn test_auto_even_lighting_pulls_blown_highlights() {
        // 100 pixels: 5 at luminance 200 put the highlight threshold at
        // 200, and one blown pixel at 254 sits above it
        let mut values = vec![128u8; 94];
        values.extend_from_slice(&[200, 200, 200, 200, 200, 254]);
        let img = image_of_grays(&values);

        let result = auto_even_lighting(&img);

        let last = result.pixels.len() - 4;
        assert!(result.pixels[last] < 254, "blown pixel pulled down");
        assert_eq!(result.pixels[0], 128, "midtones untouched");
    }

    #[test]
    fn test_auto_even_lighting_shadow_math() {
        // threshold = 40, pixel at 10: darkness = 1 - 10/40 = 0.75
        // lighten = 0.75 * 0.4 = 0.3, 10 + 245*0.3 = 83.5 -> 84
        let mut values = vec![128u8; 95];
        values.extend_from_slice(&[40, 40, 40, 40, 10]);
        let img = image_of_grays(&values);

        let result = auto_even_lighting(&img);
        let last = result.pixels.len() - 4;
        assert!((result.pixels[last] as i32 - 84).abs() <= 1);
    }

    #[test]
    fn test_auto_even_lighting_highlight_math() {
        // threshold = 200, pixel at 244: brightness = 44/55 = 0.8
        // darken = 0.8 * 0.3 = 0.24, 244 * 0.76 = 185.44 -> 185
        let mut values = vec![128u8; 95];
        values.extend_from_slice(&[200, 200, 200, 200, 244]);
        let img = image_of_grays(&values);

        let result = auto_even_lighting(&img);
        let last = result.pixels.len() - 4;
        assert!((result.pixels[last] as i32 - 185).abs() <= 1);
    }

    #[test]
    fn test_auto_even_lighting_preserves_dimensions() {
        let img = RasterImage::new(16, 9, vec![100u8; 16 * 9 * 4]).unwrap();
        let result = auto_even_lighting(&img);
        assert_eq!(result.width, 16);
        assert_eq!(result.height, 9);
        assert_eq!(result.pixels.len(), 16 * 9 * 4);
    }
}
