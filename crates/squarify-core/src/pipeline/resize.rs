//! Aspect-preserving resize to a target height.

use image::imageops::FilterType;

use crate::error::{NormalizeError, NormalizeResult};
use crate::types::PixelBuffer;

/// Linear interpolation, matching a bilinear resample.
const FILTER: FilterType = FilterType::Triangle;

/// Resizes a region to a fixed height, scaling the width by the region's own
/// aspect ratio.
pub struct AspectResizer;

impl AspectResizer {
    /// Width that keeps `width / height` when the height becomes
    /// `target_height`. Never below 1.
    pub fn target_width(width: u32, height: u32, target_height: u32) -> u32 {
        let scaled = (f64::from(target_height) * f64::from(width) / f64::from(height)).round();
        (scaled as u32).max(1)
    }

    pub fn resize(region: &PixelBuffer, target_height: u32) -> NormalizeResult<PixelBuffer> {
        if target_height == 0 {
            return Err(NormalizeError::InvalidInput(
                "target_height must be > 0".into(),
            ));
        }
        if region.width() == 0 || region.height() == 0 {
            return Err(NormalizeError::InvalidRegion(format!(
                "cannot resize a {}x{} region",
                region.width(),
                region.height()
            )));
        }

        let target_width = Self::target_width(region.width(), region.height(), target_height);
        if (target_width, target_height) == (region.width(), region.height()) {
            return Ok(region.clone());
        }

        let resized = region
            .as_image()
            .resize_exact(target_width, target_height, FILTER);
        Ok(PixelBuffer::new(resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn test_target_width_rounds() {
        assert_eq!(AspectResizer::target_width(100, 100, 50), 50);
        assert_eq!(AspectResizer::target_width(3, 2, 5), 8); // 7.5 rounds up
        assert_eq!(AspectResizer::target_width(10, 3, 10), 33);
    }

    #[test]
    fn test_target_width_never_zero() {
        assert_eq!(AspectResizer::target_width(1, 1000, 10), 1);
    }

    #[test]
    fn test_resize_exact_dimensions() {
        let region = PixelBuffer::new(DynamicImage::new_rgb8(120, 40));
        let resized = AspectResizer::resize(&region, 20).unwrap();
        assert_eq!((resized.width(), resized.height()), (60, 20));
        assert_eq!(resized.channels(), 3);
    }

    #[test]
    fn test_resize_preserves_aspect_within_a_pixel() {
        for (w, h, target) in [(37, 91, 50), (640, 480, 123), (5, 3, 200), (999, 17, 64)] {
            let region = PixelBuffer::new(DynamicImage::new_rgb8(w, h));
            let resized = AspectResizer::resize(&region, target).unwrap();
            let expected = f64::from(target) * f64::from(w) / f64::from(h);
            assert!((f64::from(resized.width()) - expected).abs() <= 1.0);
            assert_eq!(resized.height(), target);
        }
    }

    #[test]
    fn test_resize_upscales() {
        let region = PixelBuffer::new(DynamicImage::new_luma16(4, 2));
        let resized = AspectResizer::resize(&region, 10).unwrap();
        assert_eq!((resized.width(), resized.height()), (20, 10));
        assert_eq!(resized.bit_depth(), region.bit_depth());
    }

    #[test]
    fn test_resize_rejects_zero_target() {
        let region = PixelBuffer::new(DynamicImage::new_rgb8(4, 4));
        let err = AspectResizer::resize(&region, 0).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(_)));
    }
}
