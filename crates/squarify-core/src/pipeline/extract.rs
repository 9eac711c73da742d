//! Cropping the source image to the detected content box.

use crate::error::{NormalizeError, NormalizeResult};
use crate::types::{BoundingBox, PixelBuffer};

/// Crops the original (not binarized) image.
pub struct RegionExtractor;

impl RegionExtractor {
    /// Copy the pixels inside `bbox` into a new buffer.
    ///
    /// The box is clamped to the image first; a box with nothing left inside
    /// the image is an `InvalidRegion`.
    pub fn extract(image: &PixelBuffer, bbox: &BoundingBox) -> NormalizeResult<PixelBuffer> {
        let clamped = bbox.clamp_to(image.width(), image.height()).ok_or_else(|| {
            NormalizeError::InvalidRegion(format!(
                "box {:?} lies outside the {}x{} image",
                bbox,
                image.width(),
                image.height()
            ))
        })?;

        let region = image.as_image().crop_imm(
            clamped.left(),
            clamped.top(),
            clamped.width(),
            clamped.height(),
        );
        if region.width() == 0 || region.height() == 0 {
            return Err(NormalizeError::InvalidRegion(format!(
                "box {:?} produced an empty crop",
                clamped
            )));
        }
        Ok(PixelBuffer::new(region))
    }
}
