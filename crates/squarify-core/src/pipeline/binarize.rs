//! Fixed-threshold binarization into a foreground/background mask.

use image::GrayImage;

use super::encode::flatten_onto_white;
use crate::types::PixelBuffer;

/// Mask value for content (ink) pixels.
pub const FOREGROUND: u8 = 0;

/// Mask value for paper pixels.
pub const BACKGROUND: u8 = 255;

/// Two-valued mask derived from a [`PixelBuffer`]. Every sample is either
/// [`FOREGROUND`] or [`BACKGROUND`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    mask: GrayImage,
}

impl BinaryMask {
    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y).0[0] == FOREGROUND
    }

    /// Row-major samples, `width` per row.
    pub fn as_raw(&self) -> &[u8] {
        self.mask.as_raw()
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.mask.as_raw().iter().filter(|&&p| p == FOREGROUND).count()
    }
}

/// Converts images to luma and thresholds them.
pub struct Binarizer {
    threshold: u8,
}

impl Binarizer {
    /// Create a binarizer. Gray values `>= threshold` become background.
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Produce the mask for `image`. The input is left untouched.
    ///
    /// Transparent pixels are judged as they appear once flattened onto
    /// white, the same way the JPEG output renders them.
    pub fn binarize(&self, image: &PixelBuffer) -> BinaryMask {
        let source = image.as_image();
        let mut mask = if source.color().has_alpha() {
            image::imageops::grayscale(&flatten_onto_white(&source.to_rgba8()))
        } else {
            source.to_luma8()
        };
        for pixel in mask.pixels_mut() {
            pixel.0[0] = if pixel.0[0] >= self.threshold {
                BACKGROUND
            } else {
                FOREGROUND
            };
        }
        BinaryMask { mask }
    }
}
