//! Image decoding with format detection and validation.

use image::{GenericImageView, ImageFormat};
use std::io::Cursor;

use super::validate::Validator;
use crate::error::{NormalizeError, NormalizeResult};
use crate::types::PixelBuffer;

/// Image decoder with configurable limits.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    validator: Validator,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded pixels
    pub buffer: PixelBuffer,
    /// Format detected from the payload
    pub format: ImageFormat,
}

impl ImageDecoder {
    /// Create a new decoder enforcing the given validator's limits.
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }

    /// Decode an in-memory payload. The format is sniffed from content only.
    pub fn decode(&self, bytes: &[u8]) -> NormalizeResult<DecodedImage> {
        self.validator.validate_payload(bytes)?;

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| {
                NormalizeError::decode("image", format!("cannot detect image format: {}", e))
            })?;
        let format = reader
            .format()
            .ok_or_else(|| NormalizeError::decode("image", "unsupported image format"))?;
        let image = reader
            .decode()
            .map_err(|e| NormalizeError::decode("image", e.to_string()))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(NormalizeError::decode(
                "image",
                format!("decoded image has no pixels ({}x{})", width, height),
            ));
        }
        self.validator.validate_dimensions(width, height)?;

        Ok(DecodedImage {
            buffer: PixelBuffer::new(image),
            format,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        ImageFormat::Pnm => "pnm".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        _ => "unknown".to_string(),
    }
}
