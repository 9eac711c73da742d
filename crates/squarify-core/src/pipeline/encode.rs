//! JPEG encoding of finished canvases.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use std::borrow::Cow;
use std::io::Cursor;

use crate::error::{NormalizeError, NormalizeResult};
use crate::types::PixelBuffer;

/// Encodes pixel buffers as JPEG.
#[derive(Debug, Clone)]
pub struct JpegWriter {
    quality: u8,
}

impl JpegWriter {
    /// Create a writer with the given quality (clamped to 1-100).
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode to JPEG bytes.
    ///
    /// JPEG has no alpha and no 16-bit samples: alpha is composited onto
    /// white and 16-bit samples are scaled down to 8 bits.
    pub fn encode(&self, image: &PixelBuffer) -> NormalizeResult<Vec<u8>> {
        let ready = jpeg_ready(image.as_image());

        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        ready
            .write_with_encoder(encoder)
            .map_err(|e| NormalizeError::Encode(e.to_string()))?;

        Ok(buffer.into_inner())
    }
}

/// Base64 (standard alphabet, padded) of encoded bytes.
pub fn to_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

fn jpeg_ready(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(image),
        DynamicImage::ImageLuma16(_) => Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8())),
        DynamicImage::ImageRgba8(buf) => {
            Cow::Owned(DynamicImage::ImageRgb8(flatten_onto_white(buf)))
        }
        other if other.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgb8(
            flatten_onto_white(&other.to_rgba8()),
        )),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}

/// Composite straight alpha over opaque white.
pub(crate) fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
