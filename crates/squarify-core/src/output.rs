//! The value returned by a successful normalization.
//!
//! Holds the finished canvas plus what was detected along the way. Encoded
//! forms (JPEG bytes, base64, a readable stream) are produced on demand.

use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use crate::error::NormalizeResult;
use crate::pipeline::codec::Codec;
use crate::pipeline::encode::to_base64;
use crate::types::{BoundingBox, Padding, PixelBuffer};

/// Finished canvas and detection details for one request.
pub struct NormalizationResult {
    image: PixelBuffer,
    bounding_box: BoundingBox,
    resized_width: u32,
    resized_height: u32,
    padding: Padding,
    codec: Arc<dyn Codec>,
}

/// Serializable description of a result, without pixel data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationSummary {
    pub bounding_box: BoundingBox,
    pub resized_width: u32,
    pub resized_height: u32,
    pub padding: Padding,
    pub canvas_size: u32,
    pub channels: u8,
    pub bit_depth: u8,
}

impl NormalizationResult {
    pub(crate) fn new(
        image: PixelBuffer,
        bounding_box: BoundingBox,
        resized: (u32, u32),
        padding: Padding,
        codec: Arc<dyn Codec>,
    ) -> Self {
        Self {
            image,
            bounding_box,
            resized_width: resized.0,
            resized_height: resized.1,
            padding,
            codec,
        }
    }

    /// The square canvas.
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    pub fn into_image(self) -> PixelBuffer {
        self.image
    }

    /// Content box detected in the (optionally pre-resized) source.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Size of the content region after the aspect-preserving resize.
    pub fn resized_dimensions(&self) -> (u32, u32) {
        (self.resized_width, self.resized_height)
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Encode the canvas as JPEG.
    pub fn to_jpeg(&self) -> NormalizeResult<Vec<u8>> {
        self.codec.encode(&self.image)
    }

    /// JPEG bytes as a standard base64 string.
    pub fn to_base64(&self) -> NormalizeResult<String> {
        Ok(to_base64(&self.to_jpeg()?))
    }

    /// JPEG bytes behind a reader positioned at offset 0.
    pub fn to_stream(&self) -> NormalizeResult<Cursor<Vec<u8>>> {
        Ok(Cursor::new(self.to_jpeg()?))
    }

    pub fn summary(&self) -> NormalizationSummary {
        NormalizationSummary {
            bounding_box: self.bounding_box,
            resized_width: self.resized_width,
            resized_height: self.resized_height,
            padding: self.padding,
            canvas_size: self.image.width(),
            channels: self.image.channels(),
            bit_depth: self.image.bit_depth().bits(),
        }
    }
}

impl fmt::Debug for NormalizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizationResult")
            .field("canvas", &(self.image.width(), self.image.height()))
            .field("bounding_box", &self.bounding_box)
            .field("resized", &(self.resized_width, self.resized_height))
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}
