//! Codec abstraction between raw bytes and pixel buffers.
//!
//! The normalizer only needs "bytes in, pixels out" and "pixels in, bytes
//! out". [`ImageCodec`] provides both with the `image` crate; other
//! implementations can be swapped in through [`Codec`].

use crate::config::{LimitsConfig, OutputConfig};
use crate::error::NormalizeResult;
use crate::types::PixelBuffer;

use super::decode::{format_to_string, ImageDecoder};
use super::encode::JpegWriter;
use super::validate::Validator;

/// Decoding and encoding of whole images.
pub trait Codec: Send + Sync {
    /// Decode an encoded image payload.
    fn decode(&self, bytes: &[u8]) -> NormalizeResult<PixelBuffer>;

    /// Encode a finished buffer as JPEG.
    fn encode(&self, image: &PixelBuffer) -> NormalizeResult<Vec<u8>>;
}

/// Default codec backed by the `image` crate.
#[derive(Debug, Clone)]
pub struct ImageCodec {
    decoder: ImageDecoder,
    writer: JpegWriter,
}

impl ImageCodec {
    pub fn new(limits: LimitsConfig, output: &OutputConfig) -> Self {
        Self {
            decoder: ImageDecoder::new(Validator::new(limits)),
            writer: JpegWriter::new(output.jpeg_quality),
        }
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(LimitsConfig::default(), &OutputConfig::default())
    }
}

impl Codec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> NormalizeResult<PixelBuffer> {
        let decoded = self.decoder.decode(bytes)?;
        tracing::trace!(
            "  Decoded {} {}x{} ({} channel(s), {}-bit)",
            format_to_string(decoded.format),
            decoded.buffer.width(),
            decoded.buffer.height(),
            decoded.buffer.channels(),
            decoded.buffer.bit_depth().bits()
        );
        Ok(decoded.buffer)
    }

    fn encode(&self, image: &PixelBuffer) -> NormalizeResult<Vec<u8>> {
        self.writer.encode(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView};

    #[test]
    fn test_codec_round_trips_dimensions() {
        let codec = ImageCodec::default();
        let bytes = codec
            .encode(&PixelBuffer::new(DynamicImage::new_rgb8(21, 13)))
            .unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.as_image().dimensions(), (21, 13));
    }

    #[test]
    fn test_codec_is_object_safe() {
        let codec: Box<dyn Codec> = Box::new(ImageCodec::default());
        assert!(codec.decode(b"nope").is_err());
    }
}
