//! Pipeline orchestration - wires together all normalization stages.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, NormalizeConfig};
use crate::error::{NormalizeError, NormalizeResult};
use crate::output::NormalizationResult;
use crate::types::{NormalizationRequest, PixelBuffer, RequestBuilder};

use super::bbox::BoundingBoxScanner;
use super::binarize::Binarizer;
use super::canvas::CanvasComposer;
use super::codec::{Codec, ImageCodec};
use super::extract::RegionExtractor;
use super::resize::AspectResizer;
use super::source::SourceReader;
use super::validate::Validator;

/// Runs requests through decode, detection, crop, resize and canvas stages.
///
/// Holds only immutable settings and a shared codec; every buffer lives on
/// the stack of a single `normalize` call, so one instance can serve
/// concurrent requests.
pub struct Normalizer {
    reader: SourceReader,
    codec: Arc<dyn Codec>,
    binarizer: Binarizer,
    scanner: BoundingBoxScanner,
    defaults: NormalizeConfig,
    max_dimension: u32,
}

impl Normalizer {
    /// Create a normalizer using the `image`-backed codec.
    pub fn new(config: &Config) -> Self {
        let codec = ImageCodec::new(config.limits.clone(), &config.output);
        Self::with_codec(config, Arc::new(codec))
    }

    /// Create a normalizer with a custom codec.
    pub fn with_codec(config: &Config, codec: Arc<dyn Codec>) -> Self {
        Self {
            reader: SourceReader::new(Validator::new(config.limits.clone())),
            codec,
            binarizer: Binarizer::new(config.normalize.threshold),
            scanner: BoundingBoxScanner::new(config.normalize.scan_workers),
            defaults: config.normalize.clone(),
            max_dimension: config.limits.max_image_dimension,
        }
    }

    /// A request builder pre-filled with the configured geometry.
    pub fn request(&self) -> RequestBuilder {
        NormalizationRequest::builder()
            .target_height(self.defaults.target_height)
            .finish_size(self.defaults.finish_size)
            .pre_resize(self.defaults.pre_resize)
    }

    /// Normalize one image.
    pub fn normalize(&self, request: NormalizationRequest) -> NormalizeResult<NormalizationResult> {
        let start = Instant::now();
        request.check_geometry()?;
        let NormalizationRequest {
            source,
            target_height,
            finish_size,
            pre_resize,
        } = request;
        self.check_output_dimension("target_height", target_height)?;
        self.check_output_dimension("finish_size", finish_size)?;
        tracing::debug!("Normalizing {:?}", source);

        // Read + decode
        let bytes = self.reader.read(source)?;
        let decoded = self.codec.decode(&bytes)?;
        drop(bytes);
        tracing::trace!("  Decode: {:?}", start.elapsed());

        let decoded = if pre_resize && decoded.height() != target_height {
            self.check_resized_width(&decoded, target_height)?;
            AspectResizer::resize(&decoded, target_height)?
        } else {
            decoded
        };

        // Detect
        let detect_start = Instant::now();
        let mask = self.binarizer.binarize(&decoded);
        let bbox = self.scanner.scan(&mask).ok_or_else(|| {
            NormalizeError::InvalidRegion(format!(
                "no foreground pixels below threshold {} in {}x{} image",
                self.binarizer.threshold(),
                decoded.width(),
                decoded.height()
            ))
        })?;
        drop(mask);
        tracing::trace!("  Detect: {:?} -> {:?}", detect_start.elapsed(), bbox);

        // Crop + resize + compose
        let region = RegionExtractor::extract(&decoded, &bbox)?;
        drop(decoded);
        self.check_resized_width(&region, target_height)?;
        let resized = AspectResizer::resize(&region, target_height)?;
        drop(region);
        let composed = CanvasComposer::compose(&resized, finish_size);

        tracing::debug!(
            "Normalized in {:?}: content {}x{} -> {}x{} on {}x{} canvas",
            start.elapsed(),
            bbox.width(),
            bbox.height(),
            resized.width(),
            resized.height(),
            finish_size,
            finish_size
        );

        Ok(NormalizationResult::new(
            composed.canvas,
            bbox,
            (resized.width(), resized.height()),
            composed.padding,
            Arc::clone(&self.codec),
        ))
    }
}

impl Normalizer {
    /// Output geometry shares the decoded-image dimension limit; larger
    /// canvases would fail allocation inside the resampler.
    fn check_output_dimension(&self, name: &str, value: u32) -> NormalizeResult<()> {
        if value > self.max_dimension {
            return Err(NormalizeError::InvalidInput(format!(
                "{} {} exceeds the {}px dimension limit",
                name, value, self.max_dimension
            )));
        }
        Ok(())
    }

    fn check_resized_width(&self, image: &PixelBuffer, target_height: u32) -> NormalizeResult<()> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(());
        }
        let width = AspectResizer::target_width(image.width(), image.height(), target_height);
        self.check_output_dimension("resized width", width)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, ImageSource, Padding};
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn centered_square() -> Vec<u8> {
        png_bytes(RgbImage::from_fn(300, 300, |x, y| {
            if (100..200).contains(&x) && (100..200).contains(&y) {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }))
    }

    #[test]
    fn test_centered_square_scenario() {
        let request =
            NormalizationRequest::new(ImageSource::stream(Cursor::new(centered_square())), 50, 100);
        let result = Normalizer::default().normalize(request).unwrap();

        assert_eq!(result.bounding_box(), BoundingBox::new(100, 100, 199, 199).unwrap());
        assert_eq!(result.resized_dimensions(), (50, 50));
        assert_eq!(result.padding(), Padding { x: 25, y: 25 });

        let canvas = result.image().as_image();
        assert_eq!(canvas.dimensions(), (100, 100));
        assert_eq!(canvas.get_pixel(10, 10).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(26, 73).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(80, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_all_white_is_invalid_region() {
        let bytes = png_bytes(RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])));
        let request = NormalizationRequest::new(ImageSource::Base64(BASE64.encode(bytes)), 50, 100);
        let err = Normalizer::default().normalize(request).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidRegion(_)));
    }

    #[test]
    fn test_malformed_base64_is_decode_error() {
        let request =
            NormalizationRequest::new(ImageSource::Base64("@@not-base64@@".into()), 50, 100);
        let err = Normalizer::default().normalize(request).unwrap_err();
        assert!(matches!(err, NormalizeError::Decode { .. }));
    }

    #[test]
    fn test_undecodable_bytes_are_decode_error() {
        let request = NormalizationRequest::new(
            ImageSource::Base64(BASE64.encode(b"plain text, not pixels")),
            50,
            100,
        );
        let err = Normalizer::default().normalize(request).unwrap_err();
        assert!(matches!(err, NormalizeError::Decode { .. }));
    }

    #[test]
    fn test_small_canvas_clips_region() {
        let source = ImageSource::stream(Cursor::new(centered_square()));
        let request = NormalizationRequest::new(source, 150, 100);
        let result = Normalizer::default().normalize(request).unwrap();
        assert_eq!(result.resized_dimensions(), (150, 150));
        assert_eq!(result.padding(), Padding { x: 0, y: 0 });
        assert_eq!(result.image().as_image().dimensions(), (100, 100));
        assert_eq!(result.image().as_image().get_pixel(99, 99).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_wide_content_keeps_aspect() {
        let bytes = png_bytes(RgbImage::from_fn(400, 200, |x, y| {
            if (50..350).contains(&x) && (80..180).contains(&y) {
                Rgb([20, 20, 20])
            } else {
                Rgb([240, 240, 240])
            }
        }));
        let request = NormalizationRequest::new(ImageSource::stream(Cursor::new(bytes)), 40, 128);
        let result = Normalizer::default().normalize(request).unwrap();

        assert_eq!(result.bounding_box(), BoundingBox::new(50, 80, 349, 179).unwrap());
        assert_eq!(result.resized_dimensions(), (120, 40));
        assert_eq!(result.padding(), Padding { x: 4, y: 44 });
        assert_eq!(result.image().width(), 128);
        assert_eq!(result.image().height(), 128);
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scan.png"), centered_square()).unwrap();

        let normalizer = Normalizer::default();
        let request = normalizer
            .request()
            .file(dir.path(), "scan.png")
            .target_height(50)
            .finish_size(100)
            .build()
            .unwrap();
        let result = normalizer.normalize(request).unwrap();
        assert_eq!(result.image().width(), 100);
    }

    #[test]
    fn test_request_uses_configured_defaults() {
        let mut config = Config::default();
        config.normalize.target_height = 64;
        config.normalize.finish_size = 80;
        let normalizer = Normalizer::new(&config);

        let request = normalizer
            .request()
            .stream(Cursor::new(centered_square()))
            .build()
            .unwrap();
        assert_eq!(request.target_height, 64);
        assert_eq!(request.finish_size, 80);

        let result = normalizer.normalize(request).unwrap();
        assert_eq!(result.resized_dimensions(), (64, 64));
        assert_eq!(result.padding(), Padding { x: 8, y: 8 });
    }

    #[test]
    fn test_zero_geometry_is_invalid_input() {
        let request =
            NormalizationRequest::new(ImageSource::stream(Cursor::new(centered_square())), 50, 0);
        let err = Normalizer::default().normalize(request).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(_)));
    }

    #[test]
    fn test_oversized_finish_size_is_invalid_input() {
        let bytes = png_bytes(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
        let request =
            NormalizationRequest::new(ImageSource::stream(Cursor::new(bytes)), 4, u32::MAX);
        let err = Normalizer::default().normalize(request).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(ref m) if m.contains("finish_size")));
    }

    #[test]
    fn test_oversized_target_height_is_invalid_input() {
        let bytes = png_bytes(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
        let request =
            NormalizationRequest::new(ImageSource::stream(Cursor::new(bytes)), u32::MAX, 100);
        let err = Normalizer::default().normalize(request).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(ref m) if m.contains("target_height")));
    }

    #[test]
    fn test_oversized_resized_width_is_invalid_input() {
        // A one-pixel-high line scales 300px wide to 3000px at height 10.
        let bytes = png_bytes(RgbImage::from_fn(300, 20, |_, y| {
            if y == 10 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }));
        let mut config = Config::default();
        config.limits.max_image_dimension = 1000;
        let request = NormalizationRequest::new(ImageSource::stream(Cursor::new(bytes)), 10, 64);
        let err = Normalizer::new(&config).normalize(request).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(ref m) if m.contains("resized width")));
    }

    #[test]
    fn test_output_geometry_at_limit_is_accepted() {
        let mut config = Config::default();
        config.limits.max_image_dimension = 300;
        let source = ImageSource::stream(Cursor::new(centered_square()));
        let request = NormalizationRequest::new(source, 300, 300);
        let result = Normalizer::new(&config).normalize(request).unwrap();
        assert_eq!(result.resized_dimensions(), (300, 300));
    }

    #[test]
    fn test_pre_resize_detects_on_scaled_image() {
        let request =
            NormalizationRequest::new(ImageSource::stream(Cursor::new(centered_square())), 150, 200)
                .with_pre_resize(true);
        let result = Normalizer::default().normalize(request).unwrap();

        // 300px source scaled to 150px: the square spans roughly 50..100.
        let bbox = result.bounding_box();
        assert!((49..=51).contains(&bbox.left()));
        assert!((98..=100).contains(&bbox.right()));
        assert_eq!(result.resized_dimensions().1, 150);
        assert_eq!(result.image().width(), 200);
    }

    #[test]
    fn test_threshold_is_configurable() {
        // Mid-gray content: foreground at 200, background at 100.
        let bytes = png_bytes(RgbImage::from_fn(20, 20, |x, y| {
            if (5..10).contains(&x) && (5..10).contains(&y) {
                Rgb([150, 150, 150])
            } else {
                Rgb([255, 255, 255])
            }
        }));

        let found = Normalizer::default().normalize(NormalizationRequest::new(
            ImageSource::stream(Cursor::new(bytes.clone())),
            10,
            20,
        ));
        assert!(found.is_ok());

        let mut config = Config::default();
        config.normalize.threshold = 100;
        let missing = Normalizer::new(&config).normalize(NormalizationRequest::new(
            ImageSource::stream(Cursor::new(bytes)),
            10,
            20,
        ));
        assert!(matches!(missing, Err(NormalizeError::InvalidRegion(_))));
    }

    #[test]
    fn test_normalizer_is_shareable_across_threads() {
        let normalizer = Arc::new(Normalizer::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let normalizer = Arc::clone(&normalizer);
                std::thread::spawn(move || {
                    let request = NormalizationRequest::new(
                        ImageSource::stream(Cursor::new(centered_square())),
                        50,
                        100,
                    );
                    normalizer.normalize(request).map(|r| r.summary())
                })
            })
            .collect();

        let summaries: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        assert!(summaries.windows(2).all(|w| w[0] == w[1]));
    }

    struct GrayCodec;

    impl Codec for GrayCodec {
        fn decode(&self, _bytes: &[u8]) -> NormalizeResult<PixelBuffer> {
            let img =
                image::GrayImage::from_fn(8, 4, |x, _| image::Luma([if x < 2 { 0 } else { 255 }]));
            Ok(PixelBuffer::new(DynamicImage::ImageLuma8(img)))
        }

        fn encode(&self, image: &PixelBuffer) -> NormalizeResult<Vec<u8>> {
            Ok(image.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_custom_codec() {
        let normalizer = Normalizer::with_codec(&Config::default(), Arc::new(GrayCodec));
        let request = NormalizationRequest::new(ImageSource::Base64("AAAA".into()), 4, 6);
        let result = normalizer.normalize(request).unwrap();

        assert_eq!(result.bounding_box(), BoundingBox::new(0, 0, 1, 3).unwrap());
        assert_eq!(result.resized_dimensions(), (2, 4));
        assert_eq!(result.image().channels(), 1);
        assert_eq!(result.to_jpeg().unwrap().len(), 36);
    }
}
