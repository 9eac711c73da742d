//! Core data types for the normalization pipeline.
//!
//! Requests describe one image source plus the target geometry; buffers and
//! boxes are the values handed from one stage to the next.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{NormalizeError, NormalizeResult};

/// Sample depth of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    /// Bits per channel sample.
    pub fn bits(self) -> u8 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }
}

/// Decoded pixel data.
///
/// Always one of six layouts: gray, RGB or RGBA at 8 or 16 bits per sample.
/// Other decoder outputs are converted on construction (gray+alpha becomes
/// RGBA, float samples become 8-bit).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: DynamicImage,
}

impl PixelBuffer {
    /// Wrap a decoded image, converting it to a supported layout.
    pub fn new(image: DynamicImage) -> Self {
        let image = match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_) => image,
            DynamicImage::ImageLumaA8(_) => DynamicImage::ImageRgba8(image.to_rgba8()),
            DynamicImage::ImageLumaA16(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of channels: 1, 3 or 4.
    pub fn channels(&self) -> u8 {
        self.image.color().channel_count()
    }

    pub fn bit_depth(&self) -> BitDepth {
        match self.image {
            DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_) => BitDepth::Sixteen,
            _ => BitDepth::Eight,
        }
    }

    /// Raw sample bytes in row-major order (native endianness for 16-bit).
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_bytes()
    }

    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

impl From<DynamicImage> for PixelBuffer {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// Axis-aligned rectangle with inclusive pixel coordinates.
///
/// Construction guarantees `left <= right` and `top <= bottom`, so width and
/// height are always at least 1. "No content" is expressed as
/// `Option::<BoundingBox>::None`, never as a sentinel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    top: u32,
    left: u32,
    bottom: u32,
    right: u32,
}

impl BoundingBox {
    /// Create a box from inclusive edges. Returns `None` if the edges cross.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Option<Self> {
        (left <= right && top <= bottom).then_some(Self {
            top,
            left,
            bottom,
            right,
        })
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn bottom(&self) -> u32 {
        self.bottom
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Whether the pixel at (x, y) lies inside the box.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }

    /// Clamp the box to a `width × height` buffer.
    ///
    /// Returns `None` when nothing of the box remains inside the buffer.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || self.left >= width || self.top >= height {
            return None;
        }
        Self::new(
            self.left,
            self.top,
            self.right.min(width - 1),
            self.bottom.min(height - 1),
        )
    }
}

/// Border placed around the resized region on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    /// Columns left of the region
    pub x: u32,
    /// Rows above the region
    pub y: u32,
}

impl Padding {
    /// Padding that centers a `width × height` region on a square canvas.
    ///
    /// Clamps to zero when the region is larger than the canvas.
    pub fn centered(finish_size: u32, width: u32, height: u32) -> Self {
        Self {
            x: finish_size.saturating_sub(width) / 2,
            y: finish_size.saturating_sub(height) / 2,
        }
    }
}

/// Where the image bytes of a request come from.
pub enum ImageSource {
    /// A file `file_name` inside directory `dir`
    File { dir: PathBuf, file_name: String },
    /// Base64-encoded image bytes, optionally with a `data:` URI prefix
    Base64(String),
    /// Any reader; consumed to the end
    Stream(Box<dyn Read + Send>),
}

impl ImageSource {
    /// Build a `File` source from a full path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let (dir, file_name) = split_path(path.as_ref());
        Self::File { dir, file_name }
    }

    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }

    /// Short name used in logs and decode errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::File { .. } => "file",
            ImageSource::Base64(_) => "base64",
            ImageSource::Stream(_) => "stream",
        }
    }
}

fn split_path(path: &Path) -> (PathBuf, String) {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (dir, file_name)
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File { dir, file_name } => f
                .debug_struct("File")
                .field("dir", dir)
                .field("file_name", file_name)
                .finish(),
            ImageSource::Base64(text) => f
                .debug_tuple("Base64")
                .field(&format_args!("<{} chars>", text.len()))
                .finish(),
            ImageSource::Stream(_) => f.debug_tuple("Stream").field(&"<reader>").finish(),
        }
    }
}

/// One normalization job: a single source plus the target geometry.
#[derive(Debug)]
pub struct NormalizationRequest {
    pub source: ImageSource,

    /// Height of the content region after resizing
    pub target_height: u32,

    /// Side length of the square output canvas
    pub finish_size: u32,

    /// Resize the decoded image to `target_height` before detection
    pub pre_resize: bool,
}

impl NormalizationRequest {
    pub fn new(source: ImageSource, target_height: u32, finish_size: u32) -> Self {
        Self {
            source,
            target_height,
            finish_size,
            pre_resize: false,
        }
    }

    pub fn with_pre_resize(mut self, pre_resize: bool) -> Self {
        self.pre_resize = pre_resize;
        self
    }

    /// Start a request from loosely supplied parts.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Reject zero sizes before any work is done.
    pub(crate) fn check_geometry(&self) -> NormalizeResult<()> {
        if self.target_height == 0 {
            return Err(NormalizeError::InvalidInput(
                "target_height must be > 0".into(),
            ));
        }
        if self.finish_size == 0 {
            return Err(NormalizeError::InvalidInput("finish_size must be > 0".into()));
        }
        Ok(())
    }
}

/// Collects request parts from callers that may set any source field.
///
/// `build` enforces that exactly one source was supplied.
#[derive(Default)]
pub struct RequestBuilder {
    file: Option<(PathBuf, String)>,
    base64: Option<String>,
    stream: Option<Box<dyn Read + Send>>,
    target_height: Option<u32>,
    finish_size: Option<u32>,
    pre_resize: bool,
}

impl RequestBuilder {
    pub fn file(mut self, dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        self.file = Some((dir.into(), file_name.into()));
        self
    }

    /// Shorthand for [`file`](Self::file) from a full path.
    pub fn path(self, path: impl AsRef<Path>) -> Self {
        let (dir, file_name) = split_path(path.as_ref());
        self.file(dir, file_name)
    }

    pub fn base64(mut self, text: impl Into<String>) -> Self {
        self.base64 = Some(text.into());
        self
    }

    pub fn stream(mut self, reader: impl Read + Send + 'static) -> Self {
        self.stream = Some(Box::new(reader));
        self
    }

    pub fn target_height(mut self, target_height: u32) -> Self {
        self.target_height = Some(target_height);
        self
    }

    pub fn finish_size(mut self, finish_size: u32) -> Self {
        self.finish_size = Some(finish_size);
        self
    }

    pub fn pre_resize(mut self, pre_resize: bool) -> Self {
        self.pre_resize = pre_resize;
        self
    }

    pub fn build(self) -> NormalizeResult<NormalizationRequest> {
        let supplied = [
            self.file.is_some(),
            self.base64.is_some(),
            self.stream.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();

        let source = match (self.file, self.base64, self.stream) {
            (Some((dir, file_name)), None, None) => ImageSource::File { dir, file_name },
            (None, Some(text), None) => ImageSource::Base64(text),
            (None, None, Some(reader)) => ImageSource::Stream(reader),
            _ if supplied == 0 => {
                return Err(NormalizeError::InvalidInput(
                    "no image source supplied (expected file, base64 or stream)".into(),
                ))
            }
            _ => {
                return Err(NormalizeError::InvalidInput(format!(
                    "{} image sources supplied, expected exactly one",
                    supplied
                )))
            }
        };

        let target_height = self
            .target_height
            .ok_or_else(|| NormalizeError::InvalidInput("target_height is required".into()))?;
        let finish_size = self
            .finish_size
            .ok_or_else(|| NormalizeError::InvalidInput("finish_size is required".into()))?;

        let request = NormalizationRequest::new(source, target_height, finish_size)
            .with_pre_resize(self.pre_resize);
        request.check_geometry()?;
        Ok(request)
    }
}
