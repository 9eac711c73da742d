//! squarify core - content-centering image normalization.
//!
//! Takes one image (file, base64 text or byte stream), finds the dark content
//! on light paper, crops to it, resizes it to a target height and centers it
//! on a white square canvas.
//!
//! # Architecture
//!
//! Each call is a pure function of its request; nothing is cached between
//! calls:
//!
//! ```text
//! Bytes → Decode → [Pre-resize] → Binarize → Scan box → Crop → Resize → Canvas → JPEG
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use squarify_core::{ImageSource, NormalizationRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = NormalizationRequest::new(ImageSource::from_path("./scan.png"), 200, 256);
//!     let result = squarify_core::normalize(request)?;
//!     std::fs::write("./scan-square.jpg", result.to_jpeg()?)?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, NormalizeError, NormalizeResult};
pub use output::{NormalizationResult, NormalizationSummary};
pub use pipeline::{Codec, ImageCodec, Normalizer};
pub use types::{
    BitDepth, BoundingBox, ImageSource, NormalizationRequest, Padding, PixelBuffer,
    RequestBuilder,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normalize one image with the default configuration.
pub fn normalize(request: NormalizationRequest) -> NormalizeResult<NormalizationResult> {
    Normalizer::default().normalize(request)
}
