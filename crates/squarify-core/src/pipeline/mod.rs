//! Normalization pipeline components.
//!
//! Stages, in the order a request passes through them:
//! - **source**: Read file, base64 or stream sources into bytes
//! - **validate**: Size limits and magic-byte checks
//! - **codec** / **decode** / **encode**: Bytes to pixels and back (JPEG)
//! - **binarize**: Luma conversion and fixed-threshold mask
//! - **bbox**: Parallel foreground bounding-box scan
//! - **extract**: Crop the original image to the box
//! - **resize**: Aspect-preserving resize to the target height
//! - **canvas**: Center on a white square canvas
//! - **processor**: Orchestrates the full pipeline

pub mod bbox;
pub mod binarize;
pub mod canvas;
pub mod codec;
pub mod decode;
pub mod encode;
pub mod extract;
pub mod processor;
pub mod resize;
pub mod source;
pub mod validate;

// Re-exports for convenient access
pub use bbox::BoundingBoxScanner;
pub use binarize::{Binarizer, BinaryMask};
pub use canvas::{CanvasComposer, ComposedCanvas};
pub use codec::{Codec, ImageCodec};
pub use decode::{DecodedImage, ImageDecoder};
pub use encode::JpegWriter;
pub use extract::RegionExtractor;
pub use processor::Normalizer;
pub use resize::AspectResizer;
pub use source::SourceReader;
pub use validate::Validator;
