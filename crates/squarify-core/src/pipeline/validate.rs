//! Payload validation before and after decoding.

use crate::config::LimitsConfig;
use crate::error::{NormalizeError, NormalizeResult};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Checks source payloads against the configured limits.
#[derive(Debug, Clone)]
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Largest payload accepted, in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.limits.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Reject a payload size above the limit.
    pub fn check_size(&self, len: u64) -> NormalizeResult<()> {
        if len > self.max_bytes() {
            return Err(NormalizeError::FileTooLarge {
                size_mb: len / BYTES_PER_MB,
                max_mb: self.limits.max_file_size_mb,
            });
        }
        Ok(())
    }

    /// Quick checks before a full decode:
    /// - payload size is within limits
    /// - payload starts with known image magic bytes
    pub fn validate_payload(&self, bytes: &[u8]) -> NormalizeResult<()> {
        self.check_size(bytes.len() as u64)?;

        if bytes.len() < 4 {
            return Err(NormalizeError::decode(
                "image",
                "payload too small to be a valid image",
            ));
        }
        if !Self::is_valid_image_header(bytes) {
            return Err(NormalizeError::decode(
                "image",
                "unrecognized image format (invalid magic bytes)",
            ));
        }
        Ok(())
    }

    /// Reject decoded images whose sides exceed the limit.
    pub fn validate_dimensions(&self, width: u32, height: u32) -> NormalizeResult<()> {
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(NormalizeError::ImageTooLarge {
                width,
                height,
                max_dim,
            });
        }
        Ok(())
    }

    /// Check if the leading bytes match a known raster format.
    fn is_valid_image_header(header: &[u8]) -> bool {
        const SIGNATURES: &[&[u8]] = &[
            &[0xFF, 0xD8, 0xFF],       // JPEG
            &[0x89, b'P', b'N', b'G'], // PNG
            b"GIF8",                   // GIF
            b"BM",                     // BMP
            &[b'I', b'I', 0x2A, 0x00], // TIFF, little-endian
            &[b'M', b'M', 0x00, 0x2A], // TIFF, big-endian
            b"P5",                     // PGM (binary)
            b"P6",                     // PPM (binary)
        ];
        if SIGNATURES.iter().any(|sig| header.starts_with(sig)) {
            return true;
        }

        // WebP: RIFF....WEBP
        if header.starts_with(b"RIFF") {
            return header.len() < 12 || &header[8..12] == b"WEBP";
        }

        // HEIC/HEIF/AVIF: ftyp box at offset 4
        header.len() >= 12 && &header[4..8] == b"ftyp"
    }
}
