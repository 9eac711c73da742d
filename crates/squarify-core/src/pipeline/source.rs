//! Reading request sources into raw bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::io::Read;
use std::path::PathBuf;

use super::validate::Validator;
use crate::error::{NormalizeError, NormalizeResult};
use crate::types::ImageSource;

/// Turns an [`ImageSource`] into the encoded image bytes it refers to.
#[derive(Debug, Clone)]
pub struct SourceReader {
    validator: Validator,
}

impl SourceReader {
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }

    /// Consume the source and return its bytes.
    ///
    /// The size limit is enforced while reading, so an oversized stream is
    /// never buffered whole.
    pub fn read(&self, source: ImageSource) -> NormalizeResult<Vec<u8>> {
        match source {
            ImageSource::File { dir, file_name } => self.read_file(dir, &file_name),
            ImageSource::Base64(text) => {
                let bytes = decode_base64(&text)?;
                self.validator.check_size(bytes.len() as u64)?;
                Ok(bytes)
            }
            ImageSource::Stream(reader) => self.read_stream(reader),
        }
    }

    fn read_file(&self, dir: PathBuf, file_name: &str) -> NormalizeResult<Vec<u8>> {
        let dir_str = dir.to_string_lossy();
        let path = PathBuf::from(shellexpand::tilde(&dir_str).into_owned()).join(file_name);

        if !path.exists() {
            return Err(NormalizeError::FileNotFound(path));
        }
        let metadata = std::fs::metadata(&path).map_err(|e| {
            NormalizeError::decode("file", format!("cannot read metadata of {:?}: {}", path, e))
        })?;
        self.validator.check_size(metadata.len())?;

        std::fs::read(&path)
            .map_err(|e| NormalizeError::decode("file", format!("cannot read {:?}: {}", path, e)))
    }

    fn read_stream(&self, reader: Box<dyn Read + Send>) -> NormalizeResult<Vec<u8>> {
        let limit = self.validator.max_bytes();
        let mut bytes = Vec::new();
        reader
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| NormalizeError::decode("stream", e.to_string()))?;
        self.validator.check_size(bytes.len() as u64)?;
        Ok(bytes)
    }
}

/// Decode standard base64, tolerating surrounding whitespace, embedded line
/// breaks and a `data:<mime>;base64,` prefix.
pub fn decode_base64(text: &str) -> NormalizeResult<Vec<u8>> {
    let trimmed = text.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| NormalizeError::decode("base64", "data URI without ',' separator"))?,
        None => trimmed,
    };

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(NormalizeError::decode("base64", "empty payload"));
    }
    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| NormalizeError::decode("base64", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use std::io::Cursor;

    fn reader() -> SourceReader {
        SourceReader::new(Validator::new(LimitsConfig::default()))
    }

    #[test]
    fn test_decode_base64_plain() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_base64_data_uri_and_whitespace() {
        let text = "  data:image/png;base64,aGVs\nbG8=\n";
        assert_eq!(decode_base64(text).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_base64_malformed() {
        let err = decode_base64("not base64!!").unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::Decode {
                source_kind: "base64",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_base64_empty() {
        assert!(decode_base64("   ").is_err());
    }

    #[test]
    fn test_read_stream() {
        let bytes = reader()
            .read(ImageSource::stream(Cursor::new(vec![1u8, 2, 3, 4])))
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_read_stream_over_limit() {
        let reader = SourceReader::new(Validator::new(LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        }));
        let big = vec![0u8; 2 * 1024 * 1024];
        let err = reader.read(ImageSource::stream(Cursor::new(big))).unwrap_err();
        assert!(matches!(err, NormalizeError::FileTooLarge { .. }));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scan.bin"), b"payload").unwrap();

        let bytes = reader()
            .read(ImageSource::File {
                dir: dir.path().to_path_buf(),
                file_name: "scan.bin".into(),
            })
            .unwrap();
        assert_eq!(bytes, b"payload");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = reader()
            .read(ImageSource::File {
                dir: dir.path().to_path_buf(),
                file_name: "missing.png".into(),
            })
            .unwrap_err();
        assert!(matches!(err, NormalizeError::FileNotFound(_)));
    }
}
