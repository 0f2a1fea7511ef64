//! File intake: media type and size validation plus transport encoding.
//!
//! A selected document is validated up front and held as raw bytes for the
//! rest of the session cycle. Encoding to the inline-data transport form is
//! all-or-nothing; either the whole file is encoded or the intake fails.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::IntakeError;

/// Hard ceiling on accepted file size (20 MiB), chosen for inline-data
/// transport safety.
pub const MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Media type for PDF documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Whether a media type is accepted for extraction: any image type, or PDF.
pub fn is_supported_media_type(media_type: &str) -> bool {
    media_type == PDF_MEDIA_TYPE || media_type.starts_with("image/")
}

/// Guess a media type from a file extension. Used by callers that only
/// have a path rather than a browser-supplied type.
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "pdf" => Some(PDF_MEDIA_TYPE),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

/// Human-readable file size for the intake descriptor.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// A user-selected document, validated and held for one session cycle.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    /// Validate and wrap a selected document.
    ///
    /// Rejects (leaving all state with the caller untouched) when the media
    /// type is not a recognized image type or PDF, or when the content
    /// exceeds [`MAX_FILE_BYTES`].
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, IntakeError> {
        let name = name.into();
        let media_type = media_type.into();

        if !is_supported_media_type(&media_type) {
            return Err(IntakeError::UnsupportedMediaType(media_type));
        }

        let size = bytes.len() as u64;
        if size > MAX_FILE_BYTES {
            return Err(IntakeError::TooLarge {
                size,
                limit: MAX_FILE_BYTES,
            });
        }

        debug!("accepted '{}' ({}, {})", name, media_type, format_file_size(size));

        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    /// File name as selected.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Raw content size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Display descriptor, e.g. `statement.pdf (1.2 MB)`.
    pub fn descriptor(&self) -> String {
        format!("{} ({})", self.name, format_file_size(self.size()))
    }

    /// Encode the full content into its transport form.
    pub fn encode(&self) -> EncodedDocument {
        EncodedDocument {
            media_type: self.media_type.clone(),
            data: STANDARD.encode(&self.bytes),
        }
    }
}

/// A document in transport-ready encoded form, suitable for embedding in a
/// request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    /// Media type of the underlying document.
    pub media_type: String,

    /// Base64 encoding of the full byte content.
    pub data: String,
}

impl EncodedDocument {
    /// Recover the original bytes. The encoding is lossless, so this is the
    /// exact content that was selected.
    pub fn decode(&self) -> Result<Vec<u8>, IntakeError> {
        Ok(STANDARD.decode(&self.data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_png_and_pdf() {
        assert!(UploadedFile::new("a.png", "image/png", vec![1, 2, 3]).is_ok());
        assert!(UploadedFile::new("a.pdf", PDF_MEDIA_TYPE, vec![1, 2, 3]).is_ok());
    }

    #[test]
    fn test_rejects_unsupported_media_type() {
        let err = UploadedFile::new("a.txt", "text/plain", vec![1]).unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let bytes = vec![0u8; (MAX_FILE_BYTES + 1) as usize];
        let err = UploadedFile::new("big.pdf", PDF_MEDIA_TYPE, bytes).unwrap_err();
        match err {
            IntakeError::TooLarge { size, limit } => {
                assert_eq!(size, MAX_FILE_BYTES + 1);
                assert_eq!(limit, MAX_FILE_BYTES);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_accepts_file_at_exact_limit() {
        let bytes = vec![0u8; MAX_FILE_BYTES as usize];
        assert!(UploadedFile::new("edge.pdf", PDF_MEDIA_TYPE, bytes).is_ok());
    }

    #[test]
    fn test_encoding_round_trips_losslessly() {
        let bytes = vec![0u8, 255, 10, 13, 127, 128];
        let file = UploadedFile::new("x.png", "image/png", bytes.clone()).expect("accepted");
        let encoded = file.encode();
        assert_eq!(encoded.media_type, "image/png");
        assert_eq!(encoded.decode().expect("decodable"), bytes);
    }

    #[test]
    fn test_media_type_for_extension() {
        assert_eq!(media_type_for_extension("PDF"), Some(PDF_MEDIA_TYPE));
        assert_eq!(media_type_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(media_type_for_extension("docx"), None);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn test_descriptor() {
        let file = UploadedFile::new("statement.pdf", PDF_MEDIA_TYPE, vec![0u8; 2048])
            .expect("accepted");
        assert_eq!(file.descriptor(), "statement.pdf (2.0 KB)");
    }
}
