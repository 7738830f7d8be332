//! Input classification: resolve each uploaded item to a media type once.
//!
//! ## Why classify up front?
//!
//! The pipeline dispatches on a closed variant (`Pdf` / `Zip` /
//! `Unsupported`) resolved at construction time instead of inspecting bytes
//! at every decision point. Classification order: the declared MIME type
//! wins when the caller supplies one; otherwise the file extension is
//! sniffed case-insensitively; otherwise the magic bytes decide. A file that
//! matches none of these is `Unsupported` and contributes a warning rather
//! than an abort.

use crate::error::AssistantError;
use std::path::Path;
use tracing::debug;

/// Media type of an uploaded item, resolved once at ingestion entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MediaType {
    /// A standalone PDF document.
    Pdf,
    /// A ZIP archive possibly containing PDFs.
    Zip,
    /// Anything else; skipped with a warning.
    Unsupported,
}

impl MediaType {
    /// Map a declared MIME type to a media type, if it names one we handle.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(MediaType::Pdf),
            "application/zip" | "application/x-zip-compressed" => Some(MediaType::Zip),
            _ => None,
        }
    }

    /// Classify an item from its declared MIME type, file name, and content.
    ///
    /// Declared type wins, then extension, then magic bytes
    /// (`%PDF` / `PK\x03\x04`).
    pub fn detect(declared: Option<&str>, name: &str, bytes: &[u8]) -> Self {
        if let Some(mt) = declared.and_then(Self::from_mime) {
            return mt;
        }

        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            return MediaType::Pdf;
        }
        if lower.ends_with(".zip") {
            return MediaType::Zip;
        }

        if bytes.starts_with(b"%PDF") {
            return MediaType::Pdf;
        }
        if bytes.starts_with(b"PK\x03\x04") {
            return MediaType::Zip;
        }

        MediaType::Unsupported
    }
}

/// One uploaded item: raw bytes plus the declared name and resolved type.
///
/// Owned exclusively by the caller for the duration of one ingestion call;
/// the pipeline only reads it.
#[derive(Debug, Clone)]
pub struct UploadedItem {
    /// Declared file name, used as the source label in citation markers.
    pub name: String,
    /// Media type, resolved once.
    pub media_type: MediaType,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedItem {
    /// Create an item with an explicit media type.
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
        }
    }

    /// Create an item, classifying it from the declared MIME type (if any),
    /// the file name, and the content.
    pub fn from_bytes(name: impl Into<String>, declared: Option<&str>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = MediaType::detect(declared, &name, &bytes);
        debug!("Classified '{}' as {:?}", name, media_type);
        Self {
            name,
            media_type,
            bytes,
        }
    }

    /// Read an item from a local file, classifying by extension and content.
    ///
    /// # Errors
    /// [`AssistantError::FileNotFound`] / [`AssistantError::PermissionDenied`]
    /// when the path cannot be read at all. A file that reads fine but is
    /// neither PDF nor ZIP is returned as `Unsupported`, not an error — the
    /// pipeline reports it as a per-file warning.
    pub fn from_path(path: &Path) -> Result<Self, AssistantError> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(AssistantError::PermissionDenied {
                    path: path.to_path_buf(),
                });
            }
            Err(_) => {
                return Err(AssistantError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::from_bytes(name, None, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_mime_wins_over_extension() {
        // Name says .zip, declared type says PDF: declared wins.
        let mt = MediaType::detect(Some("application/pdf"), "weird.zip", b"%PDF-1.7");
        assert_eq!(mt, MediaType::Pdf);
    }

    #[test]
    fn extension_sniff_is_case_insensitive() {
        assert_eq!(MediaType::detect(None, "AGENDA.PDF", b""), MediaType::Pdf);
        assert_eq!(MediaType::detect(None, "Stukken.Zip", b""), MediaType::Zip);
    }

    #[test]
    fn magic_bytes_classify_extensionless_input() {
        assert_eq!(MediaType::detect(None, "blob", b"%PDF-1.4 ..."), MediaType::Pdf);
        assert_eq!(MediaType::detect(None, "blob", b"PK\x03\x04rest"), MediaType::Zip);
        assert_eq!(MediaType::detect(None, "blob", b"hello"), MediaType::Unsupported);
    }

    #[test]
    fn unknown_mime_falls_through_to_extension() {
        let mt = MediaType::detect(Some("application/octet-stream"), "a.pdf", b"");
        assert_eq!(mt, MediaType::Pdf);
    }

    #[test]
    fn from_path_missing_file_is_fatal() {
        let err = UploadedItem::from_path(Path::new("/definitely/not/here.pdf"));
        assert!(matches!(err, Err(AssistantError::FileNotFound { .. })));
    }

    #[test]
    fn from_bytes_records_name_and_type() {
        let item = UploadedItem::from_bytes("notulen.pdf", Some("application/pdf"), vec![1, 2]);
        assert_eq!(item.name, "notulen.pdf");
        assert_eq!(item.media_type, MediaType::Pdf);
        assert_eq!(item.bytes, vec![1, 2]);
    }
}
