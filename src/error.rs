//! Error types for the townhall-assistant library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AssistantError`] — **Fatal**: the operation cannot proceed at all
//!   (unreadable input path, no LLM provider configured, API failure after
//!   retries). Returned as `Err(AssistantError)` from the top-level entry
//!   points.
//!
//! * [`FileError`] — **Non-fatal**: a single uploaded file (or a single PDF
//!   inside a ZIP) could not be processed. Stored inside
//!   [`crate::output::SourceWarning`] so the ingestion pipeline keeps going
//!   and callers can inspect partial success rather than losing the whole
//!   batch to one bad file.
//!
//! The separation mirrors the ingestion contract: one corrupt document among
//! many must never abort its siblings.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the townhall-assistant library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::SourceWarning`] rather than propagated here.
#[derive(Debug, Error)]
pub enum AssistantError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No analysis provider is available (missing API key etc.).
    #[error("Analysis provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error after all retries were exhausted.
    #[error("Analysis API error: {message}")]
    ApiError { message: String },

    /// The LLM call exceeded the configured timeout.
    #[error("Analysis call timed out after {secs}s\nIncrease --api-timeout.")]
    ApiTimeout { secs: u64 },

    /// The LLM API answered successfully but returned no text.
    #[error("Analysis provider '{provider}' returned an empty response")]
    EmptyResponse { provider: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output report file.
    #[error("Failed to write output file '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file within one ingestion call.
///
/// Stored alongside the failing file's label in
/// [`crate::output::SourceWarning`]. The overall ingestion always completes;
/// a file that produced a `FileError` simply contributes no citation blocks.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// A ZIP-typed item could not be opened as a valid archive.
    #[error("'{name}' is not a readable ZIP archive: {detail}")]
    InvalidArchive { name: String, detail: String },

    /// A byte stream tagged as PDF could not be parsed at all.
    ///
    /// This covers standalone uploads, PDFs nested in a ZIP, and ZIP entries
    /// whose compressed data could not be read.
    #[error("'{name}' is not a readable PDF: {detail}")]
    MalformedDocument { name: String, detail: String },

    /// The item is neither a PDF nor a ZIP.
    #[error("'{name}' has an unsupported media type (expected PDF or ZIP)")]
    UnsupportedMediaType { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_not_configured_display() {
        let e = AssistantError::ProviderNotConfigured {
            provider: "gemini".into(),
            hint: "Set GEMINI_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gemini"), "got: {msg}");
        assert!(msg.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn api_timeout_display() {
        let e = AssistantError::ApiTimeout { secs: 120 };
        assert!(e.to_string().contains("120s"));
    }

    #[test]
    fn invalid_archive_display() {
        let e = FileError::InvalidArchive {
            name: "docs.zip".into(),
            detail: "invalid central directory".into(),
        };
        assert!(e.to_string().contains("docs.zip"));
        assert!(e.to_string().contains("central directory"));
    }

    #[test]
    fn malformed_document_display_uses_composite_label() {
        let e = FileError::MalformedDocument {
            name: "docs.zip -> agenda.pdf".into(),
            detail: "not a PDF header".into(),
        };
        assert!(e.to_string().contains("docs.zip -> agenda.pdf"));
    }

    #[test]
    fn file_error_round_trips_through_serde() {
        let e = FileError::UnsupportedMediaType {
            name: "notes.txt".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: FileError = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, FileError::UnsupportedMediaType { ref name } if name == "notes.txt"));
    }
}
