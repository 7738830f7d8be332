//! Progress-callback trait for per-file ingestion events.
//!
//! Inject an [`Arc<dyn IngestProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each uploaded file.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a WebSocket, or a log sink
//! without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so the same callback can also be
//! shared with async callers.
//!
//! Progress reporting is optional instrumentation, not part of the
//! correctness contract: with no callback configured the pipeline behaves
//! identically.

use std::sync::Arc;

/// Called by the ingestion pipeline as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `label` is the same source label that appears in
/// the citation markers: the file name for standalone PDFs, or
/// `"<archive> -> <entry>"` for a PDF nested in a ZIP.
pub trait IngestProgressCallback: Send + Sync {
    /// Called once before any file is processed.
    ///
    /// `total_items` is the number of top-level uploaded items, not the
    /// number of PDFs eventually discovered inside archives.
    fn on_ingest_start(&self, total_items: usize) {
        let _ = total_items;
    }

    /// Called when processing of one PDF begins.
    fn on_file_start(&self, label: &str) {
        let _ = label;
    }

    /// Called when one PDF has been fully processed.
    ///
    /// `pages_emitted` counts the pages that produced a citation block;
    /// empty or whitespace-only pages are not included.
    fn on_file_complete(&self, label: &str, pages_emitted: usize) {
        let _ = (label, pages_emitted);
    }

    /// Called when a file is skipped because of a per-file error.
    fn on_file_warning(&self, label: &str, warning: &str) {
        let _ = (label, warning);
    }

    /// Called once after every item has been attempted.
    fn on_ingest_complete(&self, documents: usize, failures: usize) {
        let _ = (documents, failures);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl IngestProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressCallback = Arc<dyn IngestProgressCallback>;
