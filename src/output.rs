//! Output types for ingestion: annotated text, per-source records,
//! warnings, and stats.
//!
//! [`IngestOutput`] is deliberately richer than the bare annotated string:
//! the per-source records and warnings let a caller render a processing
//! summary (which files contributed, which were skipped and why) without
//! re-parsing the citation markers out of the text.

use crate::error::FileError;
use serde::{Deserialize, Serialize};

/// Result of one ingestion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutput {
    /// The concatenated citation-annotated text, ready for prompt assembly.
    ///
    /// Empty when the input contained no eligible PDFs or no page produced
    /// text. An empty string is a normal outcome, not an error; it means
    /// "nothing to analyze".
    pub annotated_text: String,

    /// One record per PDF that was successfully opened, in traversal order.
    pub sources: Vec<SourceRecord>,

    /// One warning per file that had to be skipped, in traversal order.
    pub warnings: Vec<SourceWarning>,

    /// Aggregate counters for the whole call.
    pub stats: IngestStats,
}

impl IngestOutput {
    /// True when no citation block was emitted.
    pub fn is_empty(&self) -> bool {
        self.annotated_text.is_empty()
    }
}

/// Per-document processing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Source label as it appears in the citation markers.
    pub label: String,
    /// Total pages in the document.
    pub pages_total: usize,
    /// Pages that produced a citation block (non-empty text).
    pub pages_with_text: usize,
}

/// A per-file failure that was recovered locally.
///
/// The file contributed nothing to the annotated text; its siblings were
/// still processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceWarning {
    /// Source label of the failing file.
    pub label: String,
    /// What went wrong.
    pub error: FileError,
}

/// Aggregate statistics for one ingestion call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Top-level items supplied by the caller.
    pub total_items: usize,
    /// PDFs successfully opened (standalone and nested).
    pub documents: usize,
    /// Files skipped with a [`SourceWarning`].
    pub failed_documents: usize,
    /// Pages that produced a citation block.
    pub pages_with_text: usize,
    /// Pages that yielded no extractable text and were omitted.
    pub pages_empty: usize,
    /// Length of the annotated text in bytes.
    pub annotated_bytes: usize,
    /// Wall-clock duration of the ingestion call.
    pub duration_ms: u64,
}
