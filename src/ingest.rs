//! Ingestion: walk a mixed list of uploads and produce one annotated text.
//!
//! ## Why a single string?
//!
//! The annotated text is the sole artifact the prompt-assembly step
//! consumes. Every page's text is wrapped in the literal
//! `START BRON`/`EINDE BRON` markers from [`crate::pipeline::annotate`] so
//! the model can cite `(Bron: bestandsnaam, Pagina n)` for any claim it
//! makes. Page numbers are positional and never renumbered: a skipped empty
//! page leaves a gap, which keeps citations verifiable against the original
//! document.
//!
//! Ingestion is synchronous and single-pass. Each call operates on its own
//! input and allocates its own output; calling it twice with byte-identical
//! input produces byte-identical output.

use crate::config::AnalysisConfig;
use crate::error::{AssistantError, FileError};
use crate::output::{IngestOutput, IngestStats, SourceRecord, SourceWarning};
use crate::pipeline::annotate::{citation_block, composite_label};
use crate::pipeline::archive;
use crate::pipeline::extract;
use crate::pipeline::input::{MediaType, UploadedItem};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Ingest a list of uploaded items into one citation-annotated text.
///
/// Items are processed strictly in the order supplied. PDFs are extracted
/// directly; ZIPs are opened and their eligible entries extracted with a
/// composite `"<archive> -> <entry>"` label. Per-file failures become
/// [`SourceWarning`]s; they never abort the call.
///
/// An empty input list — or one that yields no extractable text — returns
/// an output with an empty `annotated_text` and no warnings. That is a
/// normal outcome meaning "nothing to analyze", not an error.
pub fn ingest(items: &[UploadedItem], config: &AnalysisConfig) -> IngestOutput {
    let start = Instant::now();
    info!("Ingesting {} item(s)", items.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_ingest_start(items.len());
    }

    let mut state = IngestState::default();

    for item in items {
        match item.media_type {
            MediaType::Pdf => {
                state.process_pdf(&item.name, &item.bytes, config);
            }
            MediaType::Zip => {
                state.process_zip(&item.name, &item.bytes, config);
            }
            MediaType::Unsupported => {
                state.push_warning(
                    item.name.clone(),
                    FileError::UnsupportedMediaType {
                        name: item.name.clone(),
                    },
                    config,
                );
            }
        }
    }

    let stats = IngestStats {
        total_items: items.len(),
        documents: state.sources.len(),
        failed_documents: state.warnings.len(),
        pages_with_text: state.pages_with_text,
        pages_empty: state.pages_empty,
        annotated_bytes: state.annotated_text.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Ingestion complete: {} document(s), {} warning(s), {} bytes in {}ms",
        stats.documents, stats.failed_documents, stats.annotated_bytes, stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_ingest_complete(stats.documents, stats.failed_documents);
    }

    IngestOutput {
        annotated_text: state.annotated_text,
        sources: state.sources,
        warnings: state.warnings,
        stats,
    }
}

/// Read the given paths from disk and ingest them.
///
/// Convenience wrapper for CLI-style callers. Unlike per-file processing
/// errors, an unreadable *path* is fatal: the caller named a file that
/// cannot be opened at all, which is an invocation error rather than a bad
/// document.
pub fn ingest_paths<P: AsRef<Path>>(
    paths: &[P],
    config: &AnalysisConfig,
) -> Result<IngestOutput, AssistantError> {
    let items = paths
        .iter()
        .map(|p| UploadedItem::from_path(p.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ingest(&items, config))
}

// ── Traversal state ──────────────────────────────────────────────────────

#[derive(Default)]
struct IngestState {
    annotated_text: String,
    sources: Vec<SourceRecord>,
    warnings: Vec<SourceWarning>,
    pages_with_text: usize,
    pages_empty: usize,
}

impl IngestState {
    /// Extract one PDF and append its citation blocks.
    fn process_pdf(&mut self, label: &str, bytes: &[u8], config: &AnalysisConfig) {
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(label);
        }

        let pages = match extract::extract_pages(bytes) {
            Ok(pages) => pages,
            Err(e) => {
                self.push_warning(
                    label.to_string(),
                    FileError::MalformedDocument {
                        name: label.to_string(),
                        detail: e.to_string(),
                    },
                    config,
                );
                return;
            }
        };

        let pages_total = pages.len();
        let mut emitted = 0usize;

        for (page_num, text) in &pages {
            if text.trim().is_empty() {
                debug!("{} page {}: no extractable text, omitted", label, page_num);
                self.pages_empty += 1;
                continue;
            }
            self.annotated_text
                .push_str(&citation_block(label, *page_num, text));
            emitted += 1;
        }

        self.pages_with_text += emitted;
        self.sources.push(SourceRecord {
            label: label.to_string(),
            pages_total,
            pages_with_text: emitted,
        });

        debug!("{}: {}/{} pages emitted", label, emitted, pages_total);
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_complete(label, emitted);
        }
    }

    /// Open one ZIP and extract every eligible entry as a nested PDF.
    fn process_zip(&mut self, archive_name: &str, bytes: &[u8], config: &AnalysisConfig) {
        let entries = match archive::eligible_entries(archive_name, bytes) {
            Ok(entries) => entries,
            Err(e) => {
                self.push_warning(archive_name.to_string(), e, config);
                return;
            }
        };

        for entry in entries {
            let label = composite_label(archive_name, &entry.name);
            match entry.data {
                Ok(data) => self.process_pdf(&label, &data, config),
                Err(detail) => {
                    self.push_warning(
                        label.clone(),
                        FileError::MalformedDocument {
                            name: label.clone(),
                            detail,
                        },
                        config,
                    );
                }
            }
        }
    }

    /// Record a per-file failure and route it to the progress sink.
    fn push_warning(&mut self, label: String, error: FileError, config: &AnalysisConfig) {
        warn!("Skipping {}: {}", label, error);
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_warning(&label, &error.to_string());
        }
        self.warnings.push(SourceWarning { label, error });
    }
}
