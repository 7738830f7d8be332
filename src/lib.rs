//! # townhall-assistant
//!
//! Analyze municipal meeting documents with page-level source citations.
//!
//! ## Why this crate?
//!
//! Council agendas arrive as a pile of PDFs, often bundled in ZIP archives.
//! Asking an LLM to analyse them raw invites unverifiable claims. This crate
//! extracts every page's text and wraps it in an unambiguous citation marker
//! (`--- START BRON: bestandsnaam (Pagina n) ---`), so the analyst prompt
//! can demand — and the reader can verify — a page-level source for every
//! finding in the report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! uploads (PDF / ZIP)
//!  │
//!  ├─ 1. Classify  declared MIME, extension, magic bytes — resolved once
//!  ├─ 2. Traverse  ZIPs opened one level deep, entries in listing order
//!  ├─ 3. Extract   per-page text via lopdf; bad pages degrade to empty
//!  ├─ 4. Annotate  START BRON / EINDE BRON citation markers (wire contract)
//!  ├─ 5. Analyze   Gemini call with the Dutch analyst prompt (optional)
//!  └─ 6. Report    markdown + standalone styled HTML document
//! ```
//!
//! Steps 1–4 are the core: synchronous, deterministic, and error-isolated —
//! one corrupt file never aborts its siblings. Steps 5–6 are thin
//! collaborators around a hosted LLM API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use townhall_assistant::{analyze, ingest_paths, render_report, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default();
//!     let ingested = ingest_paths(&["agenda.pdf", "stukken.zip"], &config)?;
//!     if ingested.is_empty() {
//!         eprintln!("nothing to analyze");
//!         return Ok(());
//!     }
//!     // Requires GEMINI_API_KEY (or an injected provider).
//!     let markdown = analyze(&ingested.annotated_text, "Vat de risico's samen.", &config).await?;
//!     println!("{}", render_report(&markdown, &config.report_title));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `townhall` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! townhall-assistant = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::analyze;
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{AssistantError, FileError};
pub use ingest::{ingest, ingest_paths};
pub use output::{IngestOutput, IngestStats, SourceRecord, SourceWarning};
pub use pipeline::input::{MediaType, UploadedItem};
pub use pipeline::llm::{AnalysisProvider, CompletionOptions, GeminiProvider};
pub use progress::{IngestProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{render_report, write_report};
