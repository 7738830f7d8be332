//! Pipeline stages for document ingestion and analysis.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch PDF backend) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ archive ──▶ extract ──▶ annotate        llm
//! (classify)  (unzip)   (lopdf)     (markers)    (analysis)
//! ```
//!
//! 1. [`input`]    — classify each uploaded item as PDF, ZIP, or unsupported,
//!    resolved once at ingestion entry
//! 2. [`archive`]  — enumerate ZIP entries in listing order and filter them
//!    through the eligibility predicate
//! 3. [`extract`]  — per-page text extraction via `lopdf`; a page that fails
//!    degrades to empty text, never aborts the document
//! 4. [`annotate`] — wrap each non-empty page in the literal
//!    `START BRON`/`EINDE BRON` citation markers (wire contract)
//! 5. [`llm`]      — the analysis provider boundary; the only stage with
//!    network I/O, strictly downstream of ingestion

pub mod annotate;
pub mod archive;
pub mod extract;
pub mod input;
pub mod llm;
