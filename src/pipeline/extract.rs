//! Per-page text extraction from in-memory PDF bytes.
//!
//! ## Failure granularity
//!
//! Two levels, deliberately different:
//!
//! * The **document** fails to parse at all (bad header, broken xref,
//!   encrypted) — returned as `Err`, which the caller converts into a
//!   per-file `MalformedDocument` warning.
//! * A single **page** fails to extract — degrades to empty text for that
//!   page, logged at `debug`. The page is then omitted from the output like
//!   any other empty page, and the remaining pages keep their original
//!   numbers.
//!
//! Text-reconstruction heuristics are delegated to `lopdf`; this module only
//! drives it page by page and normalises the result.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Why a PDF byte stream could not be opened for extraction.
///
/// Converted by the ingestion pipeline into a per-file
/// [`crate::error::FileError::MalformedDocument`] warning.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes are not a parseable PDF.
    #[error("{0}")]
    Parse(#[from] lopdf::Error),

    /// The document is encrypted; text extraction is not possible.
    #[error("document is encrypted")]
    Encrypted,
}

/// Extract text from every page of an in-memory PDF.
///
/// Returns `(page_number, text)` pairs in ascending page order, 1-based,
/// one entry per page of the document. Pages whose extraction fails or
/// yields nothing carry an empty string; callers decide whether to skip
/// them (the ingestion pipeline does).
///
/// # Errors
/// Returns the underlying parse error when the bytes are not a readable PDF
/// at all. Encrypted documents are rejected the same way: we cannot extract
/// their text, and OCR/decryption is out of scope.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<(usize, String)>, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes)?;

    if doc.is_encrypted() {
        return Err(ExtractError::Encrypted);
    }

    let mut pages = Vec::new();
    for (page_num, _page_id) in doc.get_pages() {
        let text = match doc.extract_text(&[page_num]) {
            Ok(raw) => clean_page_text(&raw),
            Err(e) => {
                debug!("Page {}: extraction failed, treating as empty: {}", page_num, e);
                String::new()
            }
        };
        pages.push((page_num as usize, text));
    }

    Ok(pages)
}

// ── Text normalisation ────────────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalise raw extractor output: strip NUL bytes, trim trailing
/// whitespace per line, collapse runs of blank lines, trim the ends.
///
/// Extraction artefacts (NULs from broken CMaps, trailing spaces from
/// positioning operators) would otherwise leak into the annotated text and
/// into the LLM prompt.
pub fn clean_page_text(raw: &str) -> String {
    let no_nul = raw.replace('\0', "");
    let trimmed_lines = no_nul
        .lines()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    RE_BLANK_LINES
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}
