//! Citation markers: the literal wire format wrapping each page's text.
//!
//! The marker strings below — including the Dutch field names `BRON` and
//! `Pagina` — are a wire contract with the downstream prompt-assembly step:
//! the analyst system prompt instructs the model to recognise exactly this
//! pattern when citing sources. Do not change them.

/// Composite label for a PDF nested inside a ZIP archive.
pub fn composite_label(archive_name: &str, entry_name: &str) -> String {
    format!("{archive_name} -> {entry_name}")
}

/// Wrap one page's text in the START/EINDE citation marker pair.
///
/// Byte-exact format:
///
/// ```text
/// \n\n--- START BRON: <label> (Pagina <n>) ---\n
/// <text>
/// \n--- EINDE BRON: <label> (Pagina <n>) ---\n
/// ```
///
/// Callers must not pass empty text; empty pages are omitted upstream so no
/// empty citation block is ever emitted.
pub fn citation_block(label: &str, page: usize, text: &str) -> String {
    format!(
        "\n\n--- START BRON: {label} (Pagina {page}) ---\n{text}\n--- EINDE BRON: {label} (Pagina {page}) ---\n"
    )
}
