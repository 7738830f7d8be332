//! Report rendering: convert analysis markdown into a standalone HTML file.
//!
//! The analysis is produced as markdown so it can be displayed inline; the
//! HTML report is the downloadable artifact — a self-contained document with
//! embedded CSS, a title, the generation date, and the converted body. The
//! blockquote styling matters: the analyst prompt formats every supporting
//! quote as a `> **Citaat:** ...` block.

use crate::error::AssistantError;
use chrono::Local;
use pulldown_cmark::{html, Options, Parser};
use std::path::Path;

const REPORT_CSS: &str = r#"<style>
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
        line-height: 1.6;
        padding: 30px;
        max-width: 800px;
        margin: 20px auto;
        border: 1px solid #ddd;
        border-radius: 8px;
    }
    h1 { color: #222; }
    h2 { color: #333; border-bottom: 2px solid #eee; padding-bottom: 5px; }
    h3 { color: #444; }
    blockquote {
        border-left: 5px solid #ddd;
        padding-left: 15px;
        margin-left: 0;
        font-style: italic;
        color: #444;
    }
    ul, ol { padding-left: 20px; }
</style>"#;

/// Render analysis markdown as a complete, styled HTML document.
///
/// Tables, footnotes, and strikethrough are enabled so the model's GFM
/// output survives the conversion.
pub fn render_report(analysis_markdown: &str, title: &str) -> String {
    let date_str = Local::now().format("%d-%m-%Y").to_string();

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(analysis_markdown, options);
    let mut body = String::with_capacity(analysis_markdown.len() * 2);
    html::push_html(&mut body, parser);

    format!(
        r#"<!DOCTYPE html>
<html lang="nl">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    {REPORT_CSS}
</head>
<body>
    <h1>{title}</h1>
    <p><strong>Datum:</strong> {date_str}</p>
    <p><strong>Versie:</strong> 1.0</p>
    <hr>
    {body}
</body>
</html>
"#
    )
}

/// Write report contents to `path` atomically (temp file + rename), so an
/// interrupted run never leaves a half-written report behind.
///
/// # Errors
/// [`AssistantError::ReportWriteFailed`] with the underlying io error.
pub fn write_report(path: &Path, contents: &str) -> Result<(), AssistantError> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents).map_err(|source| AssistantError::ReportWriteFailed {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| AssistantError::ReportWriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
