//! CLI binary for townhall-assistant.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig`, drives ingestion and analysis, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use townhall_assistant::{
    analyze, ingest_paths, render_report, AnalysisConfig, IngestOutput, IngestProgressCallback,
    ProgressCallback,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner plus one log line per processed
/// file. PDFs discovered inside archives appear as they are found, so the
/// spinner carries a message rather than a fixed-length bar.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Ingesting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl IngestProgressCallback for CliProgressCallback {
    fn on_ingest_start(&self, total_items: usize) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_items} uploaded item(s)…"))
        ));
    }

    fn on_file_start(&self, label: &str) {
        self.bar.set_message(label.to_string());
    }

    fn on_file_complete(&self, label: &str, pages_emitted: usize) {
        self.bar.println(format!(
            "  {} {:<50} {}",
            green("✓"),
            label,
            dim(&format!("{pages_emitted} page(s) with text")),
        ));
    }

    fn on_file_warning(&self, label: &str, warning: &str) {
        self.bar
            .println(format!("  {} {:<50} {}", yellow("⚠"), label, yellow(warning)));
    }

    fn on_ingest_complete(&self, documents: usize, failures: usize) {
        self.bar.finish_and_clear();
        if failures == 0 {
            eprintln!(
                "{} {} document(s) ingested",
                green("✔"),
                bold(&documents.to_string())
            );
        } else {
            eprintln!(
                "{} {} document(s) ingested, {} skipped",
                yellow("⚠"),
                bold(&documents.to_string()),
                yellow(&failures.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a batch of meeting documents (markdown to stdout)
  townhall agenda.pdf bijlagen.zip -i "Vat de belangrijkste risico's samen."

  # Write a styled HTML report
  townhall stukken.zip -i "Analyseer het budget." -o rapport.html

  # Read the instruction from a file
  townhall *.pdf --instruction-file opdracht.txt -o rapport.html

  # Only extract the citation-annotated text, no API call
  townhall stukken.zip --ingest-only

  # Structured JSON output of the ingestion result
  townhall stukken.zip --ingest-only --json

MARKER FORMAT:
  Every page with extractable text is wrapped as

    --- START BRON: <bestand> (Pagina <n>) ---
    ...page text...
    --- EINDE BRON: <bestand> (Pagina <n>) ---

  PDFs inside a ZIP get the composite label "<archief> -> <bestand>".
  The analyst prompt cites sources as (Bron: bestand, Pagina n).

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY    Google Gemini API key (required unless --ingest-only)

SETUP:
  1. Set API key:   export GEMINI_API_KEY=...
  2. Analyze:       townhall stukken.zip -i "Vat samen." -o rapport.html
"#;

/// Analyze municipal meeting documents with page-level source citations.
#[derive(Parser, Debug)]
#[command(
    name = "townhall",
    version,
    about = "Analyze meeting documents (PDF/ZIP) with page-level source citations",
    long_about = "Extract per-page text from PDFs and ZIP bundles of PDFs, wrap every page in a \
citation marker, and have an LLM produce a formal analysis report in which every finding cites \
its source file and page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files and/or ZIP archives containing PDFs.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// The assignment for the analyst (what to look for, what to summarise).
    #[arg(short, long, env = "TOWNHALL_INSTRUCTION", conflicts_with = "instruction_file")]
    instruction: Option<String>,

    /// Read the instruction from a text file.
    #[arg(long)]
    instruction_file: Option<PathBuf>,

    /// Write output to this file. A `.html` extension selects the styled
    /// HTML report; anything else gets raw markdown.
    #[arg(short, long, env = "TOWNHALL_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gemini-2.5-pro, gemini-2.0-flash).
    #[arg(long, env = "TOWNHALL_MODEL")]
    model: Option<String>,

    /// Path to a text file with a custom analyst persona / system prompt.
    #[arg(long, env = "TOWNHALL_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Title of the HTML report.
    #[arg(long, env = "TOWNHALL_TITLE", default_value = "Analyse Raadsstukken")]
    title: String,

    /// Stop after ingestion: print the citation-annotated text, no API call.
    #[arg(long)]
    ingest_only: bool,

    /// Output structured JSON (ingestion result, or analysis markdown).
    #[arg(long, env = "TOWNHALL_JSON")]
    json: bool,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "TOWNHALL_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max LLM output tokens for the report.
    #[arg(long, env = "TOWNHALL_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: u32,

    /// Retries on a transient API failure.
    #[arg(long, env = "TOWNHALL_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Per-API-call timeout in seconds.
    #[arg(long, env = "TOWNHALL_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Disable the progress spinner.
    #[arg(long, env = "TOWNHALL_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TOWNHALL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result itself.
    #[arg(short, long, env = "TOWNHALL_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress spinner is active;
    // it provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, show_progress).await?;

    // ── Ingest ───────────────────────────────────────────────────────────
    let ingested = ingest_paths(&cli.inputs, &config).context("Ingestion failed")?;

    if !show_progress && !cli.quiet {
        for warning in &ingested.warnings {
            eprintln!("warning: {}", warning.error);
        }
    }

    if cli.ingest_only {
        return print_ingest_result(&cli, &ingested);
    }

    if ingested.is_empty() {
        anyhow::bail!(
            "No analyzable text found in the supplied documents \
             ({} item(s), {} skipped). Nothing to analyze.",
            ingested.stats.total_items,
            ingested.stats.failed_documents
        );
    }

    // ── Analyze ──────────────────────────────────────────────────────────
    let instruction = resolve_instruction(&cli).await?;
    let markdown = analyze(&ingested.annotated_text, &instruction, &config)
        .await
        .context("Analysis failed")?;

    // ── Emit ─────────────────────────────────────────────────────────────
    let wants_html = cli
        .output
        .as_ref()
        .and_then(|p| p.extension())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));

    let rendered = if wants_html {
        render_report(&markdown, &cli.title)
    } else {
        markdown.clone()
    };

    if let Some(ref path) = cli.output {
        townhall_assistant::write_report(path, &rendered)?;
        if !cli.quiet {
            eprintln!(
                "{} report written to {}",
                green("✔"),
                bold(&path.display().to_string())
            );
        }
    } else if cli.json {
        let value = serde_json::json!({
            "analysis_markdown": markdown,
            "stats": ingested.stats,
            "sources": ingested.sources,
            "warnings": ingested.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(markdown.as_bytes())?;
        if !markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

/// Print the ingestion result and stop (`--ingest-only`).
fn print_ingest_result(cli: &Cli, ingested: &IngestOutput) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(ingested)?);
        return Ok(());
    }

    if ingested.is_empty() {
        eprintln!("No analyzable text found in the supplied documents.");
        return Ok(());
    }

    if let Some(ref path) = cli.output {
        std::fs::write(path, &ingested.annotated_text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{} annotated text written to {}",
                green("✔"),
                bold(&path.display().to_string())
            );
        }
    } else {
        print!("{}", ingested.annotated_text);
    }
    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
async fn build_config(cli: &Cli, show_progress: bool) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .temperature(cli.temperature)
        .max_output_tokens(cli.max_tokens)
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout)
        .report_title(cli.title.clone());

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

/// Resolve the analyst instruction from `-i` or `--instruction-file`.
async fn resolve_instruction(cli: &Cli) -> Result<String> {
    if let Some(ref instruction) = cli.instruction {
        return Ok(instruction.clone());
    }
    if let Some(ref path) = cli.instruction_file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read instruction from {:?}", path));
    }
    anyhow::bail!(
        "An analysis needs an instruction: pass -i \"...\" or --instruction-file FILE \
         (or use --ingest-only to skip analysis)."
    );
}
