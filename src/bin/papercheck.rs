//! CLI binary for papercheck.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig`, shows a spinner during the (long) analysis exchange,
//! and writes the report and CSV artifacts.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use papercheck::{
    analyze_to_file, AnalysisConfig, AnalysisOutput, AnalysisSession, DEFAULT_CSV_FILENAME,
    DEFAULT_MODEL,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Review a paper, report to stdout
  papercheck paper.pdf

  # Write the Markdown report and the findings CSV
  papercheck paper.pdf -o report.md --csv findings.csv

  # Sanitized HTML instead of Markdown
  papercheck paper.pdf --html -o report.html

  # Use a local prompt file instead of the remote instructions
  papercheck --prompt-file my_rules.txt paper.pdf

  # Full structured output
  papercheck --json paper.pdf > result.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Access credential for the analysis service
  PAPERCHECK_MODEL        Override the model ID
  PAPERCHECK_PROMPT_URL   Override the remote prompt location

NOTES:
  Reviewing takes on the order of minutes per page. The exchange is a
  single request with no retry; rerun the command if it fails.
"#;

/// Review PDF papers with the Gemini API.
#[derive(Parser, Debug)]
#[command(
    name = "papercheck",
    version,
    about = "Review PDF papers with the Gemini API — Markdown report plus first-table CSV export",
    long_about = "Send a PDF document with a fixed review prompt to the Gemini generateContent API, \
print the returned Markdown report, and export the report's first findings table as a \
UTF-8-BOM CSV that opens cleanly in Excel and Google Sheets.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file to review.
    input: PathBuf,

    /// Access credential for the analysis service.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model ID.
    #[arg(long, env = "PAPERCHECK_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, env = "PAPERCHECK_OUTPUT")]
    output: Option<PathBuf>,

    /// Emit the sanitized HTML rendition instead of Markdown.
    #[arg(long)]
    html: bool,

    /// Write the findings table CSV to this file (default name used with
    /// --csv-auto). Only written when a table with rows was found.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the findings CSV next to the report under its default name.
    #[arg(long, conflicts_with = "csv")]
    csv_auto: bool,

    /// Remote location of the review instructions.
    #[arg(long, env = "PAPERCHECK_PROMPT_URL")]
    prompt_url: Option<String>,

    /// Read the review instructions from a local file.
    #[arg(long, conflicts_with = "prompt_url")]
    prompt_file: Option<PathBuf>,

    /// Output structured JSON (AnalysisOutput) instead of the report.
    #[arg(long)]
    json: bool,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, default_value_t = 0.2)]
    temperature: f32,

    /// Max output tokens for the whole report.
    #[arg(long, default_value_t = 8192)]
    max_output_tokens: u32,

    /// Analysis exchange timeout in seconds.
    #[arg(long, default_value_t = 600)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the report itself.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_spinner = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let api_key = cli.api_key.clone().unwrap_or_default();

    // ── Build config + session ───────────────────────────────────────────
    let config = build_config(&cli)?;

    if show_spinner {
        eprintln!(
            "{} {}",
            cyan("◆"),
            bold("Reviewing may take a few minutes per page — the request runs in one exchange.")
        );
    }

    let setup_bar = show_spinner.then(|| spinner("Preparing", "Fetching review instructions…"));
    let mut session = AnalysisSession::connect(config)
        .await
        .context("Could not prepare the review instructions")?;
    if let Some(bar) = setup_bar {
        bar.finish_and_clear();
    }

    // ── Run the review ───────────────────────────────────────────────────
    let bar = show_spinner.then(|| spinner("Reviewing", "Waiting for the analysis service…"));
    let result = match cli.output {
        // analyze_to_file writes the Markdown report atomically; the HTML
        // rendition is written by emit_report instead.
        Some(ref output_path) if !cli.html => {
            analyze_to_file(&cli.input, output_path, &api_key, session.config()).await
        }
        _ => session.run(&cli.input, &api_key).await,
    };
    if let Some(ref b) = bar {
        b.finish_and_clear();
    }
    let output = result.context("Review failed")?;

    // ── Emit results ─────────────────────────────────────────────────────
    emit_report(&cli, &output)?;
    write_csv(&cli, &output)?;

    if !cli.quiet && !cli.json {
        eprintln!(
            "{} report {}  {}",
            green("✔"),
            bold(&format!("{} bytes", output.stats.report_bytes)),
            dim(&format!(
                "HTTP {} in {}ms",
                output.stats.response_status, output.stats.request_duration_ms
            )),
        );
    }

    Ok(())
}

/// A bottom-anchored spinner for the long single-exchange wait.
fn spinner(prefix: &str, msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix(prefix.to_string());
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .model(&cli.model)
        .temperature(cli.temperature)
        .max_output_tokens(cli.max_output_tokens)
        .api_timeout_secs(cli.timeout);

    if let Some(ref url) = cli.prompt_url {
        builder = builder.prompt_url(url);
    }
    if let Some(ref path) = cli.prompt_file {
        let prompt = papercheck::prompts::load_prompt_file(path)
            .with_context(|| format!("Failed to read prompt from {:?}", path))?;
        builder = builder.prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

/// Print the report (or JSON envelope) to stdout unless -o was given.
fn emit_report(cli: &Cli, output: &AnalysisOutput) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(output).context("Failed to serialise output")?
        );
        return Ok(());
    }

    if let Some(ref path) = cli.output {
        if cli.html {
            std::fs::write(path, &output.html)
                .with_context(|| format!("Failed to write HTML report to {:?}", path))?;
        }
        // The Markdown case was already written by analyze_to_file.
        return Ok(());
    }

    let text = if cli.html { &output.html } else { &output.markdown };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

/// Write the findings CSV when requested and available.
fn write_csv(cli: &Cli, output: &AnalysisOutput) -> Result<()> {
    let dest = if let Some(ref path) = cli.csv {
        path.clone()
    } else if cli.csv_auto {
        match cli.output {
            Some(ref o) => o.with_file_name(DEFAULT_CSV_FILENAME),
            None => PathBuf::from(DEFAULT_CSV_FILENAME),
        }
    } else {
        return Ok(());
    };

    match output.csv() {
        Some(csv) => {
            std::fs::write(&dest, csv)
                .with_context(|| format!("Failed to write CSV to {:?}", dest))?;
            if !cli.quiet && !cli.json {
                eprintln!("{} findings table → {}", green("✔"), bold(&dest.display().to_string()));
            }
        }
        None => {
            if !cli.quiet && !cli.json {
                eprintln!("{} no findings table with rows; CSV not written", dim("∅"));
            }
        }
    }
    Ok(())
}
