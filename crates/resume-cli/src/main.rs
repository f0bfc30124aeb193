use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use resume_core::config_file::{ConfigFile, load_config};
use resume_core::{Capabilities, ParsedResume, PipelineConfig};
use resume_ingest::{ResumePipeline, TesseractOcr, TextExtractor};
use resume_parsing::{FieldExtractor, ParsingConfigBuilder};

mod output;

use output::ColorMode;

const PREVIEW_CHARS: usize = 1000;

/// Resume Parser - Extract structured fields from PDF resumes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log filter when RUST_LOG is unset (e.g. "info", "resume_ingest=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a PDF resume and print the structured result as JSON
    Parse {
        /// Path to the PDF resume
        file_path: PathBuf,

        /// Show a preview of the extracted text
        #[arg(short, long)]
        verbose: bool,

        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip dynamic field discovery
        #[arg(long)]
        no_dynamic: bool,

        /// Never fall back to OCR
        #[arg(long)]
        no_ocr: bool,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the cleaned text extracted from a PDF
    Text {
        /// Path to the PDF resume
        file_path: PathBuf,

        /// Never fall back to OCR
        #[arg(long)]
        no_ocr: bool,
    },

    /// Run field extraction over an already-extracted text file
    Fields {
        /// Path to a UTF-8 text file
        file_path: PathBuf,

        /// Skip dynamic field discovery
        #[arg(long)]
        no_dynamic: bool,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    // Dropping the guard flushes buffered log lines.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let file = load_config();

    match cli.command {
        Command::Parse {
            file_path,
            verbose,
            output,
            no_dynamic,
            no_ocr,
            compact,
            no_color,
        } => {
            let config = pipeline_config(&file, no_dynamic, no_ocr);
            let pipeline = build_pipeline(&file, &config)?;
            parse(&pipeline, &file_path, verbose, output, compact, ColorMode(!no_color))
        }
        Command::Text { file_path, no_ocr } => {
            let config = pipeline_config(&file, true, no_ocr);
            text(&config, &file_path)
        }
        Command::Fields {
            file_path,
            no_dynamic,
            compact,
        } => {
            let config = pipeline_config(&file, no_dynamic, true);
            let pipeline = build_pipeline(&file, &config)?;
            let text = std::fs::read_to_string(&file_path)
                .with_context(|| format!("Failed to read {}", file_path.display()))?;
            let resume = pipeline.parse_text(&text);
            write_json(&resume, None, compact)
        }
    }
}

fn init_logging(level: &str, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut guard = None;
    let file_layer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, worker) = tracing_appender::non_blocking(file);
            guard = Some(worker);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(filter()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter()),
        )
        .with(file_layer)
        .init();
    Ok(guard)
}

/// File settings with CLI switches applied on top.
fn pipeline_config(file: &ConfigFile, no_dynamic: bool, no_ocr: bool) -> PipelineConfig {
    let mut config = PipelineConfig::from_config_file(file);
    if no_dynamic {
        config.discovery_enabled = false;
    }
    if no_ocr {
        config.ocr_enabled = false;
    }
    config
}

fn capabilities(file: &ConfigFile, config: &PipelineConfig) -> Capabilities {
    let mut caps = resume_discovery::builtin_capabilities();
    if !file.discovery_toggle(|d| d.clustering) {
        caps = caps.without_clusterer();
    }
    if !file.discovery_toggle(|d| d.entities) {
        caps = caps.without_entity_recognizer();
    }
    if !file.discovery_toggle(|d| d.topics) {
        caps = caps.without_topic_modeler();
    }
    if config.ocr_enabled {
        caps = caps.with_ocr(Arc::new(TesseractOcr::new()));
    }
    caps
}

fn field_extractor(file: &ConfigFile) -> anyhow::Result<FieldExtractor> {
    let builder = match &file.dictionaries {
        Some(dicts) => ParsingConfigBuilder::from_dictionaries(dicts),
        None => ParsingConfigBuilder::new(),
    };
    let config = builder.build().context("Invalid parsing configuration")?;
    Ok(FieldExtractor::with_config(config))
}

fn build_pipeline(file: &ConfigFile, config: &PipelineConfig) -> anyhow::Result<ResumePipeline> {
    let caps = capabilities(file, config);
    Ok(ResumePipeline::new(config, caps).with_field_extractor(field_extractor(file)?))
}

fn check_pdf_path(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        anyhow::bail!("Not a PDF file: {}", path.display());
    }
    Ok(())
}

fn parse(
    pipeline: &ResumePipeline,
    file_path: &Path,
    verbose: bool,
    output: Option<PathBuf>,
    compact: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    check_pdf_path(file_path)?;

    let result = pipeline.parse_path(file_path)?;

    let pdf_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let mut err = std::io::stderr().lock();
    output::print_extraction_summary(&mut err, &pdf_name, &result.extracted, color)?;
    if verbose {
        output::print_preview(&mut err, &result.extracted, PREVIEW_CHARS, color)?;
    }
    output::print_field_summary(&mut err, &result.resume, color)?;
    drop(err);

    write_json(&result.resume, output.as_deref(), compact)
}

fn text(config: &PipelineConfig, file_path: &Path) -> anyhow::Result<()> {
    check_pdf_path(file_path)?;
    let mut extractor = TextExtractor::with_default_backends().configured(config);
    if config.ocr_enabled {
        extractor = extractor.with_ocr(Arc::new(TesseractOcr::new()));
    }
    let extracted = extractor.extract(file_path)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", extracted.text)?;
    Ok(())
}

fn write_json(resume: &ParsedResume, output: Option<&Path>, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(resume)?
    } else {
        serde_json::to_string_pretty(resume)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "result written");
        }
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}
