//! This file defines the command-line interface (CLI) for the inkredact
//! application, including all available commands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "inkredact",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact PII from photographed handwritten documents",
    long_about = "inkredact reads scanned or photographed handwritten documents together with their recognised text fragments, finds personally-identifiable information, blacks out high-confidence occurrences in the image, flags low-confidence ones for manual review, and writes an auditable report for every document.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to a pipeline configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", global = true, env = "INKREDACT_CONFIG", help = "Path to a pipeline configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Optional colour theme file (YAML).
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Path to a YAML colour theme for terminal output.")]
    pub theme: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Processes one or more document images.
    #[command(about = "Process document images and write redacted artifacts and reports.")]
    Process(ProcessCommand),

    /// Lists the PII rules that are active after configuration is applied.
    #[command(about = "List the active PII rules.")]
    Rules,
}

/// Arguments for the `process` command.
#[derive(Parser, Debug)]
pub struct ProcessCommand {
    /// Input images. When omitted, every JPEG/PNG in the samples directory is processed.
    #[arg(long, short = 'i', value_name = "FILE", help = "Path to an input image (repeatable).")]
    pub input: Vec<PathBuf>,

    /// Recognition fragments for a single input.
    #[arg(long, short = 'f', value_name = "FILE", help = "Recognition fragment JSON for a single --input (default: <image>.fragments.json).")]
    pub fragments: Option<PathBuf>,

    /// Confidence threshold for image redaction.
    #[arg(long = "conf-threshold", value_name = "TAU", help = "Confidence threshold (0-1) for deciding whether to redact a PII block in the image.")]
    pub conf_threshold: Option<f64>,

    /// Where artifacts are written.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR", help = "Directory for output artifacts.")]
    pub output_dir: Option<PathBuf>,

    /// Directory scanned when no --input is given.
    #[arg(long = "samples-dir", value_name = "DIR", help = "Directory scanned for images when no --input is given.")]
    pub samples_dir: Option<PathBuf>,

    /// Print the document reports as a JSON array on stdout.
    #[arg(long = "json", help = "Print document reports as JSON to stdout instead of the text summary.")]
    pub json: bool,
}
