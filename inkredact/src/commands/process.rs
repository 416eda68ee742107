//! `process` command: runs the pipeline over every input and persists the results.
//!
//! Each document runs on its own blocking worker. Workers share one
//! immutable [`Pipeline`]; a failing document does not stop the others.

use anyhow::{anyhow, bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use inkredact_core::{DocumentReport, FragmentFile, PiiExtractor, Pipeline, PipelineConfig};

use crate::cli::ProcessCommand;
use crate::ui::output_format;
use crate::ui::summary::{self, DocumentStatus};
use crate::ui::theme::ThemeMap;
use crate::utils::artifact_writer::write_artifacts;
use crate::utils::inputs::resolve_inputs;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, supports_color);
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), theme, supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, supports_color);
}

fn document_label(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Runs one document end to end, including persistence.
fn process_one(pipeline: &Pipeline, input: &Path, fragments: Option<&Path>) -> Result<DocumentReport> {
    let recognizer = match fragments {
        Some(path) => FragmentFile::new(path),
        None => FragmentFile::sidecar_for(input),
    };
    debug!("Using fragments from {}", recognizer.path().display());
    let doc = pipeline.process(input, &recognizer)?;
    write_artifacts(&doc)?;
    Ok(doc.report)
}

/// Builds the shared pipeline from configuration plus command-line overrides.
pub fn build_pipeline(config: &PipelineConfig, cmd: &ProcessCommand) -> Result<Pipeline> {
    let threshold = cmd.conf_threshold.unwrap_or(config.redaction_threshold);
    let output_dir = cmd.output_dir.clone().unwrap_or_else(|| config.output_dir.clone());
    let rules = config.effective_rules()?;
    let extractor = PiiExtractor::new(&rules).context("Failed to compile PII rules")?;
    info!(
        "Compiled {} PII rules; threshold {}; output directory {}",
        extractor.rules().len(),
        threshold,
        output_dir.display()
    );
    Ok(Pipeline::new(Arc::new(extractor), threshold, output_dir)?)
}

/// Runs `work` for every input on its own blocking worker and returns the
/// results in input order. A worker that panics becomes the error of its own
/// input; the other inputs are unaffected.
pub async fn run_isolated<T, F>(inputs: Vec<PathBuf>, work: F) -> Vec<(PathBuf, Result<T>)>
where
    T: Send + 'static,
    F: Fn(&Path) -> Result<T> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let handles: Vec<_> = inputs
        .iter()
        .cloned()
        .map(|input| {
            let work = Arc::clone(&work);
            tokio::task::spawn_blocking(move || work(&input))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(inputs.len());
    for (input, handle) in inputs.into_iter().zip(handles) {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow!("document worker failed: {e}")),
        };
        outcomes.push((input, result));
    }
    outcomes
}

pub async fn run_process(
    config: &PipelineConfig,
    cmd: &ProcessCommand,
    quiet: bool,
    theme: &ThemeMap,
) -> Result<()> {
    let pipeline = build_pipeline(config, cmd)?;
    let samples_dir = cmd.samples_dir.as_deref().unwrap_or(&config.samples_dir);
    let inputs = resolve_inputs(&cmd.input, samples_dir)?;
    if cmd.fragments.is_some() && inputs.len() != 1 {
        bail!("--fragments can only be used with exactly one --input");
    }

    if !quiet {
        info_msg(
            format!(
                "Processing {} document(s) at confidence threshold {}.",
                inputs.len(),
                pipeline.threshold()
            ),
            theme,
        );
    }
    let output_dir = pipeline.output_dir().to_path_buf();
    let fragments = cmd.fragments.clone();
    let outcomes = run_isolated(inputs, move |input| {
        process_one(&pipeline, input, fragments.as_deref())
    })
    .await;

    let stdout_colors = io::stdout().is_terminal();
    let mut stdout = io::stdout().lock();
    let mut rows: Vec<DocumentStatus<'_>> = Vec::with_capacity(outcomes.len());
    let mut failed = 0usize;

    for (input, result) in &outcomes {
        match result {
            Ok(report) => {
                if !cmd.json && !quiet {
                    summary::print_document_summary(
                        &mut stdout,
                        report,
                        &report.output_paths.report,
                        theme,
                        stdout_colors,
                    )?;
                }
                for warning in &report.warnings {
                    warn_msg(format!("{}: {}", report.document_name, warning), theme);
                }
                rows.push(DocumentStatus::Done(report));
            }
            Err(err) => {
                let document = document_label(input);
                error_msg(format!("Failed to process {document}: {err:#}"), theme);
                failed += 1;
                rows.push(DocumentStatus::Failed { document, error: format!("{err:#}") });
            }
        }
    }

    if cmd.json {
        let reports: Vec<&DocumentReport> = rows
            .iter()
            .filter_map(|row| match row {
                DocumentStatus::Done(report) => Some(*report),
                DocumentStatus::Failed { .. } => None,
            })
            .collect();
        serde_json::to_writer_pretty(&mut stdout, &reports)?;
        writeln!(stdout)?;
    } else if !quiet && rows.len() > 1 {
        writeln!(stdout, "{}", summary::render_batch_table(&rows))?;
    }
    stdout.flush()?;

    if failed > 0 {
        bail!("{} of {} document(s) failed", failed, outcomes.len());
    }
    if !quiet {
        success_msg(
            format!(
                "Processed {} document(s); artifacts written to {}.",
                outcomes.len(),
                output_dir.display()
            ),
            theme,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> ProcessCommand {
        ProcessCommand {
            input: Vec::new(),
            fragments: None,
            conf_threshold: None,
            output_dir: None,
            samples_dir: None,
            json: false,
        }
    }

    #[test]
    fn test_cli_threshold_overrides_config() {
        let config = PipelineConfig::default();
        let mut cmd = command();
        cmd.conf_threshold = Some(0.7);
        cmd.output_dir = Some(PathBuf::from("elsewhere"));
        let pipeline = build_pipeline(&config, &cmd).unwrap();
        assert_eq!(pipeline.threshold(), 0.7);
        assert_eq!(pipeline.output_dir(), Path::new("elsewhere"));
    }

    #[tokio::test]
    async fn test_panicking_worker_fails_only_its_document() {
        let inputs = vec![PathBuf::from("a.png"), PathBuf::from("b.png"), PathBuf::from("c.png")];
        let outcomes = run_isolated(inputs, |input| {
            if input == Path::new("b.png") {
                panic!("worker blew up");
            }
            Ok(document_label(input))
        })
        .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].1.as_ref().unwrap(), "a.png");
        assert_eq!(outcomes[1].0, Path::new("b.png"));
        let err = outcomes[1].1.as_ref().unwrap_err();
        assert!(err.to_string().contains("document worker failed"));
        assert_eq!(outcomes[2].1.as_ref().unwrap(), "c.png");
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let mut cmd = command();
        cmd.conf_threshold = Some(1.5);
        let err = build_pipeline(&PipelineConfig::default(), &cmd).unwrap_err();
        assert!(err.to_string().contains("1.5"));
    }
}
