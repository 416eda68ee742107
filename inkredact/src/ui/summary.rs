//! Per-document and per-batch summary tables.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::io::{self, Write};

use inkredact_core::{DocumentReport, PiiCategory};

use crate::ui::output_format::paint;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Outcome of one document in a batch, as shown to the user.
#[derive(Debug)]
pub enum DocumentStatus<'a> {
    Done(&'a DocumentReport),
    Failed { document: String, error: String },
}

fn base_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(*h)));
    table
}

/// Renders the detailed summary for a single processed document.
pub fn render_document_table(report: &DocumentReport) -> Table {
    let stats = &report.redaction_stats;
    let conf = &report.ocr.confidence;
    let mut table = base_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Text blocks"), Cell::new(stats.total_blocks)]);
    table.add_row(vec![
        Cell::new("OCR confidence (avg / min / max)"),
        Cell::new(format!("{:.2} / {:.2} / {:.2}", conf.avg, conf.min, conf.max)),
    ]);
    for category in PiiCategory::ALL {
        table.add_row(vec![
            Cell::new(format!("PII: {category}")),
            Cell::new(report.pii_detected.get(category).len()),
        ]);
    }
    table.add_row(vec![Cell::new("PII blocks"), Cell::new(stats.pii_blocks)]);
    table.add_row(vec![Cell::new("Redacted in image"), Cell::new(stats.redacted_blocks)]);
    table.add_row(vec![
        Cell::new("Flagged for review"),
        Cell::new(stats.low_conf_pii_blocks),
    ]);
    table
}

/// Renders one row per document for a batch run.
pub fn render_batch_table(rows: &[DocumentStatus<'_>]) -> Table {
    let mut table = base_table(&["Document", "Blocks", "PII", "Redacted", "Flagged", "Status"]);
    for row in rows {
        match row {
            DocumentStatus::Done(report) => {
                let s = &report.redaction_stats;
                let status = if report.warnings.is_empty() {
                    "ok".to_string()
                } else {
                    format!("{} warning(s)", report.warnings.len())
                };
                table.add_row(vec![
                    Cell::new(&report.document_name),
                    Cell::new(s.total_blocks),
                    Cell::new(s.pii_blocks),
                    Cell::new(s.redacted_blocks),
                    Cell::new(s.low_conf_pii_blocks),
                    Cell::new(status),
                ]);
            }
            DocumentStatus::Failed { document, error } => {
                table.add_row(vec![
                    Cell::new(document),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!("failed: {error}")),
                ]);
            }
        }
    }
    table
}

/// Prints the artifact paths and table for one document.
pub fn print_document_summary<W: Write>(
    writer: &mut W,
    report: &DocumentReport,
    report_path: &std::path::Path,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}",
        paint(&format!("=== {} ===", report.document_name), ThemeEntry::Header, theme, enable_colors)
    )?;
    let paths = &report.output_paths;
    for (label, path) in [
        ("Clean text", &paths.clean_text),
        ("PII JSON", &paths.pii_json),
        ("Redacted text", &paths.redacted_text),
        ("Redacted image", &paths.redacted_image),
        ("OCR preview", &paths.ocr_preview_image),
    ] {
        writeln!(
            writer,
            "  {label:<15}{}",
            paint(&path.display().to_string(), ThemeEntry::Path, theme, enable_colors)
        )?;
    }
    writeln!(
        writer,
        "  {:<15}{}",
        "Report",
        paint(&report_path.display().to_string(), ThemeEntry::Path, theme, enable_colors)
    )?;
    writeln!(writer, "{}", render_document_table(report))?;

    let stats = &report.redaction_stats;
    writeln!(
        writer,
        "{} redacted, {} flagged for manual review.",
        paint(&stats.redacted_blocks.to_string(), ThemeEntry::Redacted, theme, enable_colors),
        paint(&stats.low_conf_pii_blocks.to_string(), ThemeEntry::Flagged, theme, enable_colors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkredact_core::{
        assemble_report, ArtifactPaths, ConfidenceSummary, PiiFindingSet, RedactionStats,
        ReportInputs,
    };
    use std::path::Path;

    fn report() -> DocumentReport {
        let mut findings = PiiFindingSet::new();
        findings.insert(PiiCategory::Email, "jane@x.com");
        let stats = RedactionStats {
            total_blocks: 3,
            pii_blocks: 2,
            redacted_blocks: 1,
            low_conf_pii_blocks: 1,
        };
        assemble_report(ReportInputs {
            document_name: "intake.jpg",
            threshold: 0.4,
            confidence: ConfidenceSummary { avg: 0.6, min: 0.3, max: 0.9 },
            findings: &findings,
            stats,
            output_paths: &ArtifactPaths::for_document(Path::new("outputs"), "intake"),
            input_sha256: None,
        })
    }

    #[test]
    fn test_document_summary_lists_paths_and_counts() {
        let report = report();
        let mut buf = Vec::new();
        print_document_summary(
            &mut buf,
            &report,
            Path::new("outputs/intake_report.json"),
            &crate::ui::theme::ThemeStyle::default_theme_map(),
            false,
        )
        .unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("=== intake.jpg ==="));
        assert!(out.contains("outputs/intake_redacted.png"));
        assert!(out.contains("outputs/intake_report.json"));
        assert!(out.contains("0.60 / 0.30 / 0.90"));
        assert!(out.contains("1 redacted, 1 flagged for manual review."));
    }

    #[test]
    fn test_batch_table_marks_failures() {
        let report = report();
        let rows = [
            DocumentStatus::Done(&report),
            DocumentStatus::Failed {
                document: "broken.jpg".to_string(),
                error: "unreadable".to_string(),
            },
        ];
        let rendered = render_batch_table(&rows).to_string();
        assert!(rendered.contains("intake.jpg"));
        assert!(rendered.contains("1 warning(s)"));
        assert!(rendered.contains("failed: unreadable"));
    }
}
