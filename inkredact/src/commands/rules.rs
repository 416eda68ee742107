//! `rules` command: lists the PII rules in effect after configuration is merged.

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::io::Write;

use inkredact_core::{PiiRuleConfig, PipelineConfig};

pub fn render_rules_table(rules: &PiiRuleConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rule", "Category", "Group", "Case-insensitive", "Description"]);
    for rule in rules.active_rules() {
        table.add_row(vec![
            Cell::new(&rule.name),
            Cell::new(rule.category),
            Cell::new(rule.capture_group),
            Cell::new(if rule.case_insensitive { "yes" } else { "no" }),
            Cell::new(rule.description.as_deref().unwrap_or("")),
        ]);
    }
    table
}

pub fn run_rules<W: Write>(config: &PipelineConfig, writer: &mut W) -> Result<()> {
    let rules = config.effective_rules()?;
    writeln!(writer, "{}", render_rules_table(&rules))?;
    Ok(())
}
