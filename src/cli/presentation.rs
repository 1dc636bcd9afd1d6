//! CLI presentation: text and json formatters for merge reports and cube summaries.

use crate::cube::MemCubeConfig;
use crate::error::CubeError;
use crate::merge::observer::redact;
use crate::merge::{MergeEvent, MergeReport};
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use std::path::Path;
use std::str::FromStr;

/// Output format selected with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CubeError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

fn display_value(path: &str, value: Option<&Value>) -> String {
    match value.map(|v| redact(path, v)) {
        None => "-".to_string(),
        Some(Value::String(s)) => s,
        Some(v) => v.to_string(),
    }
}

fn changes_table(report: &MergeReport) -> Option<Table> {
    let mut rows = Vec::new();
    for event in report.changes() {
        match event {
            MergeEvent::FieldOverwritten { path, old, new } => rows.push(vec![
                path.clone(),
                "updated".to_string(),
                display_value(path, old.as_ref()),
                display_value(path, Some(new)),
            ]),
            MergeEvent::MultiDbDowngraded { user_name, db_name } => rows.push(vec![
                "graph_db.use_multi_db".to_string(),
                "downgraded".to_string(),
                "true".to_string(),
                format!("false (user_name={}, db_name={})", user_name, db_name),
            ]),
            _ => {}
        }
    }
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Field", "Action", "Old", "New"]);
    for row in rows {
        table.add_row(row);
    }
    Some(table)
}

/// Render the outcome of a merge or upgrade.
///
/// When the merged record was not written anywhere it is included in the output.
pub fn format_merge_result(
    merged: &MemCubeConfig,
    report: &MergeReport,
    written: Option<&Path>,
    format: OutputFormat,
) -> Result<String, CubeError> {
    if format == OutputFormat::Json {
        let changes: Vec<Value> = report
            .changes()
            .filter_map(|event| match event {
                MergeEvent::FieldOverwritten { path, old, new } => Some(json!({
                    "field": path,
                    "old": old.as_ref().map(|v| redact(path, v)),
                    "new": redact(path, new),
                })),
                _ => None,
            })
            .collect();
        let mut out = json!({
            "user_id": merged.user_id,
            "cube_id": merged.cube_id,
            "written_to": written.map(|p| p.display().to_string()),
            "preserved": report.preserved_paths(),
            "changes": changes,
            "multi_db_downgraded": report.downgraded_multi_db(),
        });
        if written.is_none() {
            out["config"] = serde_json::to_value(merged)?;
        }
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    let title = format!(
        "Merged cube {} (user {})",
        merged.cube_id.as_deref().unwrap_or("-"),
        merged.user_id.as_deref().unwrap_or("-")
    );
    let mut s = format!("{}", title.bold());
    s.push_str(&format!(
        "\n  Preserved: {}",
        report.preserved_paths().join(", ")
    ));
    if report.downgraded_multi_db() {
        s.push_str(&format!(
            "\n  {}",
            "Graph database switched to shared-database mode".yellow()
        ));
    }
    match changes_table(report) {
        Some(table) => s.push_str(&format!("\n\n{}", table)),
        None => s.push_str("\n\nNo field changes."),
    }
    match written {
        Some(path) => s.push_str(&format!("\n\n{} {}", "Wrote".green(), path.display())),
        None => s.push_str(&format!("\n\n{}", merged.to_json_pretty()?)),
    }
    Ok(s)
}

/// One-screen summary of a valid cube config
pub fn format_validate_result(path: &Path, config: &MemCubeConfig) -> String {
    let mut s = format!("{} {}", "Valid cube config:".green(), path.display());
    s.push_str(&format!(
        "\n  user_id: {}\n  cube_id: {}",
        config.user_id.as_deref().unwrap_or("-"),
        config.cube_id.as_deref().unwrap_or("-")
    ));
    if let Some(text_mem) = &config.text_mem {
        s.push_str(&format!("\n  text_mem: {}", text_mem.backend));
    }
    if let Some(graph) = config.graph_db() {
        let mode = if graph.config.use_multi_db {
            format!("dedicated database {}", graph.config.db_name)
        } else {
            format!(
                "shared database {} as {}",
                graph.config.db_name,
                graph.config.user_name.as_deref().unwrap_or("-")
            )
        };
        s.push_str(&format!("\n  graph_db: {} ({})", graph.backend, mode));
    }
    if !config.act_mem.is_empty() {
        s.push_str(&format!("\n  act_mem: {}", config.act_mem.backend));
    }
    if !config.para_mem.is_empty() {
        s.push_str(&format!("\n  para_mem: {}", config.para_mem.backend));
    }
    s
}
