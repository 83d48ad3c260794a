//! Rendering and writing validation reports.
//!
//! Two renderings of the same [`ValidationReport`]:
//!
//! - [`ReportFormat::Text`] - a per-section summary table followed by every
//!   blocking artifact and its reasons, colored for terminals
//! - [`ReportFormat::Json`] - the full report document for automation:
//!
//! ```json
//! {
//!   "generatedAt": "2026-01-01T00:00:00Z",
//!   "organization": "acme",
//!   "summary": [{"section": "apis", "total": 2, "importable": 1, "blocked": 1, "already_imported": 0}],
//!   "orgConfig": {}, "envConfig": {}, "apis": [], "sharedflows": []
//! }
//! ```

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;

use crate::core::AssessError;
use crate::models::{ArtifactRecord, Reason, SectionSummary, ValidationReport};

/// Output format of the `assess` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary with colors
    #[default]
    Text,
    /// The full report as JSON
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization: Option<&'a str>,
    summary: Vec<SectionSummary>,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

/// Render `report` in `format`.
pub fn render(
    report: &ValidationReport,
    format: ReportFormat,
    organization: Option<&str>,
) -> Result<String, AssessError> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(report, organization),
    }
}

/// The full report document as pretty-printed JSON.
pub fn render_json(report: &ValidationReport, organization: Option<&str>) -> Result<String, AssessError> {
    let document = ReportDocument {
        generated_at: Utc::now(),
        organization,
        summary: report.summary(),
        report,
    };
    serde_json::to_string_pretty(&document).map_err(|e| AssessError::Other {
        message: format!("Failed to serialize report: {e}"),
    })
}

/// Summary table plus the list of blocking artifacts.
pub fn render_text(report: &ValidationReport) -> String {
    let summary = report.summary();
    let mut out = String::new();

    if summary.is_empty() {
        let _ = writeln!(out, "{}", "No artifacts found in the source export".yellow());
        return out;
    }

    let width = summary.iter().map(|s| s.section.len()).max().unwrap_or(0).max("Section".len());
    let _ = writeln!(
        out,
        "{:<width$}  {:>6}  {:>10}  {:>7}  {:>8}",
        "Section".bold(),
        "Total",
        "Importable",
        "Blocked",
        "Imported"
    );
    for section in &summary {
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>10}  {:>7}  {:>8}",
            section.section, section.total, section.importable, section.blocked, section.already_imported
        );
    }

    let blocking = report.blocking();
    out.push('\n');
    if blocking.is_empty() {
        let _ = writeln!(out, "{} All artifacts are importable", "✓".green());
        return out;
    }

    let _ = writeln!(out, "{} {} artifact(s) cannot be imported as-is:", "✗".red(), blocking.len());
    for (section, record) in blocking {
        let _ = writeln!(out, "  {} {}", section.dimmed(), record.name.bold());
        for line in reason_lines(record) {
            let _ = writeln!(out, "      - {line}");
        }
    }
    out
}

/// One human-readable line per problem recorded on `record`.
fn reason_lines(record: &ArtifactRecord) -> Vec<String> {
    let mut lines = Vec::new();
    for reason in &record.reason {
        match reason {
            Reason::Field { key, error_msg } => lines.push(format!("{key}: {error_msg}")),
            Reason::Violations { violations } => lines.extend(violations.iter().cloned()),
            Reason::Platform(detail) => lines.extend(platform_detail_lines(detail)),
        }
    }
    lines
}

/// Platform details usually carry `violations: [{description, ...}]`; anything
/// else is shown as compact JSON.
fn platform_detail_lines(detail: &Value) -> Vec<String> {
    match detail.get("violations").and_then(Value::as_array) {
        Some(violations) if !violations.is_empty() => violations
            .iter()
            .map(|v| match v.get("description").and_then(Value::as_str) {
                Some(description) => description.to_string(),
                None => v.as_str().map_or_else(|| v.to_string(), str::to_string),
            })
            .collect(),
        _ => vec![detail.to_string()],
    }
}

/// Write rendered report `content` to `path`, creating parent directories.
pub async fn write_report(path: &Path, content: &str) -> Result<(), AssessError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AssessError::fs("creating report directory", parent, &e))?;
    }
    tokio::fs::write(path, content).await.map_err(|e| AssessError::fs("writing report", path, &e))
}
