//! Output rendering for the CLI.

use crate::check::FileReport;
use crate::cli::OutputFormat;
use serde_json::json;
use std::fmt::Write;
use stencil_analysis::{ContextClassification, Diagnostic, Position};

pub fn render(reports: &[FileReport], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(reports)),
        OutputFormat::Json => render_json(reports),
    }
}

/// `path:line:col: severity[code]: message`, one-based, then a summary line.
fn render_text(reports: &[FileReport]) -> String {
    let mut text = String::new();
    for report in reports {
        for diagnostic in &report.diagnostics {
            let start = diagnostic.range.start;
            let _ = writeln!(
                text,
                "{}:{}:{}: {}[{}]: {}",
                report.path.display(),
                start.line + 1,
                start.column + 1,
                diagnostic.severity.as_str(),
                diagnostic.code.code(),
                diagnostic.message
            );
        }
    }
    let (errors, warnings) = count(reports);
    let _ = writeln!(
        text,
        "checked {} file(s): {errors} error(s), {warnings} warning(s)",
        reports.len()
    );
    text
}

fn render_json(reports: &[FileReport]) -> anyhow::Result<String> {
    let files = reports
        .iter()
        .map(|report| {
            json!({
                "path": report.path.display().to_string(),
                "diagnostics": report.diagnostics.iter().map(diagnostic_json).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();
    let (errors, warnings) = count(reports);
    let payload = json!({
        "version": 1,
        "summary": {
            "files": reports.len(),
            "errors": errors,
            "warnings": warnings,
        },
        "files": files,
    });
    let mut text = serde_json::to_string_pretty(&payload)?;
    text.push('\n');
    Ok(text)
}

fn diagnostic_json(diagnostic: &Diagnostic) -> serde_json::Value {
    json!({
        "code": diagnostic.code.code(),
        "severity": diagnostic.severity.as_str(),
        "message": diagnostic.message,
        "source": diagnostic.source,
        "range": {
            "start": position_json(diagnostic.range.start),
            "end": position_json(diagnostic.range.end),
        },
        "offsets": {
            "start": u32::from(diagnostic.offsets.start()),
            "end": u32::from(diagnostic.offsets.end()),
        },
    })
}

/// One-based, like the text output.
fn position_json(position: Position) -> serde_json::Value {
    json!({ "line": position.line + 1, "column": position.column + 1 })
}

fn count(reports: &[FileReport]) -> (usize, usize) {
    reports
        .iter()
        .flat_map(|report| &report.diagnostics)
        .fold((0, 0), |(errors, warnings), diagnostic| {
            if diagnostic.is_error() {
                (errors + 1, warnings)
            } else {
                (errors, warnings + 1)
            }
        })
}

pub fn render_context(classification: &ContextClassification) -> String {
    let source = match classification.source {
        stencil_analysis::ClassificationSource::Tree => "tree",
        stencil_analysis::ClassificationSource::Text => "text",
    };
    match &classification.node {
        Some(node) => format!(
            "{} ({source}, node {:?}@{:?})",
            classification.kind,
            node.kind(),
            node.text_range()
        ),
        None => format!("{} ({source})", classification.kind),
    }
}
