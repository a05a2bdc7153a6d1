//! Shared output formatting for validation results.

use anyhow::Result;
use openapi_lint_core::{Severity, SeverityCounts, ValidationMessage, ValidationReport};
use serde::Serialize;

use crate::OutputFormat;

/// JSON document written by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    summary: SeverityCounts,
    messages: &'a [ValidationMessage],
}

/// Print validation results in the specified format.
pub fn print(report: &ValidationReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &ValidationReport) {
    let counts = report.count_by_severity();

    for message in &report.messages {
        let severity_indicator = match message.severity {
            Severity::Fatal => "\x1b[1;31mfatal\x1b[0m",
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}",
            message.rule_id, message.rule_name, message.location
        );
        println!("  {}: {}", severity_indicator, message.message);
        println!("  = category: {}", message.category);
        println!();
    }

    let summary_color = if counts.fatal + counts.errors > 0 {
        "\x1b[31m"
    } else if counts.warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} fatal, {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color,
        counts.fatal,
        counts.errors,
        counts.warnings,
        counts.infos,
        report.files_checked
    );
}

fn print_json(report: &ValidationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport {
        files_checked: report.files_checked,
        summary: report.count_by_severity(),
        messages: &report.messages,
    })?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &ValidationReport) {
    for message in &report.messages {
        println!("{message}");
    }
}
