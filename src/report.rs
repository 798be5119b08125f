//! Output formatting for extraction results.
//!
//! Supports three output formats:
//! - Pretty: colored per-file summary for the terminal
//! - JSON: every fact and diagnostic, for programmatic consumption
//! - TRAP: one `relation(args)` line per fact, for loading into a fact store

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::extract::{Diagnostic, ExtractionOutput, Fact, Severity};

// =============================================================================
// TRAP Format
// =============================================================================

/// Write facts in TRAP form, one file after another.
pub fn write_trap<W: Write>(out: &mut W, outputs: &[ExtractionOutput]) -> anyhow::Result<()> {
    for output in outputs {
        writeln!(out, "// {}", output.path)?;
        for fact in &output.facts {
            writeln!(out, "{}", fact)?;
        }
    }
    Ok(())
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: String,
    pub files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
pub struct JsonFile<'a> {
    pub path: &'a str,
    pub labels: usize,
    pub has_parse_errors: bool,
    pub facts: &'a [Fact],
    pub diagnostics: &'a [Diagnostic],
}

pub fn write_json<W: Write>(out: &mut W, outputs: &[ExtractionOutput]) -> anyhow::Result<()> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        files: outputs
            .iter()
            .map(|o| JsonFile {
                path: &o.path,
                labels: o.label_count,
                has_parse_errors: o.has_parse_errors,
                facts: &o.facts,
                diagnostics: &o.diagnostics,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

pub fn write_pretty<W: Write>(
    out: &mut W,
    root: &str,
    config_path: Option<&str>,
    outputs: &[ExtractionOutput],
) -> anyhow::Result<()> {
    // Header
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "swiftfacts".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Extracting: ".dimmed(), root)?;
    writeln!(
        out,
        "  {}{}",
        "Config:     ".dimmed(),
        config_path.unwrap_or("(defaults)")
    )?;
    writeln!(out)?;

    for output in outputs {
        write_file_summary(out, output)?;
    }

    write_totals(out, outputs)?;
    writeln!(out)?;
    Ok(())
}

fn write_file_summary<W: Write>(out: &mut W, output: &ExtractionOutput) -> anyhow::Result<()> {
    let status = if output.has_parse_errors {
        "✗".red()
    } else if output.diagnostics.is_empty() {
        "✓".green()
    } else {
        "!".yellow()
    };
    writeln!(
        out,
        "  {} {}  {}",
        status,
        output.path.blue(),
        format!(
            "{} facts, {} labels",
            output.facts.len(),
            output.label_count
        )
        .dimmed()
    )?;

    for diagnostic in &output.diagnostics {
        write!(out, "      ")?;
        write_severity_tag(out, diagnostic.severity)?;
        let location = diagnostic
            .span
            .map(|s| format!(":{}", s.start_line))
            .unwrap_or_default();
        writeln!(
            out,
            " {}{}  {} {}",
            output.path,
            location.dimmed(),
            diagnostic.message,
            diagnostic.label.to_string().dimmed()
        )?;
    }
    Ok(())
}

fn write_severity_tag<W: Write>(out: &mut W, severity: Severity) -> anyhow::Result<()> {
    match severity {
        Severity::Error => write!(out, "{}", "ERROR".red())?,
        Severity::Warning => write!(out, "{}", "WARN ".yellow())?,
        Severity::Info => write!(out, "{}", "INFO ".blue())?,
    }
    Ok(())
}

fn write_totals<W: Write>(out: &mut W, outputs: &[ExtractionOutput]) -> anyhow::Result<()> {
    let facts: usize = outputs.iter().map(|o| o.facts.len()).sum();
    let labels: usize = outputs.iter().map(|o| o.label_count).sum();

    let mut by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
    for diagnostic in outputs.iter().flat_map(|o| &o.diagnostics) {
        *by_severity.entry(diagnostic.severity).or_default() += 1;
    }

    writeln!(out)?;
    writeln!(
        out,
        "  {} {} files, {} facts, {} labels",
        "Extracted".bold(),
        outputs.len(),
        facts,
        labels
    )?;
    if !by_severity.is_empty() {
        let parts: Vec<String> = by_severity
            .iter()
            .map(|(severity, count)| format!("{} {}", count, severity))
            .collect();
        writeln!(out, "  {} {}", "Diagnostics".bold(), parts.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_source;
    use crate::visitors::VisitorOptions;

    fn sample() -> Vec<ExtractionOutput> {
        let options = VisitorOptions {
            emit_locations: false,
        };
        vec![extract_source("main.swift", b"import Foundation\n", options).unwrap()]
    }

    #[test]
    fn test_trap_lines() {
        let mut buf = Vec::new();
        write_trap(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "// main.swift");
        assert_eq!(lines[1], "import_decls(#1, \"Foundation\")");
    }

    #[test]
    fn test_json_report_shape() {
        let mut buf = Vec::new();
        write_json(&mut buf, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let file = &value["files"][0];
        assert_eq!(file["path"], "main.swift");
        assert_eq!(file["labels"], 1);
        assert_eq!(file["facts"][0]["relation"], "import_decls");
        assert_eq!(file["facts"][0]["args"][0], "#1");
        assert_eq!(file["facts"][0]["args"][1], "Foundation");
    }

    #[test]
    fn test_pretty_lists_diagnostics() {
        colored::control::set_override(false);
        let options = VisitorOptions::default();
        let outputs =
            vec![extract_source("dict.swift", b"let d = [1: 2]\n", options).unwrap()];
        let mut buf = Vec::new();
        write_pretty(&mut buf, ".", None, &outputs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("dict.swift"));
        assert!(text.contains("(defaults)"));
        assert!(text.contains("WARN"));
        assert!(text.contains("1 files"));
    }
}
