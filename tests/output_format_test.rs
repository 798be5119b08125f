//! Tests for the report formats over the testdata fixtures.
//!
//! The JSON and TRAP writers must describe the same facts, and both must be
//! stable across sequential and parallel extraction.

use std::path::PathBuf;

use swiftfacts::extract::{ExtractionOutput, Extractor};
use swiftfacts::report;
use swiftfacts::VisitorOptions;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn fixture_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(testdata_path())
        .expect("should read testdata dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "swift").unwrap_or(false))
        .collect();
    files.sort();
    files
}

fn extract_fixtures(parallel: bool) -> Vec<ExtractionOutput> {
    let extractor = Extractor::new(testdata_path(), VisitorOptions::default());
    let files = fixture_files();
    if parallel {
        extractor.extract_files_parallel(&files)
    } else {
        extractor.extract_files(&files)
    }
}

fn render_trap(outputs: &[ExtractionOutput]) -> String {
    let mut buf = Vec::new();
    report::write_trap(&mut buf, outputs).expect("trap output");
    String::from_utf8(buf).expect("trap is utf-8")
}

#[test]
fn test_outputs_sorted_by_relative_path() {
    let outputs = extract_fixtures(true);
    let paths: Vec<&str> = outputs.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(paths, vec!["broken.swift", "script.swift", "shapes.swift"]);
}

#[test]
fn test_trap_and_json_agree() {
    let outputs = extract_fixtures(false);

    let trap = render_trap(&outputs);
    let fact_lines = trap.lines().filter(|l| !l.starts_with("//")).count();
    let header_lines = trap.lines().filter(|l| l.starts_with("// ")).count();
    assert_eq!(header_lines, outputs.len());

    let mut buf = Vec::new();
    report::write_json(&mut buf, &outputs).expect("json output");
    let json: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

    let files = json["files"].as_array().expect("files array");
    assert_eq!(files.len(), outputs.len());
    let json_facts: usize = files
        .iter()
        .map(|f| f["facts"].as_array().map(Vec::len).unwrap_or(0))
        .sum();
    assert_eq!(fact_lines, json_facts);

    for (file, output) in files.iter().zip(&outputs) {
        assert_eq!(file["labels"], output.label_count);
        assert_eq!(file["has_parse_errors"], output.has_parse_errors);
        assert_eq!(
            file["diagnostics"].as_array().map(Vec::len),
            Some(output.diagnostics.len())
        );
    }
}

#[test]
fn test_trap_lines_are_well_formed() {
    let trap = render_trap(&extract_fixtures(false));
    for line in trap.lines().filter(|l| !l.starts_with("//")) {
        let open = line.find('(').expect("relation followed by (");
        assert!(line.ends_with(')'), "{}", line);
        let relation = &line[..open];
        assert!(
            relation.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
            "{}",
            line
        );
        // Every fact is about a labeled node
        assert!(line[open + 1..].starts_with('#'), "{}", line);
    }
}

#[test]
fn test_parallel_output_matches_sequential() {
    assert_eq!(
        render_trap(&extract_fixtures(true)),
        render_trap(&extract_fixtures(false))
    );
}

#[test]
fn test_json_diagnostics_carry_severity_and_label() {
    let outputs = extract_fixtures(false);
    let mut buf = Vec::new();
    report::write_json(&mut buf, &outputs).expect("json output");
    let json: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");

    for file in json["files"].as_array().expect("files array") {
        for diagnostic in file["diagnostics"].as_array().expect("diagnostics array") {
            let severity = diagnostic["severity"].as_str().expect("severity string");
            assert!(["error", "warning", "info"].contains(&severity));
            let label = diagnostic["label"].as_str().expect("label string");
            assert!(label.starts_with('#'));
        }
    }
}
