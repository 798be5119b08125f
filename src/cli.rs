//! Command-line interface for swiftfacts.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{self, Config};
use crate::extract::{ExtractionOutput, Extractor};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never worth descending into.
const SKIPPED_DIRS: &[&str] = &[".build", "Pods", "Carthage", "DerivedData"];

/// Test directories, skipped unless test files are included.
const TEST_DIRS: &[&str] = &["Tests", "tests", "UITests", "testdata"];

/// Extract relational facts from Swift sources.
///
/// Every declaration, statement, expression, pattern and type in the input
/// gets a stable label, and its structure is written out as facts over those
/// labels, ready to load into a fact store.
#[derive(Parser)]
#[command(name = "swiftfacts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract facts from a file or directory
    Extract(ExtractArgs),
    /// Write a default swiftfacts.yaml
    Init(InitArgs),
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// File or directory to extract
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or trap (overrides the config)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not emit `locations` facts
    #[arg(long)]
    pub no_locations: bool,

    /// Extract files one at a time
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "swiftfacts.yaml")]
    pub output: PathBuf,
}

fn is_test_file(path: &Path) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    stem.ends_with("Tests") || stem.ends_with("Test")
}

/// Collect `.swift` files under `root`.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let excluded = config.excluded_matcher()?;
    let include_tests = config.include_test_files;
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() || e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                return false;
            }
            include_tests || !TEST_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("swift") {
            continue;
        }
        if !include_tests && is_test_file(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if excluded.is_match(relative) {
            debug!(path = %relative.display(), "excluded");
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the extract command.
pub fn run_extract(args: &ExtractArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let config_path = args.config.clone().or_else(|| Config::discover(&cwd));
    let mut config = match Config::load(config_path.as_deref(), &cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if let Some(format) = &args.format {
        config.output = format.clone();
    }
    if args.no_locations {
        config.emit_locations = false;
    }
    if args.sequential {
        config.parallel = false;
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let (base_dir, files) = if abs_path.is_dir() {
        let files = collect_files(&abs_path, &config)?;
        (abs_path.clone(), files)
    } else {
        let base = abs_path.parent().map(Path::to_path_buf).unwrap_or_default();
        (base, vec![abs_path.clone()])
    };

    if files.is_empty() {
        eprintln!("Warning: no Swift files to extract");
        return Ok(EXIT_SUCCESS);
    }

    let extractor = Extractor::new(&base_dir, config.visitor_options());
    let show_progress = config.output == "pretty" && args.output.is_none() && files.len() > 1;
    let outputs = extract_all(&extractor, &files, config.parallel, show_progress);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let root = args.path.to_string_lossy();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());
    match config.output.as_str() {
        "json" => report::write_json(&mut out, &outputs)?,
        "trap" => report::write_trap(&mut out, &outputs)?,
        _ => report::write_pretty(&mut out, &root, config_str.as_deref(), &outputs)?,
    }
    out.flush()?;

    let failed = extractor.failed_count();
    if failed > 0 {
        eprintln!("Error: {} file(s) could not be extracted", failed);
    }
    Ok(exit_code(&outputs, failed))
}

/// Skipped files are errors; diagnostics or parse errors are failures.
fn exit_code(outputs: &[ExtractionOutput], failed: usize) -> i32 {
    if failed > 0 {
        EXIT_ERROR
    } else if outputs.iter().all(ExtractionOutput::is_clean) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    }
}

fn extract_all(
    extractor: &Extractor,
    files: &[PathBuf],
    parallel: bool,
    show_progress: bool,
) -> Vec<ExtractionOutput> {
    if !show_progress {
        return if parallel {
            extractor.extract_files_parallel(files)
        } else {
            extractor.extract_files(files)
        };
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("  {spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    // Extract one chunk at a time so the bar advances; the cache makes the
    // final collecting pass free.
    for chunk in files.chunks(16) {
        if parallel {
            extractor.extract_files_parallel(chunk);
        } else {
            extractor.extract_files(chunk);
        }
        bar.inc(chunk.len() as u64);
    }
    bar.finish_and_clear();
    extractor.extract_files(files)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: swiftfacts extract . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "let x = 1\n").unwrap();
    }

    #[test]
    fn test_collect_skips_build_and_tests() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Sources/App/main.swift");
        touch(dir.path(), "Sources/App/README.md");
        touch(dir.path(), ".build/debug/Gen.swift");
        touch(dir.path(), "Tests/AppTests/AppTests.swift");
        touch(dir.path(), "Sources/App/ModelTests.swift");

        let files = collect_files(dir.path(), &Config::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Sources/App/main.swift"));

        let config = Config {
            include_test_files: true,
            ..Config::default()
        };
        let files = collect_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_collect_applies_excluded_paths() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Sources/App/main.swift");
        touch(dir.path(), "Sources/Generated/Api.swift");

        let config = Config {
            excluded_paths: vec!["**/Generated/**".to_string()],
            ..Config::default()
        };
        let files = collect_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.swift"));
    }

    #[test]
    fn test_init_writes_template_once() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs {
            output: dir.path().join("conf/swiftfacts.yaml"),
        };
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert!(Config::parse_file(&args.output).is_ok());
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_extract_exit_codes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "clean.swift");
        let report = dir.path().join("out.trap");
        let args = ExtractArgs {
            path: dir.path().join("clean.swift"),
            config: None,
            format: Some("trap".to_string()),
            output: Some(report.clone()),
            no_locations: true,
            sequential: true,
        };
        assert_eq!(run_extract(&args).unwrap(), EXIT_SUCCESS);
        let text = fs::read_to_string(&report).unwrap();
        assert!(text.starts_with("// clean.swift"));

        fs::write(dir.path().join("broken.swift"), "func broken( {\n").unwrap();
        let args = ExtractArgs {
            path: dir.path().join("broken.swift"),
            ..args
        };
        assert_eq!(run_extract(&args).unwrap(), EXIT_FAILED);

        let args = ExtractArgs {
            format: Some("xml".to_string()),
            ..args
        };
        assert_eq!(run_extract(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_skipped_files_are_errors() {
        let clean = vec![crate::extract::extract_source(
            "ok.swift",
            b"let ok = true\n",
            crate::visitors::VisitorOptions::default(),
        )
        .unwrap()];
        assert_eq!(exit_code(&clean, 0), EXIT_SUCCESS);
        assert_eq!(exit_code(&clean, 1), EXIT_ERROR);
        assert_eq!(exit_code(&[], 2), EXIT_ERROR);
    }
}
