//! Running extraction over source files.
//!
//! One run per file: each file gets its own AST, label registry and fact
//! sink, so files can be extracted in parallel without shared state.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use super::{Dispatcher, ExtractError, ExtractionOutput, SwiftVisitor};
use crate::ast::AstNode;
use crate::frontend::{LoweredFile, SwiftFrontend};
use crate::visitors::VisitorOptions;

/// Extract every top-level declaration of a lowered file, in source order.
pub fn extract_lowered(
    file: &LoweredFile,
    options: VisitorOptions,
) -> Result<ExtractionOutput, ExtractError> {
    let mut visitor = SwiftVisitor::new(&file.ast, options);
    let roots: Vec<AstNode> = file.top_level.iter().map(|&d| AstNode::Decl(d)).collect();
    visitor.extract_all(&roots)?;

    let mut output = visitor.finish();
    output.has_parse_errors = file.has_parse_errors;
    Ok(output)
}

/// Parse, lower and extract one Swift source.
pub fn extract_source(
    path: &str,
    source: &[u8],
    options: VisitorOptions,
) -> anyhow::Result<ExtractionOutput> {
    let lowered = SwiftFrontend::shared().load(Path::new(path), source)?;
    let mut output = extract_lowered(&lowered, options).map_err(|e| {
        debug!(path, error = %e, "extraction aborted");
        e
    })?;
    output.path = path.to_string();

    debug!(
        path,
        facts = output.facts.len(),
        labels = output.label_count,
        diagnostics = output.diagnostics.len(),
        "extracted"
    );
    Ok(output)
}

/// Extraction over the files of one project.
///
/// Outputs are cached by absolute path, so asking for the same file twice
/// does not re-run extraction. Files that fail are remembered so the caller
/// can report them after the batch.
pub struct Extractor {
    base_dir: PathBuf,
    options: VisitorOptions,
    cache: RwLock<HashMap<PathBuf, ExtractionOutput>>,
    failed: RwLock<HashSet<PathBuf>>,
}

impl Extractor {
    pub fn new<P: AsRef<Path>>(base_dir: P, options: VisitorOptions) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            options,
            cache: RwLock::new(HashMap::new()),
            failed: RwLock::new(HashSet::new()),
        }
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn relative(&self, abs_path: &Path) -> String {
        abs_path
            .strip_prefix(&self.base_dir)
            .unwrap_or(abs_path)
            .to_string_lossy()
            .to_string()
    }

    /// Extract a file, or return the cached output.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<ExtractionOutput> {
        let abs_path = self.absolute(path.as_ref());

        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(output) = cache.get(&abs_path) {
                return Ok(output.clone());
            }
        }

        let source = fs::read(&abs_path)?;
        let output = extract_source(&self.relative(&abs_path), &source, self.options)?;

        {
            let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
            cache.insert(abs_path, output.clone());
        }
        Ok(output)
    }

    /// Extract files one after another. Failing files are logged and skipped;
    /// results are sorted by path.
    pub fn extract_files(&self, paths: &[PathBuf]) -> Vec<ExtractionOutput> {
        let results: Vec<_> = paths.iter().map(|p| (p, self.extract_file(p))).collect();
        self.collect(results)
    }

    /// Like [`extract_files`](Self::extract_files), on the rayon pool.
    pub fn extract_files_parallel(&self, paths: &[PathBuf]) -> Vec<ExtractionOutput> {
        use rayon::prelude::*;

        let results: Vec<_> = paths
            .par_iter()
            .map(|p| (p, self.extract_file(p)))
            .collect();
        self.collect(results)
    }

    fn collect(
        &self,
        results: Vec<(&PathBuf, anyhow::Result<ExtractionOutput>)>,
    ) -> Vec<ExtractionOutput> {
        let mut outputs = Vec::new();
        for (path, result) in results {
            match result {
                Ok(output) => outputs.push(output),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    let mut failed = self
                        .failed
                        .write()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    failed.insert(self.absolute(path));
                }
            }
        }
        outputs.sort_by(|a, b| a.path.cmp(&b.path));
        outputs
    }

    /// Number of distinct files skipped because extraction failed.
    pub fn failed_count(&self) -> usize {
        self.failed.read().map(|f| f.len()).unwrap_or(0)
    }

    /// Number of cached outputs.
    pub fn cached_count(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}
