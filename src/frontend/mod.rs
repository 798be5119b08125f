//! Swift frontend: tree-sitter parsing and lowering into the AST.
//!
//! The frontend is shallow. It models the constructs the
//! visitors have facts for, turns everything else into `Unknown` nodes that
//! keep their children, and resolves names and types syntactically.

mod lower;

pub use lower::LoweredFile;

use std::path::Path;

use once_cell::sync::OnceCell;
use tree_sitter::{Language, Parser};

/// A parsed tree-sitter tree and the source it was parsed from.
pub struct ParsedFile {
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Whether the tree contains syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

pub struct SwiftFrontend {
    language: Language,
}

static FRONTEND: OnceCell<SwiftFrontend> = OnceCell::new();

impl Default for SwiftFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl SwiftFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_swift::LANGUAGE.into(),
        }
    }

    /// Process-wide frontend instance. Holds only the grammar, no run state.
    pub fn shared() -> &'static SwiftFrontend {
        FRONTEND.get_or_init(SwiftFrontend::new)
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse `source`. Syntax errors leave ERROR nodes in the tree rather
    /// than failing.
    pub fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.display().to_string(),
        })
    }

    /// Lower a parsed file into an AST.
    pub fn lower(&self, parsed: &ParsedFile) -> LoweredFile {
        lower::lower(parsed)
    }

    /// Parse and lower in one step.
    pub fn load(&self, path: &Path, source: &[u8]) -> anyhow::Result<LoweredFile> {
        let parsed = self.parse(path, source)?;
        Ok(self.lower(&parsed))
    }
}
