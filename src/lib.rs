//! swiftfacts - Swift AST fact extractor.
//!
//! Every node of a Swift AST (declarations, statements, expressions,
//! patterns, types, and the condition and case-label nodes in between) gets
//! exactly one label, and is described by relational facts over labels.
//!
//! # Architecture
//!
//! - `ast`: arena AST with typed ids and interned types
//! - `frontend`: tree-sitter parsing and lowering into the AST
//! - `extract`: labels, the dispatcher and the extraction driver
//! - `visitors`: one visitor per node category, emitting facts
//! - `config`: YAML project configuration
//! - `report`: output formatting (pretty, JSON, TRAP)
//!
//! # Example
//!
//! ```no_run
//! use swiftfacts::{extract_source, VisitorOptions};
//!
//! let output = extract_source("main.swift", b"let x = 1\n", VisitorOptions::default())?;
//! for fact in &output.facts {
//!     println!("{}", fact);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod ast;
pub mod cli;
pub mod config;
pub mod extract;
pub mod frontend;
pub mod report;
pub mod visitors;

pub use ast::{AstContext, AstNode, Category, NodeKey};
pub use config::Config;
pub use extract::{
    extract_lowered, extract_source, Diagnostic, Dispatcher, ExtractError, ExtractionContext,
    ExtractionOutput, Extractor, Fact, FactValue, Label, Severity, SwiftVisitor,
};
pub use frontend::{LoweredFile, SwiftFrontend};
pub use visitors::VisitorOptions;
