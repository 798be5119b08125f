//! Extraction core: labels, dispatch and fact collection.
//!
//! A run walks one [`AstContext`](crate::ast::AstContext) through a
//! [`Dispatcher`], assigning every reachable node a [`Label`] and routing
//! it once to the visitor of its category. Visitors describe the node as
//! [`Fact`]s that refer to other nodes by label.

mod context;
mod diagnostics;
mod dispatcher;
mod driver;
mod facts;
mod label;
mod swift_visitor;

pub use context::ExtractionContext;
pub use diagnostics::{Diagnostic, Severity};
pub use dispatcher::Dispatcher;
pub use driver::{extract_lowered, extract_source, Extractor};
pub(crate) use facts::fact;
pub use facts::{Fact, FactSink, FactValue};
pub use label::{Label, LabelRegistry};
pub use swift_visitor::SwiftVisitor;

use crate::ast::NodeKey;
use serde::Serialize;
use thiserror::Error;

/// Fatal extraction errors. Anything else is recovered as a [`Diagnostic`].
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("identity collision: label {label} is bound to {existing} but was assigned to {new}")]
    IdentityCollision {
        label: Label,
        existing: NodeKey,
        new: NodeKey,
    },
}

/// Result of extracting one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionOutput {
    /// Path relative to the project root
    pub path: String,
    pub facts: Vec<Fact>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of distinct labels assigned
    pub label_count: usize,
    pub has_parse_errors: bool,
}

impl ExtractionOutput {
    /// Facts of one relation, in emission order.
    pub fn facts_for<'a>(&'a self, relation: &'a str) -> impl Iterator<Item = &'a Fact> + 'a {
        self.facts.iter().filter(move |f| f.relation == relation)
    }

    /// True when nothing had to be reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && !self.has_parse_errors
    }
}
