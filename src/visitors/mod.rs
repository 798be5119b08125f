//! Category visitors.
//!
//! Each visitor turns one node into facts about its label and extracts the
//! node's children through the dispatcher it is handed. Visitors are small
//! `Copy` values; all run state lives in the dispatcher's context.

mod decl;
mod expr;
mod pattern;
mod stmt;
mod types;

pub use decl::DeclVisitor;
pub use expr::ExprVisitor;
pub use pattern::PatternVisitor;
pub use stmt::StmtVisitor;
pub use types::TypeVisitor;

use crate::ast::{AstNode, Span};
use crate::extract::{fact, Diagnostic, Dispatcher, ExtractError, Label};
use tracing::trace;

/// Settings shared by all visitors of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitorOptions {
    /// Emit a `locations` fact for every node with a source span.
    pub emit_locations: bool,
}

impl Default for VisitorOptions {
    fn default() -> Self {
        Self {
            emit_locations: true,
        }
    }
}

fn emit_location(
    d: &mut dyn Dispatcher<'_>,
    options: &VisitorOptions,
    label: Label,
    span: Option<Span>,
) {
    if !options.emit_locations {
        return;
    }
    if let Some(span) = span {
        d.emit(fact!(
            "locations",
            label,
            span.start_line,
            span.start_col,
            span.end_line,
            span.end_col
        ));
    }
}

/// Describe a node the extractor has no dedicated facts for.
///
/// The node keeps its label, gets an `unspecified_elements` fact and a
/// diagnostic, and its children are still extracted so nothing below it
/// goes missing.
fn visit_unknown(
    d: &mut dyn Dispatcher<'_>,
    label: Label,
    node: AstNode,
    kind: &str,
    children: &[AstNode],
) -> Result<(), ExtractError> {
    let category = node.category();
    let (severity, message) = Diagnostic::classify(category, kind);
    trace!(%label, %category, kind, "unspecified element");

    d.emit(fact!(
        "unspecified_elements",
        label,
        category.as_str(),
        kind,
        message.as_str()
    ));
    let span = d.ast().span_of(node);
    d.context_mut().report(Diagnostic {
        label,
        category,
        kind: kind.to_string(),
        message,
        severity,
        span,
    });

    for (index, &child) in children.iter().enumerate() {
        let child_label = d.extract(child)?;
        d.emit(fact!("unspecified_element_children", label, index, child_label));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ast::{AstContext, AstNode};
    use crate::extract::{Dispatcher, ExtractionOutput, Fact, SwiftVisitor};

    use super::VisitorOptions;

    /// Extract `roots` without location facts.
    pub fn run(ast: &AstContext, roots: &[AstNode]) -> ExtractionOutput {
        let mut visitor = SwiftVisitor::new(
            ast,
            VisitorOptions {
                emit_locations: false,
            },
        );
        visitor.extract_all(roots).unwrap();
        visitor.finish()
    }

    pub fn facts<'a>(output: &'a ExtractionOutput, relation: &str) -> Vec<&'a Fact> {
        output.facts.iter().filter(|f| f.relation == relation).collect()
    }
}
