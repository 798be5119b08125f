//! Per-run extraction state.

use super::{Diagnostic, ExtractError, Fact, FactSink, Label, LabelRegistry};
use crate::ast::{AstContext, AstNode, NodeKey};
use std::collections::HashSet;

/// Everything one extraction run owns: the AST being walked, its labels,
/// which nodes were already routed to a visitor, and the facts and
/// diagnostics produced so far.
///
/// Runs never share a context, so concurrent runs are independent.
#[derive(Debug)]
pub struct ExtractionContext<'ast> {
    ast: &'ast AstContext,
    registry: LabelRegistry,
    dispatched: HashSet<NodeKey>,
    sink: FactSink,
    diagnostics: Vec<Diagnostic>,
}

impl<'ast> ExtractionContext<'ast> {
    pub fn new(ast: &'ast AstContext) -> Self {
        Self {
            ast,
            registry: LabelRegistry::new(),
            dispatched: HashSet::new(),
            sink: FactSink::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn ast(&self) -> &'ast AstContext {
        self.ast
    }

    pub fn fetch_label(&mut self, node: AstNode) -> Result<Label, ExtractError> {
        self.registry.fetch(node.key())
    }

    pub fn lookup_label(&self, node: AstNode) -> Option<Label> {
        self.registry.lookup(node.key())
    }

    /// Record that `node` is being routed. Returns false if it already was.
    pub fn mark_dispatched(&mut self, node: AstNode) -> bool {
        self.dispatched.insert(node.key())
    }

    pub fn is_dispatched(&self, node: AstNode) -> bool {
        self.dispatched.contains(&node.key())
    }

    pub fn emit(&mut self, fact: Fact) {
        self.sink.emit(fact);
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn facts(&self) -> &[Fact] {
        self.sink.facts()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the context into its facts, diagnostics and label count.
    pub fn into_parts(self) -> (Vec<Fact>, Vec<Diagnostic>, usize) {
        let labels = self.registry.len();
        (self.sink.into_facts(), self.diagnostics, labels)
    }
}
