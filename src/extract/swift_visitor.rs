//! The concrete dispatcher: one visitor per category behind a shared
//! extraction context.

use super::{Dispatcher, ExtractError, ExtractionContext, ExtractionOutput, Label};
use crate::ast::{
    AstContext, CaseLabelItemId, DeclId, ExprId, PatternId, StmtConditionId, StmtId, TypeId,
    TypeReprId,
};
use crate::visitors::{
    DeclVisitor, ExprVisitor, PatternVisitor, StmtVisitor, TypeVisitor, VisitorOptions,
};

/// Ensemble of the category visitors for Swift.
///
/// Visitors hold no reference back to the ensemble; each visit is handed
/// the ensemble itself as the dispatcher to extract children through.
pub struct SwiftVisitor<'ast> {
    cx: ExtractionContext<'ast>,
    decls: DeclVisitor,
    stmts: StmtVisitor,
    exprs: ExprVisitor,
    patterns: PatternVisitor,
    types: TypeVisitor,
}

impl<'ast> SwiftVisitor<'ast> {
    pub fn new(ast: &'ast AstContext, options: VisitorOptions) -> Self {
        Self {
            cx: ExtractionContext::new(ast),
            decls: DeclVisitor::new(options),
            stmts: StmtVisitor::new(options),
            exprs: ExprVisitor::new(options),
            patterns: PatternVisitor::new(options),
            types: TypeVisitor::new(options),
        }
    }

    /// End the run. The path and parse-error flag are left for the caller.
    pub fn finish(self) -> ExtractionOutput {
        let (facts, diagnostics, label_count) = self.cx.into_parts();
        ExtractionOutput {
            path: String::new(),
            facts,
            diagnostics,
            label_count,
            has_parse_errors: false,
        }
    }
}

impl<'ast> Dispatcher<'ast> for SwiftVisitor<'ast> {
    fn context(&self) -> &ExtractionContext<'ast> {
        &self.cx
    }

    fn context_mut(&mut self) -> &mut ExtractionContext<'ast> {
        &mut self.cx
    }

    fn visit_decl(&mut self, decl: DeclId, label: Label) -> Result<(), ExtractError> {
        let visitor = self.decls;
        visitor.visit(self, decl, label)
    }

    fn visit_stmt(&mut self, stmt: StmtId, label: Label) -> Result<(), ExtractError> {
        let visitor = self.stmts;
        visitor.visit(self, stmt, label)
    }

    fn visit_stmt_condition(
        &mut self,
        condition: StmtConditionId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let visitor = self.stmts;
        visitor.visit_condition(self, condition, label)
    }

    fn visit_case_label_item(
        &mut self,
        item: CaseLabelItemId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let visitor = self.stmts;
        visitor.visit_case_label_item(self, item, label)
    }

    fn visit_expr(&mut self, expr: ExprId, label: Label) -> Result<(), ExtractError> {
        let visitor = self.exprs;
        visitor.visit(self, expr, label)
    }

    fn visit_pattern(&mut self, pattern: PatternId, label: Label) -> Result<(), ExtractError> {
        let visitor = self.patterns;
        visitor.visit(self, pattern, label)
    }

    fn visit_type(&mut self, ty: TypeId, label: Label) -> Result<(), ExtractError> {
        let visitor = self.types;
        visitor.visit(self, ty, label)
    }

    fn visit_type_repr(
        &mut self,
        repr: TypeReprId,
        resolved: Option<TypeId>,
        label: Label,
    ) -> Result<(), ExtractError> {
        let visitor = self.types;
        visitor.visit_repr(self, repr, resolved, label)
    }
}
