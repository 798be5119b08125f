//! Routing of AST nodes to their category visitor.

use super::{ExtractError, ExtractionContext, Fact, Label};
use crate::ast::{
    AstContext, AstNode, CaseLabelItemId, DeclId, ExprId, PatternId, StmtConditionId, StmtId,
    TypeId, TypeLoc, TypeReprId,
};
use tracing::trace;

/// The extraction facade.
///
/// Implementors supply the per-run context and one visit method per node
/// shape; the provided [`extract`](Dispatcher::extract) assigns labels and
/// makes sure each node reaches its visitor at most once per run. Visitors
/// receive the dispatcher as `&mut dyn Dispatcher` and call back into it
/// to extract children.
pub trait Dispatcher<'ast> {
    fn context(&self) -> &ExtractionContext<'ast>;
    fn context_mut(&mut self) -> &mut ExtractionContext<'ast>;

    fn visit_decl(&mut self, decl: DeclId, label: Label) -> Result<(), ExtractError>;
    fn visit_stmt(&mut self, stmt: StmtId, label: Label) -> Result<(), ExtractError>;
    fn visit_stmt_condition(
        &mut self,
        condition: StmtConditionId,
        label: Label,
    ) -> Result<(), ExtractError>;
    fn visit_case_label_item(
        &mut self,
        item: CaseLabelItemId,
        label: Label,
    ) -> Result<(), ExtractError>;
    fn visit_expr(&mut self, expr: ExprId, label: Label) -> Result<(), ExtractError>;
    fn visit_pattern(&mut self, pattern: PatternId, label: Label) -> Result<(), ExtractError>;
    fn visit_type(&mut self, ty: TypeId, label: Label) -> Result<(), ExtractError>;
    /// A type annotation together with the type it resolved to, if any.
    ///
    /// The label is keyed by the annotation alone, so only the first
    /// request for a repr is routed: its `resolved` is the one visited, and
    /// a later request carrying a different resolution returns the label
    /// without emitting `type_repr_types`.
    fn visit_type_repr(
        &mut self,
        repr: TypeReprId,
        resolved: Option<TypeId>,
        label: Label,
    ) -> Result<(), ExtractError>;

    /// Extract `node` and return its label.
    ///
    /// The first call for a node routes it to the visitor of its category;
    /// later calls only return the label. The node is marked before its
    /// visitor runs, so a child referring back to an ancestor terminates.
    fn extract(&mut self, node: AstNode) -> Result<Label, ExtractError> {
        let label = self.context_mut().fetch_label(node)?;
        if !self.context_mut().mark_dispatched(node) {
            return Ok(label);
        }

        trace!(%label, category = %node.category(), "dispatch");
        match node {
            AstNode::Decl(id) => self.visit_decl(id, label)?,
            AstNode::Stmt(id) => self.visit_stmt(id, label)?,
            AstNode::StmtCondition(id) => self.visit_stmt_condition(id, label)?,
            AstNode::CaseLabelItem(id) => self.visit_case_label_item(id, label)?,
            AstNode::Expr(id) => self.visit_expr(id, label)?,
            AstNode::Pattern(id) => self.visit_pattern(id, label)?,
            AstNode::Type(id) => self.visit_type(id, label)?,
            AstNode::TypeRepr(repr, resolved) => self.visit_type_repr(repr, resolved, label)?,
        }
        Ok(label)
    }

    fn extract_decl(&mut self, id: DeclId) -> Result<Label, ExtractError> {
        self.extract(AstNode::Decl(id))
    }

    fn extract_stmt(&mut self, id: StmtId) -> Result<Label, ExtractError> {
        self.extract(AstNode::Stmt(id))
    }

    fn extract_stmt_condition(&mut self, id: StmtConditionId) -> Result<Label, ExtractError> {
        self.extract(AstNode::StmtCondition(id))
    }

    fn extract_case_label_item(&mut self, id: CaseLabelItemId) -> Result<Label, ExtractError> {
        self.extract(AstNode::CaseLabelItem(id))
    }

    fn extract_expr(&mut self, id: ExprId) -> Result<Label, ExtractError> {
        self.extract(AstNode::Expr(id))
    }

    fn extract_pattern(&mut self, id: PatternId) -> Result<Label, ExtractError> {
        self.extract(AstNode::Pattern(id))
    }

    fn extract_type(&mut self, id: TypeId) -> Result<Label, ExtractError> {
        self.extract(AstNode::Type(id))
    }

    fn extract_type_loc(&mut self, loc: TypeLoc) -> Result<Label, ExtractError> {
        self.extract(AstNode::TypeRepr(loc.repr, loc.ty))
    }

    /// Extract each node in order, returning the labels in the same order.
    fn extract_all(&mut self, nodes: &[AstNode]) -> Result<Vec<Label>, ExtractError> {
        nodes.iter().map(|&node| self.extract(node)).collect()
    }

    /// Label already assigned to `node`, without extracting it.
    fn lookup_label(&self, node: AstNode) -> Option<Label> {
        self.context().lookup_label(node)
    }

    fn ast(&self) -> &'ast AstContext {
        self.context().ast()
    }

    fn emit(&mut self, fact: Fact) {
        self.context_mut().emit(fact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Category, ExprKind, PatternKind, StmtKind, TypeKind};

    /// Records every visit instead of emitting facts.
    struct RecordingDispatcher<'ast> {
        cx: ExtractionContext<'ast>,
        visits: Vec<(Category, Label)>,
    }

    impl<'ast> RecordingDispatcher<'ast> {
        fn new(ast: &'ast AstContext) -> Self {
            Self {
                cx: ExtractionContext::new(ast),
                visits: Vec::new(),
            }
        }

        fn record(&mut self, category: Category, label: Label) -> Result<(), ExtractError> {
            self.visits.push((category, label));
            Ok(())
        }
    }

    impl<'ast> Dispatcher<'ast> for RecordingDispatcher<'ast> {
        fn context(&self) -> &ExtractionContext<'ast> {
            &self.cx
        }

        fn context_mut(&mut self) -> &mut ExtractionContext<'ast> {
            &mut self.cx
        }

        fn visit_decl(&mut self, _: DeclId, label: Label) -> Result<(), ExtractError> {
            self.record(Category::Decl, label)
        }

        fn visit_stmt(&mut self, _: StmtId, label: Label) -> Result<(), ExtractError> {
            self.record(Category::Stmt, label)
        }

        fn visit_stmt_condition(
            &mut self,
            _: StmtConditionId,
            label: Label,
        ) -> Result<(), ExtractError> {
            self.record(Category::StmtCondition, label)
        }

        fn visit_case_label_item(
            &mut self,
            _: CaseLabelItemId,
            label: Label,
        ) -> Result<(), ExtractError> {
            self.record(Category::CaseLabelItem, label)
        }

        fn visit_expr(&mut self, _: ExprId, label: Label) -> Result<(), ExtractError> {
            self.record(Category::Expr, label)
        }

        fn visit_pattern(&mut self, _: PatternId, label: Label) -> Result<(), ExtractError> {
            self.record(Category::Pattern, label)
        }

        fn visit_type(&mut self, _: TypeId, label: Label) -> Result<(), ExtractError> {
            self.record(Category::Type, label)
        }

        fn visit_type_repr(
            &mut self,
            _: TypeReprId,
            _: Option<TypeId>,
            label: Label,
        ) -> Result<(), ExtractError> {
            self.record(Category::TypeRepr, label)
        }
    }

    /// One node of every shape.
    fn one_of_each(ast: &mut AstContext) -> Vec<AstNode> {
        let expr = ast.add_expr(ExprKind::NilLiteral, None, None);
        let pattern = ast.add_pattern(PatternKind::Any, None);
        let stmt = ast.add_stmt(StmtKind::Break, None);
        let decl = ast.add_decl(
            crate::ast::DeclKind::Import {
                module: "Foundation".to_string(),
            },
            None,
        );
        let condition = ast.add_stmt_condition(Vec::new(), None);
        let item = ast.add_case_label_item(pattern, None, None);
        let ty = ast.intern_type(TypeKind::Tuple {
            elements: Vec::new(),
        });
        let repr = ast.add_type_repr("()", None);
        vec![
            AstNode::Decl(decl),
            AstNode::Stmt(stmt),
            AstNode::StmtCondition(condition),
            AstNode::CaseLabelItem(item),
            AstNode::Expr(expr),
            AstNode::Pattern(pattern),
            AstNode::Type(ty),
            AstNode::TypeRepr(repr, Some(ty)),
        ]
    }

    #[test]
    fn test_each_shape_routes_to_its_visitor() {
        let mut ast = AstContext::new();
        let nodes = one_of_each(&mut ast);
        let mut d = RecordingDispatcher::new(&ast);

        for node in &nodes {
            let label = d.extract(*node).unwrap();
            let (category, visited) = *d.visits.last().unwrap();
            assert_eq!(category, node.category());
            assert_eq!(visited, label);
        }
        let categories: Vec<_> = d.visits.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[test]
    fn test_repeated_extract_routes_once() {
        let mut ast = AstContext::new();
        let nodes = one_of_each(&mut ast);
        let mut d = RecordingDispatcher::new(&ast);

        let first = d.extract_all(&nodes).unwrap();
        let second = d.extract_all(&nodes).unwrap();
        assert_eq!(first, second);
        assert_eq!(d.visits.len(), nodes.len());
    }

    #[test]
    fn test_type_repr_label_ignores_resolution() {
        let mut ast = AstContext::new();
        let repr = ast.add_type_repr("Int", None);
        let int = ast.named_type("Int");
        let mut d = RecordingDispatcher::new(&ast);

        let a = d.extract(AstNode::TypeRepr(repr, Some(int))).unwrap();
        let b = d.extract(AstNode::TypeRepr(repr, None)).unwrap();
        assert_eq!(a, b);
        assert_eq!(d.visits.len(), 1);
    }

    #[test]
    fn test_lookup_label_does_not_extract() {
        let mut ast = AstContext::new();
        let expr = ast.add_expr(ExprKind::NilLiteral, None, None);
        let mut d = RecordingDispatcher::new(&ast);

        assert_eq!(d.lookup_label(expr.into()), None);
        assert!(d.visits.is_empty());
        let label = d.extract_expr(expr).unwrap();
        assert_eq!(d.lookup_label(expr.into()), Some(label));
        assert!(d.context().is_dispatched(expr.into()));
    }
}
