//! Statement visitor, including condition lists and case label items.

use super::{emit_location, visit_unknown, VisitorOptions};
use crate::ast::{AstNode, CaseLabelItemId, ConditionElement, StmtConditionId, StmtId, StmtKind};
use crate::extract::{fact, Dispatcher, ExtractError, Label};

#[derive(Debug, Clone, Copy)]
pub struct StmtVisitor {
    options: VisitorOptions,
}

impl StmtVisitor {
    pub fn new(options: VisitorOptions) -> Self {
        Self { options }
    }

    pub fn visit<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        id: StmtId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let stmt = d.ast().stmt(id);
        emit_location(d, &self.options, label, stmt.span);

        match &stmt.kind {
            StmtKind::Brace { elements } => {
                d.emit(fact!("brace_stmts", label));
                for (index, &element) in elements.iter().enumerate() {
                    let element = d.extract(element)?;
                    d.emit(fact!("brace_stmt_elements", label, index, element));
                }
            }
            StmtKind::Return { result } => {
                d.emit(fact!("return_stmts", label));
                if let Some(result) = result {
                    let result = d.extract_expr(*result)?;
                    d.emit(fact!("return_stmt_results", label, result));
                }
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = d.extract_stmt_condition(*condition)?;
                let then_branch = d.extract_stmt(*then_branch)?;
                d.emit(fact!("if_stmts", label, condition, then_branch));
                if let Some(else_branch) = else_branch {
                    let else_branch = d.extract_stmt(*else_branch)?;
                    d.emit(fact!("if_stmt_elses", label, else_branch));
                }
            }
            StmtKind::Guard { condition, body } => {
                let condition = d.extract_stmt_condition(*condition)?;
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("guard_stmts", label, condition, body));
            }
            StmtKind::While { condition, body } => {
                let condition = d.extract_stmt_condition(*condition)?;
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("while_stmts", label, condition, body));
            }
            StmtKind::RepeatWhile { body, condition } => {
                let body = d.extract_stmt(*body)?;
                let condition = d.extract_expr(*condition)?;
                d.emit(fact!("repeat_while_stmts", label, condition, body));
            }
            StmtKind::ForEach {
                pattern,
                sequence,
                body,
            } => {
                let pattern = d.extract_pattern(*pattern)?;
                let sequence = d.extract_expr(*sequence)?;
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("for_each_stmts", label, pattern, sequence, body));
            }
            StmtKind::Switch { subject, cases } => {
                let subject = d.extract_expr(*subject)?;
                d.emit(fact!("switch_stmts", label, subject));
                for (index, &case) in cases.iter().enumerate() {
                    let case = d.extract_stmt(case)?;
                    d.emit(fact!("switch_stmt_cases", label, index, case));
                }
            }
            StmtKind::Case { labels, body } => {
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("case_stmts", label, body));
                for (index, &item) in labels.iter().enumerate() {
                    let item = d.extract_case_label_item(item)?;
                    d.emit(fact!("case_stmt_labels", label, index, item));
                }
            }
            StmtKind::Break => d.emit(fact!("break_stmts", label)),
            StmtKind::Continue => d.emit(fact!("continue_stmts", label)),
            StmtKind::Throw { error } => {
                let error = d.extract_expr(*error)?;
                d.emit(fact!("throw_stmts", label, error));
            }
            StmtKind::Defer { body } => {
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("defer_stmts", label, body));
            }
            StmtKind::Do { body, catches } => {
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("do_stmts", label, body));
                for (index, &catch) in catches.iter().enumerate() {
                    let catch = d.extract_stmt(catch)?;
                    d.emit(fact!("do_stmt_catches", label, index, catch));
                }
            }
            StmtKind::Unknown { kind, children } => {
                visit_unknown(d, label, AstNode::Stmt(id), kind, children)?;
            }
        }
        Ok(())
    }

    pub fn visit_condition<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        id: StmtConditionId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let condition = d.ast().stmt_condition(id);
        emit_location(d, &self.options, label, condition.span);

        d.emit(fact!("stmt_conditions", label));
        for (index, element) in condition.elements.iter().enumerate() {
            match *element {
                ConditionElement::Boolean(expr) => {
                    let expr = d.extract_expr(expr)?;
                    d.emit(fact!("stmt_condition_booleans", label, index, expr));
                }
                ConditionElement::Pattern {
                    pattern,
                    initializer,
                } => {
                    let initializer = d.extract_expr(initializer)?;
                    let pattern = d.extract_pattern(pattern)?;
                    d.emit(fact!(
                        "stmt_condition_patterns",
                        label,
                        index,
                        pattern,
                        initializer
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn visit_case_label_item<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        id: CaseLabelItemId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let item = d.ast().case_label_item(id);
        emit_location(d, &self.options, label, item.span);

        let pattern = d.extract_pattern(item.pattern)?;
        d.emit(fact!("case_label_items", label, pattern));
        if let Some(guard) = item.guard {
            let guard = d.extract_expr(guard)?;
            d.emit(fact!("case_label_item_guards", label, guard));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{facts, run};
    use crate::ast::*;
    use crate::extract::FactValue;

    fn empty_block(ast: &mut AstContext) -> StmtId {
        ast.add_stmt(
            StmtKind::Brace {
                elements: Vec::new(),
            },
            None,
        )
    }

    #[test]
    fn test_if_with_mixed_condition() {
        let mut ast = AstContext::new();
        let flag = ast.add_expr(ExprKind::BooleanLiteral { value: true }, None, None);
        let value = ast.add_expr(ExprKind::NilLiteral, None, None);
        let named = ast.add_pattern(
            PatternKind::Named {
                name: "x".to_string(),
                var: None,
            },
            None,
        );
        let condition = ast.add_stmt_condition(
            vec![
                ConditionElement::Boolean(flag),
                ConditionElement::Pattern {
                    pattern: named,
                    initializer: value,
                },
            ],
            None,
        );
        let then_branch = empty_block(&mut ast);
        let else_branch = empty_block(&mut ast);
        let stmt = ast.add_stmt(
            StmtKind::If {
                condition,
                then_branch,
                else_branch: Some(else_branch),
            },
            None,
        );

        let output = run(&ast, &[stmt.into()]);
        assert_eq!(facts(&output, "stmt_conditions").len(), 1);
        assert_eq!(facts(&output, "stmt_condition_booleans").len(), 1);
        let patterns = facts(&output, "stmt_condition_patterns");
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].args[1], FactValue::Int(1));
        assert_eq!(facts(&output, "if_stmt_elses").len(), 1);
        assert_eq!(facts(&output, "brace_stmts").len(), 2);
    }

    #[test]
    fn test_switch_cases_and_labels() {
        let mut ast = AstContext::new();
        let subject = ast.add_expr(
            ExprKind::DeclRef {
                name: "value".to_string(),
                decl: None,
            },
            None,
            None,
        );
        let one = ast.add_expr(
            ExprKind::IntegerLiteral {
                text: "1".to_string(),
            },
            None,
            None,
        );
        let pattern = ast.add_pattern(PatternKind::Expr { expr: one }, None);
        let guard = ast.add_expr(ExprKind::BooleanLiteral { value: false }, None, None);
        let item = ast.add_case_label_item(pattern, Some(guard), None);
        let body = empty_block(&mut ast);
        let case = ast.add_stmt(
            StmtKind::Case {
                labels: vec![item],
                body,
            },
            None,
        );
        let default_body = empty_block(&mut ast);
        let default = ast.add_stmt(
            StmtKind::Case {
                labels: Vec::new(),
                body: default_body,
            },
            None,
        );
        let switch = ast.add_stmt(
            StmtKind::Switch {
                subject,
                cases: vec![case, default],
            },
            None,
        );

        let output = run(&ast, &[switch.into()]);
        assert_eq!(facts(&output, "switch_stmt_cases").len(), 2);
        assert_eq!(facts(&output, "case_stmts").len(), 2);
        assert_eq!(facts(&output, "case_stmt_labels").len(), 1);
        assert_eq!(facts(&output, "case_label_item_guards").len(), 1);
        assert_eq!(facts(&output, "expr_patterns").len(), 1);
    }

    #[test]
    fn test_do_catch_blocks() {
        let mut ast = AstContext::new();
        let body = empty_block(&mut ast);
        let catch = empty_block(&mut ast);
        let stmt = ast.add_stmt(
            StmtKind::Do {
                body,
                catches: vec![catch],
            },
            None,
        );
        let output = run(&ast, &[stmt.into()]);
        assert_eq!(facts(&output, "do_stmts").len(), 1);
        assert_eq!(facts(&output, "do_stmt_catches").len(), 1);
    }
}
