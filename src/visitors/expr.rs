//! Expression visitor.

use super::{emit_location, visit_unknown, VisitorOptions};
use crate::ast::{AstNode, ExprId, ExprKind};
use crate::extract::{fact, Dispatcher, ExtractError, Label};

#[derive(Debug, Clone, Copy)]
pub struct ExprVisitor {
    options: VisitorOptions,
}

impl ExprVisitor {
    pub fn new(options: VisitorOptions) -> Self {
        Self { options }
    }

    pub fn visit<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        id: ExprId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let expr = d.ast().expr(id);
        emit_location(d, &self.options, label, expr.span);

        match &expr.kind {
            ExprKind::IntegerLiteral { text } => {
                d.emit(fact!("integer_literal_exprs", label, text));
            }
            ExprKind::FloatLiteral { text } => {
                d.emit(fact!("float_literal_exprs", label, text));
            }
            ExprKind::StringLiteral { text } => {
                d.emit(fact!("string_literal_exprs", label, text));
            }
            ExprKind::BooleanLiteral { value } => {
                d.emit(fact!("boolean_literal_exprs", label, *value));
            }
            ExprKind::NilLiteral => d.emit(fact!("nil_literal_exprs", label)),
            ExprKind::DeclRef { name, decl } => {
                d.emit(fact!("decl_ref_exprs", label, name));
                if let Some(decl) = *decl {
                    // Usually the declaration was extracted before its uses.
                    let target = match d.lookup_label(decl.into()) {
                        Some(target) => target,
                        None => d.extract_decl(decl)?,
                    };
                    d.emit(fact!("decl_ref_expr_decls", label, target));
                }
            }
            ExprKind::Call { callee, arguments } => {
                let callee = d.extract_expr(*callee)?;
                d.emit(fact!("call_exprs", label, callee));
                for (index, argument) in arguments.iter().enumerate() {
                    let value = d.extract_expr(argument.expr)?;
                    d.emit(fact!("call_expr_arguments", label, index, value));
                    if let Some(arg_label) = &argument.label {
                        d.emit(fact!("call_expr_argument_labels", label, index, arg_label));
                    }
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = d.extract_expr(*lhs)?;
                let rhs = d.extract_expr(*rhs)?;
                d.emit(fact!("binary_exprs", label, op, lhs, rhs));
            }
            ExprKind::Prefix { op, operand } => {
                let operand = d.extract_expr(*operand)?;
                d.emit(fact!("prefix_exprs", label, op, operand));
            }
            ExprKind::MemberRef { base, name } => {
                let base = d.extract_expr(*base)?;
                d.emit(fact!("member_ref_exprs", label, base, name));
            }
            ExprKind::Tuple { elements } => {
                d.emit(fact!("tuple_exprs", label));
                for (index, &element) in elements.iter().enumerate() {
                    let element = d.extract_expr(element)?;
                    d.emit(fact!("tuple_expr_elements", label, index, element));
                }
            }
            ExprKind::Array { elements } => {
                d.emit(fact!("array_exprs", label));
                for (index, &element) in elements.iter().enumerate() {
                    let element = d.extract_expr(element)?;
                    d.emit(fact!("array_expr_elements", label, index, element));
                }
            }
            ExprKind::Closure { params, body } => {
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("closure_exprs", label, body));
                for (index, &param) in params.iter().enumerate() {
                    let param = d.extract_decl(param)?;
                    d.emit(fact!("closure_expr_params", label, index, param));
                }
            }
            ExprKind::Assign { dest, source } => {
                let dest = d.extract_expr(*dest)?;
                let source = d.extract_expr(*source)?;
                d.emit(fact!("assign_exprs", label, dest, source));
            }
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                let condition = d.extract_expr(*condition)?;
                let then_expr = d.extract_expr(*then_expr)?;
                let else_expr = d.extract_expr(*else_expr)?;
                d.emit(fact!("ternary_exprs", label, condition, then_expr, else_expr));
            }
            ExprKind::Unknown { kind, children } => {
                visit_unknown(d, label, AstNode::Expr(id), kind, children)?;
            }
        }

        if let Some(ty) = expr.ty {
            let ty = d.extract_type(ty)?;
            d.emit(fact!("expr_types", label, ty));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{facts, run};
    use crate::ast::*;
    use crate::extract::{FactValue, Label};

    fn int_literal(ast: &mut AstContext, text: &str) -> ExprId {
        let int = ast.named_type("Int");
        ast.add_expr(
            ExprKind::IntegerLiteral {
                text: text.to_string(),
            },
            Some(int),
            None,
        )
    }

    #[test]
    fn test_call_arguments_keep_labels() {
        let mut ast = AstContext::new();
        let callee = ast.add_expr(
            ExprKind::DeclRef {
                name: "print".to_string(),
                decl: None,
            },
            None,
            None,
        );
        let first = int_literal(&mut ast, "1");
        let second = int_literal(&mut ast, "2");
        let call = ast.add_expr(
            ExprKind::Call {
                callee,
                arguments: vec![
                    Argument {
                        label: None,
                        expr: first,
                    },
                    Argument {
                        label: Some("separator".to_string()),
                        expr: second,
                    },
                ],
            },
            None,
            None,
        );

        let output = run(&ast, &[call.into()]);
        assert_eq!(facts(&output, "call_expr_arguments").len(), 2);
        let labels = facts(&output, "call_expr_argument_labels");
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].args[1], FactValue::Int(1));
        assert_eq!(labels[0].args[2], FactValue::Str("separator".to_string()));
        // Two literals typed Int share one type node
        assert_eq!(facts(&output, "expr_types").len(), 2);
        assert_eq!(facts(&output, "types").len(), 1);
    }

    #[test]
    fn test_decl_ref_points_at_declaration() {
        let mut ast = AstContext::new();
        let var = ast.add_decl(
            DeclKind::Var {
                name: "count".to_string(),
                is_let: true,
                ty: None,
            },
            None,
        );
        let reference = ast.add_expr(
            ExprKind::DeclRef {
                name: "count".to_string(),
                decl: Some(var),
            },
            None,
            None,
        );

        let output = run(&ast, &[var.into(), reference.into()]);
        let var_label: Label = output.facts_for("var_decls").next().unwrap().subject().unwrap();
        let refs = facts(&output, "decl_ref_expr_decls");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].args[1], FactValue::Label(var_label));
        assert_eq!(facts(&output, "var_decls").len(), 1);
    }

    #[test]
    fn test_unresolved_decl_ref_has_no_target() {
        let mut ast = AstContext::new();
        let reference = ast.add_expr(
            ExprKind::DeclRef {
                name: "missing".to_string(),
                decl: None,
            },
            None,
            None,
        );
        let output = run(&ast, &[reference.into()]);
        assert_eq!(facts(&output, "decl_ref_exprs").len(), 1);
        assert!(facts(&output, "decl_ref_expr_decls").is_empty());
    }

    #[test]
    fn test_unknown_expr_is_reported_with_children() {
        let mut ast = AstContext::new();
        let key = int_literal(&mut ast, "1");
        let value = int_literal(&mut ast, "2");
        let dict = ast.add_expr(
            ExprKind::Unknown {
                kind: "dictionary_literal".to_string(),
                children: vec![key.into(), value.into()],
            },
            None,
            None,
        );
        let output = run(&ast, &[dict.into()]);
        let unspecified = facts(&output, "unspecified_elements");
        assert_eq!(unspecified.len(), 1);
        assert_eq!(unspecified[0].args[1], FactValue::Str("expr".to_string()));
        assert_eq!(facts(&output, "unspecified_element_children").len(), 2);
        assert_eq!(facts(&output, "integer_literal_exprs").len(), 2);
    }
}
