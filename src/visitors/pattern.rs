//! Pattern visitor.

use super::{emit_location, visit_unknown, VisitorOptions};
use crate::ast::{AstNode, PatternId, PatternKind};
use crate::extract::{fact, Dispatcher, ExtractError, Label};

#[derive(Debug, Clone, Copy)]
pub struct PatternVisitor {
    options: VisitorOptions,
}

impl PatternVisitor {
    pub fn new(options: VisitorOptions) -> Self {
        Self { options }
    }

    pub fn visit<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        id: PatternId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let pattern = d.ast().pattern(id);
        emit_location(d, &self.options, label, pattern.span);

        match &pattern.kind {
            PatternKind::Named { name, var } => {
                d.emit(fact!("named_patterns", label, name));
                if let Some(var) = var {
                    let var = d.extract_decl(*var)?;
                    d.emit(fact!("named_pattern_vars", label, var));
                }
            }
            PatternKind::Any => d.emit(fact!("any_patterns", label)),
            PatternKind::Typed { sub, type_loc } => {
                let sub = d.extract_pattern(*sub)?;
                d.emit(fact!("typed_patterns", label, sub));
                let repr = d.extract_type_loc(*type_loc)?;
                d.emit(fact!("typed_pattern_type_reprs", label, repr));
            }
            PatternKind::Tuple { elements } => {
                d.emit(fact!("tuple_patterns", label));
                for (index, &element) in elements.iter().enumerate() {
                    let element = d.extract_pattern(element)?;
                    d.emit(fact!("tuple_pattern_elements", label, index, element));
                }
            }
            PatternKind::Expr { expr } => {
                let expr = d.extract_expr(*expr)?;
                d.emit(fact!("expr_patterns", label, expr));
            }
            PatternKind::Binding { is_let, sub } => {
                let sub = d.extract_pattern(*sub)?;
                d.emit(fact!("binding_patterns", label, *is_let, sub));
            }
            PatternKind::EnumElement { name, sub } => {
                d.emit(fact!("enum_element_patterns", label, name));
                if let Some(sub) = sub {
                    let sub = d.extract_pattern(*sub)?;
                    d.emit(fact!("enum_element_pattern_subs", label, sub));
                }
            }
            PatternKind::Is { type_loc } => {
                let repr = d.extract_type_loc(*type_loc)?;
                d.emit(fact!("is_patterns", label, repr));
            }
            PatternKind::OptionalSome { sub } => {
                let sub = d.extract_pattern(*sub)?;
                d.emit(fact!("optional_some_patterns", label, sub));
            }
            PatternKind::Unknown { kind, children } => {
                visit_unknown(d, label, AstNode::Pattern(id), kind, children)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{facts, run};
    use crate::ast::*;
    use crate::extract::FactValue;

    #[test]
    fn test_binding_tuple_pattern() {
        let mut ast = AstContext::new();
        let a_var = ast.add_decl(
            DeclKind::Var {
                name: "a".to_string(),
                is_let: true,
                ty: None,
            },
            None,
        );
        let a = ast.add_pattern(
            PatternKind::Named {
                name: "a".to_string(),
                var: Some(a_var),
            },
            None,
        );
        let wildcard = ast.add_pattern(PatternKind::Any, None);
        let tuple = ast.add_pattern(
            PatternKind::Tuple {
                elements: vec![a, wildcard],
            },
            None,
        );
        let binding = ast.add_pattern(
            PatternKind::Binding {
                is_let: true,
                sub: tuple,
            },
            None,
        );

        let output = run(&ast, &[binding.into()]);
        let bindings = facts(&output, "binding_patterns");
        assert_eq!(bindings[0].args[1], FactValue::Bool(true));
        assert_eq!(facts(&output, "tuple_pattern_elements").len(), 2);
        assert_eq!(facts(&output, "named_pattern_vars").len(), 1);
        assert_eq!(facts(&output, "var_decls").len(), 1);
        assert_eq!(facts(&output, "any_patterns").len(), 1);
    }

    #[test]
    fn test_enum_element_with_payload() {
        let mut ast = AstContext::new();
        let inner = ast.add_pattern(
            PatternKind::Named {
                name: "value".to_string(),
                var: None,
            },
            None,
        );
        let element = ast.add_pattern(
            PatternKind::EnumElement {
                name: "some".to_string(),
                sub: Some(inner),
            },
            None,
        );
        let output = run(&ast, &[element.into()]);
        assert_eq!(facts(&output, "enum_element_patterns").len(), 1);
        assert_eq!(facts(&output, "enum_element_pattern_subs").len(), 1);
    }
}
