//! Visitor for resolved types and the annotations that name them.

use super::{emit_location, visit_unknown, VisitorOptions};
use crate::ast::{AstNode, TypeId, TypeKind, TypeReprId};
use crate::extract::{fact, Dispatcher, ExtractError, Label};

#[derive(Debug, Clone, Copy)]
pub struct TypeVisitor {
    options: VisitorOptions,
}

impl TypeVisitor {
    pub fn new(options: VisitorOptions) -> Self {
        Self { options }
    }

    pub fn visit<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        id: TypeId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let ty = d.ast().ty(id);
        d.emit(fact!("types", label, &ty.name));

        match &ty.kind {
            TypeKind::Nominal { name, args } => {
                d.emit(fact!("nominal_types", label, name));
                for (index, &arg) in args.iter().enumerate() {
                    let arg = d.extract_type(arg)?;
                    d.emit(fact!("nominal_type_args", label, index, arg));
                }
            }
            TypeKind::Optional { base } => {
                let base = d.extract_type(*base)?;
                d.emit(fact!("optional_types", label, base));
            }
            TypeKind::Array { element } => {
                let element = d.extract_type(*element)?;
                d.emit(fact!("array_types", label, element));
            }
            TypeKind::Dictionary { key, value } => {
                let key = d.extract_type(*key)?;
                let value = d.extract_type(*value)?;
                d.emit(fact!("dictionary_types", label, key, value));
            }
            TypeKind::Tuple { elements } => {
                for (index, &element) in elements.iter().enumerate() {
                    let element = d.extract_type(element)?;
                    d.emit(fact!("tuple_type_elements", label, index, element));
                }
            }
            TypeKind::Function { params, result } => {
                let result = d.extract_type(*result)?;
                d.emit(fact!("function_types", label, result));
                for (index, &param) in params.iter().enumerate() {
                    let param = d.extract_type(param)?;
                    d.emit(fact!("function_type_params", label, index, param));
                }
            }
            TypeKind::Unknown { text } => {
                visit_unknown(d, label, AstNode::Type(id), text, &[])?;
            }
        }
        Ok(())
    }

    /// Visit an annotation; the resolved type is extracted as its own node.
    pub fn visit_repr<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        repr: TypeReprId,
        resolved: Option<TypeId>,
        label: Label,
    ) -> Result<(), ExtractError> {
        let type_repr = d.ast().type_repr(repr);
        emit_location(d, &self.options, label, type_repr.span);

        d.emit(fact!("type_reprs", label, &type_repr.text));
        if let Some(resolved) = resolved {
            let ty = d.extract_type(resolved)?;
            d.emit(fact!("type_repr_types", label, ty));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{facts, run};
    use crate::ast::*;
    use crate::extract::{FactValue, Severity};

    #[test]
    fn test_shared_type_extracted_once() {
        let mut ast = AstContext::new();
        let dict = ast.resolve_type_text("[String: [Int]]");
        let again = ast.resolve_type_text("Dictionary<String, Array<Int>>");
        assert_eq!(dict, again);

        let output = run(&ast, &[dict.into(), again.into()]);
        let names: Vec<_> = facts(&output, "types")
            .iter()
            .map(|f| f.args[1].clone())
            .collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&FactValue::Str("[String: [Int]]".to_string())));
        assert_eq!(facts(&output, "dictionary_types").len(), 1);
        assert_eq!(facts(&output, "array_types").len(), 1);
    }

    #[test]
    fn test_function_type_params_in_order() {
        let mut ast = AstContext::new();
        let func = ast.resolve_type_text("(Int, String) -> Bool");
        let output = run(&ast, &[func.into()]);
        let params = facts(&output, "function_type_params");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].args[1], FactValue::Int(0));
        assert_eq!(facts(&output, "function_types").len(), 1);
    }

    #[test]
    fn test_repr_without_resolution() {
        let mut ast = AstContext::new();
        let repr = ast.add_type_repr("T", None);
        let output = run(&ast, &[AstNode::TypeRepr(repr, None)]);
        assert_eq!(facts(&output, "type_reprs").len(), 1);
        assert!(facts(&output, "type_repr_types").is_empty());
        assert!(facts(&output, "types").is_empty());
    }

    #[test]
    fn test_first_resolution_of_repr_wins() {
        let mut ast = AstContext::new();
        let repr = ast.add_type_repr("Int", None);
        let int = ast.named_type("Int");
        let output = run(
            &ast,
            &[AstNode::TypeRepr(repr, None), AstNode::TypeRepr(repr, Some(int))],
        );
        assert_eq!(facts(&output, "type_reprs").len(), 1);
        assert!(facts(&output, "type_repr_types").is_empty());
        assert!(facts(&output, "types").is_empty());
    }

    #[test]
    fn test_unknown_type_is_informational() {
        let mut ast = AstContext::new();
        let broken = ast.resolve_type_text("[Int");
        let output = run(&ast, &[broken.into()]);
        assert_eq!(facts(&output, "types").len(), 1);
        assert_eq!(facts(&output, "unspecified_elements").len(), 1);
        assert_eq!(output.diagnostics[0].severity, Severity::Info);
    }
}
