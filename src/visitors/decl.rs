//! Declaration visitor.

use super::{emit_location, visit_unknown, VisitorOptions};
use crate::ast::{AstNode, DeclId, DeclKind};
use crate::extract::{fact, Dispatcher, ExtractError, Label};

#[derive(Debug, Clone, Copy)]
pub struct DeclVisitor {
    options: VisitorOptions,
}

impl DeclVisitor {
    pub fn new(options: VisitorOptions) -> Self {
        Self { options }
    }

    pub fn visit<'ast>(
        &self,
        d: &mut dyn Dispatcher<'ast>,
        id: DeclId,
        label: Label,
    ) -> Result<(), ExtractError> {
        let decl = d.ast().decl(id);
        emit_location(d, &self.options, label, decl.span);

        match &decl.kind {
            DeclKind::Import { module } => {
                d.emit(fact!("import_decls", label, module));
            }
            DeclKind::Func {
                name,
                params,
                result,
                body,
            } => {
                d.emit(fact!("func_decls", label, name));
                for (index, &param) in params.iter().enumerate() {
                    let param = d.extract_decl(param)?;
                    d.emit(fact!("func_decl_params", label, index, param));
                }
                if let Some(result) = result {
                    let result = d.extract_type_loc(*result)?;
                    d.emit(fact!("func_decl_results", label, result));
                }
                if let Some(body) = body {
                    let body = d.extract_stmt(*body)?;
                    d.emit(fact!("func_decl_bodies", label, body));
                }
            }
            DeclKind::Param {
                name,
                external_name,
                type_loc,
            } => {
                d.emit(fact!("param_decls", label, name));
                if let Some(external) = external_name {
                    d.emit(fact!("param_decl_external_names", label, external));
                }
                if let Some(type_loc) = type_loc {
                    let repr = d.extract_type_loc(*type_loc)?;
                    d.emit(fact!("param_decl_type_reprs", label, repr));
                }
            }
            DeclKind::Nominal {
                kind,
                name,
                inherited,
                members,
            } => {
                d.emit(fact!("nominal_type_decls", label, kind.as_str(), name));
                for (index, &loc) in inherited.iter().enumerate() {
                    let repr = d.extract_type_loc(loc)?;
                    d.emit(fact!("nominal_type_decl_inherited_types", label, index, repr));
                }
                for (index, &member) in members.iter().enumerate() {
                    let member = d.extract_decl(member)?;
                    d.emit(fact!("decl_members", label, index, member));
                }
            }
            DeclKind::Var { name, is_let, ty } => {
                d.emit(fact!("var_decls", label, name, *is_let));
                if let Some(ty) = ty {
                    let ty = d.extract_type(*ty)?;
                    d.emit(fact!("var_decl_types", label, ty));
                }
            }
            DeclKind::PatternBinding { entries } => {
                d.emit(fact!("pattern_binding_decls", label));
                for (index, entry) in entries.iter().enumerate() {
                    let pattern = d.extract_pattern(entry.pattern)?;
                    d.emit(fact!("pattern_binding_decl_patterns", label, index, pattern));
                    if let Some(init) = entry.init {
                        let init = d.extract_expr(init)?;
                        d.emit(fact!("pattern_binding_decl_inits", label, index, init));
                    }
                }
            }
            DeclKind::EnumCase { elements } => {
                d.emit(fact!("enum_case_decls", label));
                for (index, element) in elements.iter().enumerate() {
                    d.emit(fact!("enum_case_decl_elements", label, index, element));
                }
            }
            DeclKind::TypeAlias { name, type_loc } => {
                d.emit(fact!("type_alias_decls", label, name));
                if let Some(type_loc) = type_loc {
                    let repr = d.extract_type_loc(*type_loc)?;
                    d.emit(fact!("type_alias_decl_type_reprs", label, repr));
                }
            }
            DeclKind::TopLevelCode { body } => {
                let body = d.extract_stmt(*body)?;
                d.emit(fact!("top_level_code_decls", label, body));
            }
            DeclKind::Unknown { kind, children } => {
                visit_unknown(d, label, AstNode::Decl(id), kind, children)?;
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
    fn test_func_with_param_and_result() {
        let mut ast = AstContext::new();
        let int = ast.named_type("Int");
        let param_repr = ast.add_type_repr("Int", None);
        let param = ast.add_decl(
            DeclKind::Param {
                name: "x".to_string(),
                external_name: Some("_".to_string()),
                type_loc: Some(TypeLoc {
                    repr: param_repr,
                    ty: Some(int),
                }),
            },
            None,
        );
        let result_repr = ast.add_type_repr("Int", None);
        let body = ast.add_stmt(
            StmtKind::Brace {
                elements: Vec::new(),
            },
            None,
        );
        let func = ast.add_decl(
            DeclKind::Func {
                name: "double".to_string(),
                params: vec![param],
                result: Some(TypeLoc {
                    repr: result_repr,
                    ty: Some(int),
                }),
                body: Some(body),
            },
            None,
        );

        let output = run(&ast, &[func.into()]);
        assert_eq!(facts(&output, "func_decls").len(), 1);
        assert_eq!(facts(&output, "func_decl_params").len(), 1);
        assert_eq!(facts(&output, "param_decl_external_names").len(), 1);
        assert_eq!(facts(&output, "type_reprs").len(), 2);
        // Both annotations resolve to the one Int type
        assert_eq!(facts(&output, "types").len(), 1);
        let type_repr_types = facts(&output, "type_repr_types");
        assert_eq!(type_repr_types.len(), 2);
        assert_eq!(type_repr_types[0].args[1], type_repr_types[1].args[1]);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_nominal_members_are_indexed() {
        let mut ast = AstContext::new();
        let case = ast.add_decl(
            DeclKind::EnumCase {
                elements: vec!["north".to_string(), "south".to_string()],
            },
            None,
        );
        let equatable = ast.add_type_repr("Equatable", None);
        let ty = ast.named_type("Equatable");
        let nominal = ast.add_decl(
            DeclKind::Nominal {
                kind: NominalKind::Enum,
                name: "Direction".to_string(),
                inherited: vec![TypeLoc {
                    repr: equatable,
                    ty: Some(ty),
                }],
                members: vec![case],
            },
            None,
        );

        let output = run(&ast, &[nominal.into()]);
        let nominal_facts = facts(&output, "nominal_type_decls");
        assert_eq!(nominal_facts[0].args[1], FactValue::Str("enum".to_string()));
        assert_eq!(facts(&output, "decl_members").len(), 1);
        assert_eq!(facts(&output, "enum_case_decl_elements").len(), 2);
        assert_eq!(facts(&output, "nominal_type_decl_inherited_types").len(), 1);
    }

    #[test]
    fn test_unknown_decl_extracts_children() {
        let mut ast = AstContext::new();
        let inner = ast.add_expr(ExprKind::NilLiteral, None, None);
        let unknown = ast.add_decl(
            DeclKind::Unknown {
                kind: "operator_declaration".to_string(),
                children: vec![inner.into()],
            },
            None,
        );

        let output = run(&ast, &[unknown.into()]);
        assert_eq!(facts(&output, "unspecified_elements").len(), 1);
        assert_eq!(facts(&output, "unspecified_element_children").len(), 1);
        assert_eq!(facts(&output, "nil_literal_exprs").len(), 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "operator_declaration");
    }
}
