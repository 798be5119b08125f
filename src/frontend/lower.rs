//! Lowering of the tree-sitter concrete syntax tree into an [`AstContext`].
//!
//! Lowering never fails. Constructs without a dedicated node kind become
//! `Unknown` nodes whose children are lowered as usual, and ERROR nodes from
//! the parser are lowered the same way.

use std::collections::HashMap;

use tree_sitter::Node;

use super::ParsedFile;
use crate::ast::{
    Argument, AstContext, AstNode, ConditionElement, DeclId, DeclKind, ExprId, ExprKind,
    NominalKind, PatternBindingEntry, PatternId, PatternKind, Span, StmtConditionId, StmtId,
    StmtKind, TypeId, TypeKind, TypeLoc,
};

/// A lowered source file.
#[derive(Debug)]
pub struct LoweredFile {
    pub ast: AstContext,
    /// Top-level declarations in source order.
    pub top_level: Vec<DeclId>,
    /// The parse tree contained ERROR or MISSING nodes.
    pub has_parse_errors: bool,
}

pub(super) fn lower(parsed: &ParsedFile) -> LoweredFile {
    let root = parsed.tree.root_node();
    let mut lowerer = Lowerer {
        parsed,
        ast: AstContext::new(),
        scopes: vec![HashMap::new()],
        unresolved: Vec::new(),
    };
    let top_level = lowerer.source_file(root);
    lowerer.resolve_forward_references();

    LoweredFile {
        ast: lowerer.ast,
        top_level,
        has_parse_errors: root.has_error(),
    }
}

fn span(node: Node) -> Option<Span> {
    Some(Span::from_node(node))
}

fn span_between(first: Node, last: Node) -> Span {
    let start = Span::from_node(first);
    let end = Span::from_node(last);
    Span {
        end_byte: end.end_byte,
        end_line: end.end_line,
        end_col: end.end_col,
        ..start
    }
}

fn span_of_nodes(nodes: &[Node]) -> Option<Span> {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => Some(span_between(*first, *last)),
        _ => None,
    }
}

fn is_comment(kind: &str) -> bool {
    matches!(kind, "comment" | "multiline_comment")
}

/// Nodes that carry no AST of their own.
fn is_trivia(kind: &str) -> bool {
    is_comment(kind)
        || matches!(
            kind,
            "modifiers" | "attribute" | "type_parameters" | "type_constraints"
        )
}

fn is_type_kind(kind: &str) -> bool {
    matches!(
        kind,
        "user_type"
            | "type_identifier"
            | "optional_type"
            | "array_type"
            | "dictionary_type"
            | "tuple_type"
            | "function_type"
            | "opaque_type"
            | "existential_type"
            | "metatype"
            | "protocol_composition_type"
    )
}

/// Whether `node` can stand for an expression. `nil` is an anonymous
/// token in the grammar but still a value.
fn is_operand(node: &Node) -> bool {
    (node.is_named() && !is_comment(node.kind())) || node.kind() == "nil"
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| !is_comment(c.kind()))
        .collect()
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_comment(c.kind()))
        .collect()
}

fn operands<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    children(node).into_iter().filter(is_operand).collect()
}

fn find_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    children(node).into_iter().find(|c| c.kind() == kind)
}

/// `nodes[start..end]`, or nothing when the range is out of order.
fn between<'s, 't>(nodes: &'s [Node<'t>], start: usize, end: usize) -> &'s [Node<'t>] {
    nodes.get(start..end).unwrap_or(&[])
}

fn position(nodes: &[Node], kind: &str) -> Option<usize> {
    nodes.iter().position(|n| n.kind() == kind)
}

/// Contents of a string literal without its delimiters.
fn string_contents(text: &str) -> String {
    let trimmed = text.trim().trim_matches('#');
    for quote in ["\"\"\"", "\""] {
        if trimmed.len() >= 2 * quote.len() && trimmed.starts_with(quote) && trimmed.ends_with(quote)
        {
            return trimmed[quote.len()..trimmed.len() - quote.len()].to_string();
        }
    }
    trimmed.to_string()
}

struct Lowerer<'a> {
    parsed: &'a ParsedFile,
    ast: AstContext,
    /// Lexical scopes, innermost last. Index 0 is the file scope.
    scopes: Vec<HashMap<String, DeclId>>,
    /// Decl refs that found no declaration when lowered.
    unresolved: Vec<ExprId>,
}

impl<'a> Lowerer<'a> {
    fn text(&self, node: Node<'_>) -> &'a str {
        self.parsed.node_text(node)
    }

    // Scopes

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn declare(&mut self, name: &str, decl: DeclId) {
        if name.is_empty() || name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), decl);
        }
    }

    fn resolve(&self, name: &str) -> Option<DeclId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Type a reference to `decl` has, when the declaration states one.
    fn decl_type(&self, decl: DeclId) -> Option<TypeId> {
        match &self.ast.decl(decl).kind {
            DeclKind::Var { ty, .. } => *ty,
            DeclKind::Param { type_loc, .. } => type_loc.and_then(|loc| loc.ty),
            _ => None,
        }
    }

    /// Retry unresolved names against the file scope, which by now holds
    /// declarations that appear after their first use.
    fn resolve_forward_references(&mut self) {
        let file_scope = self.scopes.first().cloned().unwrap_or_default();
        for id in std::mem::take(&mut self.unresolved) {
            let target = match &self.ast.expr(id).kind {
                ExprKind::DeclRef { name, decl: None } => file_scope.get(name).copied(),
                _ => None,
            };
            let Some(target) = target else { continue };
            let ty = self.decl_type(target);
            let expr = self.ast.expr_mut(id);
            if let ExprKind::DeclRef { decl, .. } = &mut expr.kind {
                *decl = Some(target);
            }
            if expr.ty.is_none() {
                expr.ty = ty;
            }
        }
    }

    // Items

    fn source_file(&mut self, root: Node<'a>) -> Vec<DeclId> {
        let mut top_level = Vec::new();
        let mut script: Vec<(Node<'a>, AstNode)> = Vec::new();

        for child in named_children(root) {
            match self.item(child) {
                AstNode::Decl(decl) => {
                    self.flush_script(&mut script, &mut top_level);
                    top_level.push(decl);
                }
                other => script.push((child, other)),
            }
        }
        self.flush_script(&mut script, &mut top_level);
        top_level
    }

    /// Wrap a run of top-level statements into a top-level code declaration.
    fn flush_script(&mut self, run: &mut Vec<(Node<'a>, AstNode)>, top_level: &mut Vec<DeclId>) {
        let span = match (run.first(), run.last()) {
            (Some(first), Some(last)) => Some(span_between(first.0, last.0)),
            _ => return,
        };
        let elements = run.drain(..).map(|(_, node)| node).collect();
        let body = self.ast.add_stmt(StmtKind::Brace { elements }, span);
        top_level.push(self.ast.add_decl(DeclKind::TopLevelCode { body }, span));
    }

    /// Lower a block element, which may be a declaration, statement or
    /// expression.
    fn item(&mut self, node: Node<'a>) -> AstNode {
        let kind = node.kind();
        if kind.ends_with("_declaration") || kind == "enum_entry" {
            AstNode::Decl(self.decl(node))
        } else if kind.ends_with("_statement") || kind == "statements" {
            AstNode::Stmt(self.stmt(node))
        } else {
            AstNode::Expr(self.expr(node))
        }
    }

    /// Lower the children of a node that has no model of its own.
    fn items(&mut self, node: Node<'a>) -> Vec<AstNode> {
        let mut items = Vec::new();
        for child in named_children(node) {
            if is_trivia(child.kind()) {
                continue;
            }
            if is_type_kind(child.kind()) {
                items.push(AstNode::from(self.type_loc(child)));
            } else {
                items.push(self.item(child));
            }
        }
        items
    }

    fn type_loc(&mut self, node: Node<'a>) -> TypeLoc {
        let node = if node.kind() == "type_annotation" {
            node.child_by_field_name("type")
                .or_else(|| named_children(node).into_iter().next())
                .unwrap_or(node)
        } else {
            node
        };
        let text = self.text(node).trim();
        let ty = self.ast.resolve_type_text(text);
        let repr = self.ast.add_type_repr(text, span(node));
        TypeLoc { repr, ty: Some(ty) }
    }

    // Declarations

    fn decl(&mut self, node: Node<'a>) -> DeclId {
        match node.kind() {
            "import_declaration" => self.import(node),
            "function_declaration" | "protocol_function_declaration" => {
                self.function(node, "<anonymous>")
            }
            "init_declaration" => self.function(node, "init"),
            "deinit_declaration" => self.function(node, "deinit"),
            "class_declaration" => self.nominal(node, NominalKind::Class),
            "protocol_declaration" => self.nominal(node, NominalKind::Protocol),
            "property_declaration" | "protocol_property_declaration" => self.property(node),
            "typealias_declaration" => self.type_alias(node),
            "enum_entry" => self.enum_case(node),
            kind => {
                let children = self.items(node);
                self.ast.add_decl(
                    DeclKind::Unknown {
                        kind: kind.to_string(),
                        children,
                    },
                    span(node),
                )
            }
        }
    }

    fn import(&mut self, node: Node<'a>) -> DeclId {
        let module = match find_child(node, "identifier") {
            Some(ident) => self.text(ident).trim().to_string(),
            None => self
                .text(node)
                .trim()
                .trim_start_matches("import")
                .trim()
                .to_string(),
        };
        self.ast.add_decl(DeclKind::Import { module }, span(node))
    }

    fn function(&mut self, node: Node<'a>, default_name: &str) -> DeclId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).trim())
            .unwrap_or(default_name)
            .to_string();
        let decl = self.ast.add_decl(
            DeclKind::Func {
                name: name.clone(),
                params: Vec::new(),
                result: None,
                body: None,
            },
            span(node),
        );
        self.declare(&name, decl);

        self.push_scope();
        let mut params = Vec::new();
        for child in named_children(node) {
            if child.kind() == "parameter" {
                params.push(self.param(child));
            }
        }
        let result = node
            .child_by_field_name("return_type")
            .map(|ty| self.type_loc(ty));

        // Signature first so recursive calls in the body see the result type.
        self.ast.decl_mut(decl).kind = DeclKind::Func {
            name: name.clone(),
            params: params.clone(),
            result,
            body: None,
        };

        let body = node
            .child_by_field_name("body")
            .or_else(|| find_child(node, "function_body"))
            .map(|body| self.block(body));
        self.pop_scope();

        if let DeclKind::Func { body: slot, .. } = &mut self.ast.decl_mut(decl).kind {
            *slot = body;
        }
        decl
    }

    fn param(&mut self, node: Node<'a>) -> DeclId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).trim().to_string())
            .unwrap_or_else(|| "_".to_string());
        let external_name = node
            .child_by_field_name("external_name")
            .map(|n| self.text(n).trim().to_string());
        let type_loc = named_children(node)
            .into_iter()
            .find(|c| is_type_kind(c.kind()))
            .map(|ty| self.type_loc(ty));

        let decl = self.ast.add_decl(
            DeclKind::Param {
                name: name.clone(),
                external_name,
                type_loc,
            },
            span(node),
        );
        self.declare(&name, decl);
        decl
    }

    fn nominal(&mut self, node: Node<'a>, default_kind: NominalKind) -> DeclId {
        let kind = node
            .child_by_field_name("declaration_kind")
            .and_then(|k| NominalKind::parse(self.text(k).trim()))
            .or_else(|| {
                children(node)
                    .into_iter()
                    .find_map(|c| NominalKind::parse(c.kind()))
            })
            .unwrap_or(default_kind);
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).trim().to_string())
            .unwrap_or_default();

        let mut inherited = Vec::new();
        for child in named_children(node) {
            if child.kind() == "inheritance_specifier" {
                let ty = child.child_by_field_name("inherits_from").unwrap_or(child);
                inherited.push(self.type_loc(ty));
            }
        }

        let decl = self.ast.add_decl(
            DeclKind::Nominal {
                kind,
                name: name.clone(),
                inherited: inherited.clone(),
                members: Vec::new(),
            },
            span(node),
        );
        if kind != NominalKind::Extension {
            self.declare(&name, decl);
        }

        let body = node.child_by_field_name("body").or_else(|| {
            children(node).into_iter().find(|c| {
                matches!(c.kind(), "class_body" | "enum_class_body" | "protocol_body")
            })
        });

        self.push_scope();
        let mut members = Vec::new();
        if let Some(body) = body {
            for child in named_children(body) {
                let kind = child.kind();
                if kind.ends_with("_declaration") || kind == "enum_entry" {
                    members.push(self.decl(child));
                }
            }
        }
        self.pop_scope();

        if let DeclKind::Nominal { members: slot, .. } = &mut self.ast.decl_mut(decl).kind {
            *slot = members;
        }
        decl
    }

    fn binding_is_let(&self, node: Node<'a>) -> bool {
        for child in children(node) {
            match child.kind() {
                "value_binding_pattern" => {
                    return self.text(child).trim_start().starts_with("let");
                }
                "let" => return true,
                "var" => return false,
                _ => {}
            }
        }
        false
    }

    fn property(&mut self, node: Node<'a>) -> DeclId {
        let is_let = self.binding_is_let(node);

        // (name, annotation, value) per comma-separated entry
        let mut pending: Vec<(Node<'a>, Option<Node<'a>>, Option<Node<'a>>)> = Vec::new();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                match (cursor.field_name(), child.kind()) {
                    (Some("name"), _) => pending.push((child, None, None)),
                    (_, "type_annotation") => {
                        if let Some(entry) = pending.last_mut() {
                            entry.1 = Some(child);
                        }
                    }
                    (Some("value"), _) => {
                        if let Some(entry) = pending.last_mut() {
                            entry.2 = Some(child);
                        }
                    }
                    _ => {}
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        if pending.is_empty() {
            if let Some(name) = named_children(node)
                .into_iter()
                .find(|c| matches!(c.kind(), "pattern" | "simple_identifier"))
            {
                pending.push((name, None, None));
            }
        }

        let mut entries = Vec::new();
        for (name, annotation, value) in pending {
            // The initializer cannot see the names it initializes.
            let init = value.map(|v| self.expr(v));
            let type_loc = annotation.map(|a| self.type_loc(a));
            let ty = type_loc
                .and_then(|loc| loc.ty)
                .or_else(|| init.and_then(|e| self.ast.expr(e).ty));

            let ident = match name.kind() {
                "simple_identifier" => Some(name),
                _ => name.child_by_field_name("bound_identifier"),
            };
            let pattern = match ident {
                Some(ident) => self.named_pattern(ident, Some(is_let), ty),
                None => self.pattern(name, Some(is_let)),
            };
            let pattern = match (type_loc, annotation) {
                (Some(type_loc), Some(annotation)) => self.ast.add_pattern(
                    PatternKind::Typed {
                        sub: pattern,
                        type_loc,
                    },
                    Some(span_between(name, annotation)),
                ),
                _ => pattern,
            };
            entries.push(PatternBindingEntry { pattern, init });
        }

        self.ast
            .add_decl(DeclKind::PatternBinding { entries }, span(node))
    }

    fn type_alias(&mut self, node: Node<'a>) -> DeclId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).trim().to_string())
            .unwrap_or_default();
        let type_loc = node
            .child_by_field_name("value")
            .or_else(|| {
                named_children(node)
                    .into_iter()
                    .filter(|c| is_type_kind(c.kind()))
                    .last()
            })
            .map(|ty| self.type_loc(ty));
        let decl = self.ast.add_decl(
            DeclKind::TypeAlias {
                name: name.clone(),
                type_loc,
            },
            span(node),
        );
        self.declare(&name, decl);
        decl
    }

    fn enum_case(&mut self, node: Node<'a>) -> DeclId {
        let mut cursor = node.walk();
        let mut elements: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.text(n).trim().to_string())
            .collect();
        if elements.is_empty() {
            elements = named_children(node)
                .into_iter()
                .filter(|c| c.kind() == "simple_identifier")
                .map(|c| self.text(c).trim().to_string())
                .collect();
        }
        self.ast
            .add_decl(DeclKind::EnumCase { elements }, span(node))
    }

    // Statements

    fn stmt(&mut self, node: Node<'a>) -> StmtId {
        match node.kind() {
            "if_statement" => self.if_stmt(node),
            "guard_statement" => self.guard_stmt(node),
            "while_statement" => self.while_stmt(node),
            "repeat_while_statement" => self.repeat_while_stmt(node),
            "for_statement" => self.for_stmt(node),
            "switch_statement" => self.switch_stmt(node),
            "do_statement" => self.do_stmt(node),
            "control_transfer_statement" => self.control_transfer(node),
            "statements" => self.statements_block(node),
            _ => self.unknown_stmt(node),
        }
    }

    fn unknown_stmt(&mut self, node: Node<'a>) -> StmtId {
        let children = self.items(node);
        self.ast.add_stmt(
            StmtKind::Unknown {
                kind: node.kind().to_string(),
                children,
            },
            span(node),
        )
    }

    /// A `function_body`-like node wrapping `{ statements }`.
    fn block(&mut self, node: Node<'a>) -> StmtId {
        let children = children(node);
        match position(&children, "{") {
            Some(open) => self.braced(&children, open).0,
            None => self.statements_block(node),
        }
    }

    /// Lower the block opened by `children[open]`; returns it with the index
    /// just past its closing brace.
    fn braced(&mut self, children: &[Node<'a>], open: usize) -> (StmtId, usize) {
        let mut elements = Vec::new();
        let mut i = open + 1;
        self.push_scope();
        while i < children.len() && children[i].kind() != "}" {
            let child = children[i];
            if child.kind() == "statements" {
                for stmt in named_children(child) {
                    elements.push(self.item(stmt));
                }
            } else if is_operand(&child) {
                elements.push(self.item(child));
            }
            i += 1;
        }
        self.pop_scope();

        let last = children.get(i).or_else(|| children.last()).copied();
        let span = last.map(|last| span_between(children[open], last));
        let id = self.ast.add_stmt(StmtKind::Brace { elements }, span);
        (id, i + 1)
    }

    /// A brace statement over the elements of a `statements` node.
    fn statements_block(&mut self, node: Node<'a>) -> StmtId {
        let mut elements = Vec::new();
        for child in named_children(node) {
            if child.kind() == "statements" {
                for stmt in named_children(child) {
                    elements.push(self.item(stmt));
                }
            } else {
                elements.push(self.item(child));
            }
        }
        self.ast.add_stmt(StmtKind::Brace { elements }, span(node))
    }

    fn empty_block(&mut self, node: Node<'a>) -> StmtId {
        self.ast.add_stmt(
            StmtKind::Brace {
                elements: Vec::new(),
            },
            span(node),
        )
    }

    /// Lower a comma-separated condition list.
    fn condition(&mut self, nodes: &[Node<'a>]) -> StmtConditionId {
        let mut elements = Vec::new();
        for group in nodes.split(|n| n.kind() == ",") {
            if let Some(element) = self.condition_element(group) {
                elements.push(element);
            }
        }
        self.ast.add_stmt_condition(elements, span_of_nodes(nodes))
    }

    fn condition_element(&mut self, group: &[Node<'a>]) -> Option<ConditionElement> {
        let binding = group
            .iter()
            .position(|n| matches!(n.kind(), "value_binding_pattern" | "let" | "var" | "case"));
        let Some(at) = binding else {
            let expr = group.iter().find(|n| is_operand(n))?;
            return Some(ConditionElement::Boolean(self.expr(*expr)));
        };

        let keyword = self.text(group[at]).trim_start();
        let is_case = keyword.starts_with("case");
        let is_let = keyword.starts_with("let");
        let eq = position(group, "=");
        let pattern_end = eq.unwrap_or(group.len());
        let annotation = group[at + 1..pattern_end]
            .iter()
            .copied()
            .find(|n| n.kind() == "type_annotation");
        let pattern_node = group[at + 1..pattern_end]
            .iter()
            .copied()
            .find(|n| is_operand(n) && n.kind() != "type_annotation")?;
        let init_node = eq.and_then(|i| group[i + 1..].iter().copied().find(is_operand));

        // `if let x` rebinds the outer `x`; resolve before the new binding.
        let initializer = match init_node {
            Some(init) => self.expr(init),
            None => {
                let name = self.text(pattern_node).trim();
                self.decl_ref(pattern_node, name)
            }
        };

        let pattern = if is_case {
            match self.pattern_run(&group[at + 1..pattern_end], None) {
                Some(pattern) => pattern,
                None => self.pattern(pattern_node, None),
            }
        } else {
            let ty = annotation.map(|a| self.type_loc(a));
            let name = match pattern_node.kind() {
                "simple_identifier" => Some(pattern_node),
                _ => pattern_node.child_by_field_name("bound_identifier"),
            };
            let mut sub = match name {
                Some(name) => {
                    let var_ty = match ty {
                        Some(loc) => loc.ty,
                        None => self
                            .ast
                            .expr(initializer)
                            .ty
                            .map(|t| self.unwrap_optional(t)),
                    };
                    self.named_pattern(name, Some(is_let), var_ty)
                }
                None => self.pattern(pattern_node, Some(is_let)),
            };
            if let Some(type_loc) = ty {
                sub = self.ast.add_pattern(
                    PatternKind::Typed { sub, type_loc },
                    span(pattern_node),
                );
            }
            self.ast.add_pattern(
                PatternKind::Binding { is_let, sub },
                Some(span_between(group[at], pattern_node)),
            )
        };

        Some(ConditionElement::Pattern {
            pattern,
            initializer,
        })
    }

    /// `T` for `T?`, the type an optional binding introduces.
    fn unwrap_optional(&self, ty: TypeId) -> TypeId {
        match &self.ast.ty(ty).kind {
            TypeKind::Optional { base } => *base,
            _ => ty,
        }
    }

    fn if_stmt(&mut self, node: Node<'a>) -> StmtId {
        let children = children(node);
        let Some(open) = position(&children, "{") else {
            return self.unknown_stmt(node);
        };

        self.push_scope();
        let condition = self.condition(between(&children, 1, open));
        let (then_branch, next) = self.braced(&children, open);
        self.pop_scope();

        let else_branch = match children.get(next) {
            Some(e) if e.kind() == "else" => match children.get(next + 1) {
                Some(n) if n.kind() == "if_statement" => Some(self.if_stmt(*n)),
                Some(n) if n.kind() == "{" => Some(self.braced(&children, next + 1).0),
                _ => None,
            },
            _ => None,
        };

        self.ast.add_stmt(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span(node),
        )
    }

    fn guard_stmt(&mut self, node: Node<'a>) -> StmtId {
        let children = children(node);
        let (Some(else_at), Some(open)) = (position(&children, "else"), position(&children, "{"))
        else {
            return self.unknown_stmt(node);
        };
        if open < else_at {
            return self.unknown_stmt(node);
        }

        // Names bound by a guard stay visible after it.
        let condition = self.condition(between(&children, 1, else_at));
        let (body, _) = self.braced(&children, open);
        self.ast
            .add_stmt(StmtKind::Guard { condition, body }, span(node))
    }

    fn while_stmt(&mut self, node: Node<'a>) -> StmtId {
        let children = children(node);
        let Some(open) = position(&children, "{") else {
            return self.unknown_stmt(node);
        };

        self.push_scope();
        let condition = self.condition(between(&children, 1, open));
        let (body, _) = self.braced(&children, open);
        self.pop_scope();
        self.ast
            .add_stmt(StmtKind::While { condition, body }, span(node))
    }

    fn repeat_while_stmt(&mut self, node: Node<'a>) -> StmtId {
        let children = children(node);
        let Some(open) = position(&children, "{") else {
            return self.unknown_stmt(node);
        };
        let condition_node = children
            .iter()
            .rposition(|c| c.kind() == "while")
            .and_then(|at| children[at + 1..].iter().copied().find(is_operand));
        let Some(condition_node) = condition_node else {
            return self.unknown_stmt(node);
        };

        let (body, _) = self.braced(&children, open);
        let condition = self.expr(condition_node);
        self.ast
            .add_stmt(StmtKind::RepeatWhile { body, condition }, span(node))
    }

    fn for_stmt(&mut self, node: Node<'a>) -> StmtId {
        let children = children(node);
        let (Some(open), Some(in_at)) = (position(&children, "{"), position(&children, "in")) else {
            return self.unknown_stmt(node);
        };
        if in_at == 0 || in_at > open {
            return self.unknown_stmt(node);
        }
        let item = node.child_by_field_name("item").or_else(|| {
            children[1..in_at]
                .iter()
                .copied()
                .find(|c| c.is_named() && c.kind() != "type_annotation")
        });
        let sequence = node
            .child_by_field_name("collection")
            .or_else(|| children[in_at + 1..open].iter().copied().find(is_operand));
        let (Some(item), Some(sequence)) = (item, sequence) else {
            return self.unknown_stmt(node);
        };
        let annotation = children[1..in_at]
            .iter()
            .copied()
            .find(|c| c.kind() == "type_annotation");

        let sequence = self.expr(sequence);
        self.push_scope();
        let mut pattern = self.pattern(item, Some(true));
        if let Some(annotation) = annotation {
            let type_loc = self.type_loc(annotation);
            pattern = self.ast.add_pattern(
                PatternKind::Typed {
                    sub: pattern,
                    type_loc,
                },
                Some(span_between(item, annotation)),
            );
        }
        let (body, _) = self.braced(&children, open);
        self.pop_scope();

        self.ast.add_stmt(
            StmtKind::ForEach {
                pattern,
                sequence,
                body,
            },
            span(node),
        )
    }

    fn switch_stmt(&mut self, node: Node<'a>) -> StmtId {
        let children = children(node);
        let Some(open) = position(&children, "{") else {
            return self.unknown_stmt(node);
        };
        let subject = node
            .child_by_field_name("expr")
            .or_else(|| between(&children, 1, open).iter().copied().find(is_operand));
        let Some(subject) = subject else {
            return self.unknown_stmt(node);
        };

        let subject = self.expr(subject);
        let mut cases = Vec::new();
        for entry in &children[open..] {
            if entry.kind() == "switch_entry" {
                cases.push(self.switch_case(*entry));
            }
        }
        self.ast
            .add_stmt(StmtKind::Switch { subject, cases }, span(node))
    }

    fn switch_case(&mut self, node: Node<'a>) -> StmtId {
        self.push_scope();
        let mut labels: Vec<(PatternId, Option<ExprId>, Node<'a>)> = Vec::new();
        let mut body = None;
        let mut expect_guard = false;

        for child in children(node) {
            match child.kind() {
                "switch_pattern" => {
                    let inner = named_children(child).into_iter().next().unwrap_or(child);
                    let pattern = self.pattern(inner, None);
                    labels.push((pattern, None, child));
                }
                "where_keyword" | "where" => expect_guard = true,
                "statements" => body = Some(self.statements_block(child)),
                _ if expect_guard && is_operand(&child) => {
                    let guard = self.expr(child);
                    if let Some(label) = labels.last_mut() {
                        label.1 = Some(guard);
                    }
                    expect_guard = false;
                }
                _ => {}
            }
        }
        let body = match body {
            Some(body) => body,
            None => self.empty_block(node),
        };
        self.pop_scope();

        let labels = labels
            .into_iter()
            .map(|(pattern, guard, n)| self.ast.add_case_label_item(pattern, guard, span(n)))
            .collect();
        self.ast
            .add_stmt(StmtKind::Case { labels, body }, span(node))
    }

    fn do_stmt(&mut self, node: Node<'a>) -> StmtId {
        let parts = children(node);
        let Some(open) = position(&parts, "{") else {
            return self.unknown_stmt(node);
        };

        let (body, _) = self.braced(&parts, open);
        let mut catches = Vec::new();
        for child in &parts[open..] {
            if child.kind() != "catch_block" {
                continue;
            }
            let clause = children(*child);
            let block = match position(&clause, "{") {
                Some(open) => self.braced(&clause, open).0,
                None => self.empty_block(*child),
            };
            catches.push(block);
        }
        self.ast
            .add_stmt(StmtKind::Do { body, catches }, span(node))
    }

    fn control_transfer(&mut self, node: Node<'a>) -> StmtId {
        let keyword = children(node)
            .first()
            .map(|c| self.text(*c).trim())
            .unwrap_or("");
        let operand = node.child_by_field_name("result").or_else(|| {
            operands(node)
                .into_iter()
                .find(|c| c.kind() != "throw_keyword")
        });

        let kind = if keyword.starts_with("return") {
            StmtKind::Return {
                result: operand.map(|e| self.expr(e)),
            }
        } else if keyword.starts_with("throw") {
            match operand {
                Some(error) => StmtKind::Throw {
                    error: self.expr(error),
                },
                None => return self.unknown_stmt(node),
            }
        } else if keyword.starts_with("break") {
            StmtKind::Break
        } else if keyword.starts_with("continue") {
            StmtKind::Continue
        } else {
            return self.unknown_stmt(node);
        };
        self.ast.add_stmt(kind, span(node))
    }

    // Patterns

    /// A name in pattern position: binds a new variable inside a binding,
    /// otherwise matches against the value the name refers to.
    fn named_pattern(
        &mut self,
        node: Node<'a>,
        binding: Option<bool>,
        ty: Option<TypeId>,
    ) -> PatternId {
        let name = self.text(node).trim();
        match binding {
            Some(is_let) => {
                let var = self.ast.add_decl(
                    DeclKind::Var {
                        name: name.to_string(),
                        is_let,
                        ty,
                    },
                    span(node),
                );
                self.declare(name, var);
                self.ast.add_pattern(
                    PatternKind::Named {
                        name: name.to_string(),
                        var: Some(var),
                    },
                    span(node),
                )
            }
            None => {
                let expr = self.decl_ref(node, name);
                self.ast
                    .add_pattern(PatternKind::Expr { expr }, span(node))
            }
        }
    }

    /// Lower a pattern. `binding` is `Some(is_let)` when identifiers in the
    /// pattern introduce variables.
    fn pattern(&mut self, node: Node<'a>, binding: Option<bool>) -> PatternId {
        let text = self.text(node).trim();
        let named = named_children(node);

        match node.kind() {
            "simple_identifier" => return self.named_pattern(node, binding, None),
            "wildcard_pattern" => return self.ast.add_pattern(PatternKind::Any, span(node)),
            _ => {}
        }
        if text == "_" {
            return self.ast.add_pattern(PatternKind::Any, span(node));
        }
        if let Some(ident) = node.child_by_field_name("bound_identifier") {
            let pattern = self.named_pattern(ident, binding.or(Some(true)), None);
            return pattern;
        }

        let binding_keyword = named
            .first()
            .filter(|n| n.kind() == "value_binding_pattern")
            .map(|n| self.text(*n).trim())
            .or_else(|| {
                ["let ", "var "]
                    .into_iter()
                    .find(|k| text.starts_with(*k))
                    .map(str::trim)
            });
        if let Some(keyword) = binding_keyword {
            let is_let = keyword.starts_with("let");
            // `case let .some(x)`: the enum pieces are siblings of the keyword
            let rest: Vec<Node<'a>> = children(node)
                .into_iter()
                .filter(|n| !matches!(n.kind(), "value_binding_pattern" | "case"))
                .collect();
            if position(&rest, ".").is_some() {
                if let Some(sub) = self.pattern_run(&rest, Some(is_let)) {
                    return self
                        .ast
                        .add_pattern(PatternKind::Binding { is_let, sub }, span(node));
                }
            }
            let sub = named
                .iter()
                .copied()
                .find(|n| n.kind() != "value_binding_pattern");
            if let Some(sub) = sub {
                let sub = self.pattern(sub, Some(is_let));
                return self
                    .ast
                    .add_pattern(PatternKind::Binding { is_let, sub }, span(node));
            }
        }

        if text.starts_with("is ") {
            if let Some(ty) = named.iter().copied().find(|n| is_type_kind(n.kind())) {
                let type_loc = self.type_loc(ty);
                return self.ast.add_pattern(PatternKind::Is { type_loc }, span(node));
            }
        }

        if let Some(rest) = text.strip_prefix('.') {
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            let payload: Vec<Node<'a>> = named
                .iter()
                .copied()
                .skip_while(|n| self.text(*n).trim() != name)
                .skip(1)
                .collect();
            return self.enum_element(name, &payload, binding, span(node));
        }

        if text.starts_with('(') && node.kind() == "pattern" {
            let elements = named.iter().map(|p| self.pattern(*p, binding)).collect();
            return self
                .ast
                .add_pattern(PatternKind::Tuple { elements }, span(node));
        }

        if text.ends_with('?') && named.len() == 1 && node.kind() == "pattern" {
            let sub = self.pattern(named[0], binding);
            return self
                .ast
                .add_pattern(PatternKind::OptionalSome { sub }, span(node));
        }

        match (node.kind(), named.as_slice()) {
            ("pattern", [single]) => self.pattern(*single, binding),
            ("pattern", _) => {
                let children = self.items(node);
                self.ast.add_pattern(
                    PatternKind::Unknown {
                        kind: "pattern".to_string(),
                        children,
                    },
                    span(node),
                )
            }
            _ => {
                let expr = self.expr(node);
                self.ast
                    .add_pattern(PatternKind::Expr { expr }, span(node))
            }
        }
    }

    fn enum_element(
        &mut self,
        name: String,
        payload: &[Node<'a>],
        binding: Option<bool>,
        span: Option<Span>,
    ) -> PatternId {
        let sub = match payload {
            [] => None,
            [single] => Some(self.pattern(*single, binding)),
            many => {
                let elements = many.iter().map(|p| self.pattern(*p, binding)).collect();
                Some(
                    self.ast
                        .add_pattern(PatternKind::Tuple { elements }, span_of_nodes(many)),
                )
            }
        };
        self.ast
            .add_pattern(PatternKind::EnumElement { name, sub }, span)
    }

    /// Lower a pattern whose pieces are siblings rather than one node, as in
    /// the `let .some(x)` of `if case let .some(x) = y`.
    fn pattern_run(&mut self, nodes: &[Node<'a>], binding: Option<bool>) -> Option<PatternId> {
        let nodes: Vec<Node<'a>> = nodes
            .iter()
            .copied()
            .filter(|n| {
                !is_comment(n.kind()) && !matches!(n.kind(), "case" | "type_annotation")
            })
            .collect();
        let first = *nodes.first()?;
        let whole = span_of_nodes(&nodes);

        if first.kind() == "value_binding_pattern" {
            let is_let = self.text(first).trim_start().starts_with("let");
            let sub = self.pattern_run(&nodes[1..], Some(is_let))?;
            return Some(
                self.ast
                    .add_pattern(PatternKind::Binding { is_let, sub }, whole),
            );
        }

        if nodes.len() > 1 && nodes.last().map(|n| n.kind()) == Some("?") {
            let sub = self.pattern_run(&nodes[..nodes.len() - 1], binding)?;
            return Some(
                self.ast
                    .add_pattern(PatternKind::OptionalSome { sub }, whole),
            );
        }

        if first.kind() == "is" {
            let ty = nodes[1..].iter().copied().find(|n| is_type_kind(n.kind()))?;
            let type_loc = self.type_loc(ty);
            return Some(self.ast.add_pattern(PatternKind::Is { type_loc }, whole));
        }

        if let Some(dot) = position(&nodes, ".") {
            let name_node = nodes[dot + 1..]
                .iter()
                .copied()
                .find(|n| n.kind() == "simple_identifier")?;
            let name = self.text(name_node).trim().to_string();
            let payload: Vec<Node<'a>> = nodes
                .iter()
                .copied()
                .skip_while(|n| n.id() != name_node.id())
                .skip(1)
                .filter(|n| n.kind() == "pattern")
                .collect();
            return Some(self.enum_element(name, &payload, binding, whole));
        }

        let named: Vec<Node<'a>> = nodes.iter().copied().filter(|n| n.is_named()).collect();
        match named.as_slice() {
            [single] => Some(self.pattern(*single, binding)),
            _ => None,
        }
    }

    // Expressions

    fn expr(&mut self, node: Node<'a>) -> ExprId {
        let text = self.text(node).trim();
        match node.kind() {
            "integer_literal" | "hex_literal" | "oct_literal" | "bin_literal" => {
                let ty = self.ast.named_type("Int");
                self.ast.add_expr(
                    ExprKind::IntegerLiteral {
                        text: text.to_string(),
                    },
                    Some(ty),
                    span(node),
                )
            }
            "real_literal" => {
                let ty = self.ast.named_type("Double");
                self.ast.add_expr(
                    ExprKind::FloatLiteral {
                        text: text.to_string(),
                    },
                    Some(ty),
                    span(node),
                )
            }
            "line_string_literal" | "multi_line_string_literal" | "raw_string_literal" => {
                let ty = self.ast.named_type("String");
                self.ast.add_expr(
                    ExprKind::StringLiteral {
                        text: string_contents(text),
                    },
                    Some(ty),
                    span(node),
                )
            }
            "boolean_literal" => {
                let ty = self.ast.named_type("Bool");
                self.ast.add_expr(
                    ExprKind::BooleanLiteral {
                        value: text == "true",
                    },
                    Some(ty),
                    span(node),
                )
            }
            "nil" => self.ast.add_expr(ExprKind::NilLiteral, None, span(node)),
            "simple_identifier" => self.decl_ref(node, text),
            "self_expression" | "super_expression" => self.ast.add_expr(
                ExprKind::DeclRef {
                    name: text.to_string(),
                    decl: None,
                },
                None,
                span(node),
            ),
            "call_expression" => self.call(node),
            "additive_expression"
            | "multiplicative_expression"
            | "comparison_expression"
            | "equality_expression"
            | "conjunction_expression"
            | "disjunction_expression"
            | "nil_coalescing_expression"
            | "infix_expression"
            | "range_expression"
            | "bitwise_operation" => self.binary(node),
            "prefix_expression" => self.prefix(node),
            "navigation_expression" => self.member_ref(node),
            "tuple_expression" => self.tuple(node),
            "array_literal" => {
                let mut cursor = node.walk();
                let mut elements: Vec<Node<'a>> =
                    node.children_by_field_name("element", &mut cursor).collect();
                if elements.is_empty() {
                    elements = operands(node);
                }
                let elements = elements.into_iter().map(|e| self.expr(e)).collect();
                self.ast
                    .add_expr(ExprKind::Array { elements }, None, span(node))
            }
            "lambda_literal" => self.closure(node),
            "assignment" => self.assignment(node),
            "ternary_expression" => self.ternary(node),
            "try_expression" | "await_expression" | "directly_assignable_expression" => {
                match operands(node).last() {
                    Some(inner) => self.expr(*inner),
                    None => self.unknown_expr(node),
                }
            }
            _ => self.unknown_expr(node),
        }
    }

    fn unknown_expr(&mut self, node: Node<'a>) -> ExprId {
        let children = self.items(node);
        self.ast.add_expr(
            ExprKind::Unknown {
                kind: node.kind().to_string(),
                children,
            },
            None,
            span(node),
        )
    }

    fn decl_ref(&mut self, node: Node<'a>, name: &str) -> ExprId {
        let decl = self.resolve(name);
        let ty = decl.and_then(|d| self.decl_type(d));
        let id = self.ast.add_expr(
            ExprKind::DeclRef {
                name: name.to_string(),
                decl,
            },
            ty,
            span(node),
        );
        if decl.is_none() {
            self.unresolved.push(id);
        }
        id
    }

    fn call(&mut self, node: Node<'a>) -> ExprId {
        let parts = operands(node);
        let Some(callee) = parts.first().copied() else {
            return self.unknown_expr(node);
        };

        let callee = self.expr(callee);
        let mut arguments = Vec::new();
        for suffix in parts.iter().skip(1).filter(|n| n.kind() == "call_suffix") {
            for part in named_children(*suffix) {
                if part.kind() == "value_arguments" {
                    for arg in named_children(part) {
                        if arg.kind() == "value_argument" {
                            arguments.push(self.argument(arg));
                        }
                    }
                } else {
                    // Trailing closure
                    let expr = self.expr(part);
                    arguments.push(Argument { label: None, expr });
                }
            }
        }

        let ty = self.call_type(callee);
        self.ast
            .add_expr(ExprKind::Call { callee, arguments }, ty, span(node))
    }

    /// Result type of calling `callee`: a function's declared result, or the
    /// type itself for an initializer call.
    fn call_type(&mut self, callee: ExprId) -> Option<TypeId> {
        let (decl, name) = match &self.ast.expr(callee).kind {
            ExprKind::DeclRef {
                decl: Some(decl),
                name,
            } => (*decl, name.clone()),
            _ => return None,
        };
        let is_type = match &self.ast.decl(decl).kind {
            DeclKind::Func { result, .. } => return result.and_then(|r| r.ty),
            DeclKind::Nominal { kind, .. } => *kind != NominalKind::Protocol,
            _ => false,
        };
        if is_type {
            Some(self.ast.named_type(&name))
        } else {
            None
        }
    }

    fn argument(&mut self, node: Node<'a>) -> Argument {
        let parts = operands(node);
        let (label, value) = match parts.as_slice() {
            [label, value, ..] if label.kind() == "value_argument_label" => (
                Some(self.text(*label).trim().to_string()),
                Some(*value),
            ),
            _ => (
                None,
                node.child_by_field_name("value")
                    .or_else(|| parts.last().copied()),
            ),
        };
        let expr = match value {
            Some(value) => self.expr(value),
            None => self.unknown_expr(node),
        };
        Argument { label, expr }
    }

    fn binary(&mut self, node: Node<'a>) -> ExprId {
        let parts = operands(node);
        let lhs = node
            .child_by_field_name("lhs")
            .or_else(|| parts.first().copied());
        let rhs = node
            .child_by_field_name("rhs")
            .or_else(|| parts.last().copied());
        let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
            return self.unknown_expr(node);
        };
        if lhs == rhs {
            return self.unknown_expr(node);
        }

        let op = node
            .child_by_field_name("op")
            .map(|op| self.text(op).trim().to_string())
            .or_else(|| {
                children(node)
                    .into_iter()
                    .find(|c| !is_operand(c))
                    .map(|c| self.text(c).trim().to_string())
            })
            .unwrap_or_else(|| node.kind().to_string());

        let lhs = self.expr(lhs);
        let rhs = self.expr(rhs);
        let ty = match node.kind() {
            "comparison_expression"
            | "equality_expression"
            | "conjunction_expression"
            | "disjunction_expression" => Some(self.ast.named_type("Bool")),
            "additive_expression" | "multiplicative_expression" => {
                let lhs_ty = self.ast.expr(lhs).ty;
                if lhs_ty == self.ast.expr(rhs).ty {
                    lhs_ty
                } else {
                    None
                }
            }
            "nil_coalescing_expression" => self.ast.expr(rhs).ty,
            _ => None,
        };
        self.ast
            .add_expr(ExprKind::Binary { op, lhs, rhs }, ty, span(node))
    }

    fn prefix(&mut self, node: Node<'a>) -> ExprId {
        let parts = operands(node);
        let Some(operand) = node
            .child_by_field_name("target")
            .or_else(|| parts.last().copied())
        else {
            return self.unknown_expr(node);
        };
        let op = node
            .child_by_field_name("operation")
            .or_else(|| children(node).into_iter().next())
            .map(|op| self.text(op).trim().to_string())
            .unwrap_or_default();

        let operand = self.expr(operand);
        let ty = match op.as_str() {
            "!" => Some(self.ast.named_type("Bool")),
            "-" | "+" => self.ast.expr(operand).ty,
            _ => None,
        };
        self.ast
            .add_expr(ExprKind::Prefix { op, operand }, ty, span(node))
    }

    fn member_ref(&mut self, node: Node<'a>) -> ExprId {
        let parts = operands(node);
        let base = node
            .child_by_field_name("target")
            .or_else(|| parts.first().copied());
        let suffix = node
            .child_by_field_name("suffix")
            .or_else(|| parts.last().copied());
        let (Some(base), Some(suffix)) = (base, suffix) else {
            return self.unknown_expr(node);
        };
        let name_node = suffix.child_by_field_name("suffix").unwrap_or(suffix);
        let name = self
            .text(name_node)
            .trim()
            .trim_start_matches('.')
            .trim()
            .to_string();

        let base = self.expr(base);
        self.ast
            .add_expr(ExprKind::MemberRef { base, name }, None, span(node))
    }

    fn tuple(&mut self, node: Node<'a>) -> ExprId {
        let mut cursor = node.walk();
        let mut values: Vec<Node<'a>> = node.children_by_field_name("value", &mut cursor).collect();
        let labeled = node.child_by_field_name("name").is_some();
        if values.is_empty() {
            values = operands(node);
        }
        // `(x)` is a parenthesized expression
        if values.len() == 1 && !labeled {
            return self.expr(values[0]);
        }
        let elements = values.into_iter().map(|v| self.expr(v)).collect();
        self.ast
            .add_expr(ExprKind::Tuple { elements }, None, span(node))
    }

    fn closure(&mut self, node: Node<'a>) -> ExprId {
        self.push_scope();
        let mut params = Vec::new();
        let parameter_list = find_child(node, "lambda_function_type")
            .and_then(|ty| find_child(ty, "lambda_function_type_parameters"));
        if let Some(list) = parameter_list {
            for param in named_children(list) {
                if param.kind() != "lambda_parameter" {
                    continue;
                }
                let name = param
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_else(|| self.text(param))
                    .trim()
                    .to_string();
                let type_loc = named_children(param)
                    .into_iter()
                    .find(|c| is_type_kind(c.kind()))
                    .map(|ty| self.type_loc(ty));
                let decl = self.ast.add_decl(
                    DeclKind::Param {
                        name: name.clone(),
                        external_name: None,
                        type_loc,
                    },
                    span(param),
                );
                self.declare(&name, decl);
                params.push(decl);
            }
        }

        let mut elements = Vec::new();
        if let Some(statements) = find_child(node, "statements") {
            for stmt in named_children(statements) {
                elements.push(self.item(stmt));
            }
        }
        self.pop_scope();

        let body = self
            .ast
            .add_stmt(StmtKind::Brace { elements }, span(node));
        self.ast
            .add_expr(ExprKind::Closure { params, body }, None, span(node))
    }

    fn assignment(&mut self, node: Node<'a>) -> ExprId {
        let parts = operands(node);
        let dest = node
            .child_by_field_name("target")
            .or_else(|| parts.first().copied());
        let source = node
            .child_by_field_name("result")
            .or_else(|| parts.last().copied());
        let (Some(dest), Some(source)) = (dest, source) else {
            return self.unknown_expr(node);
        };
        let op = node
            .child_by_field_name("operator")
            .map(|op| self.text(op).trim())
            .unwrap_or("=");

        let source = self.expr(source);
        let dest = self.expr(dest);
        let kind = if op == "=" {
            ExprKind::Assign { dest, source }
        } else {
            // Compound assignment, e.g. `+=`
            ExprKind::Binary {
                op: op.to_string(),
                lhs: dest,
                rhs: source,
            }
        };
        self.ast.add_expr(kind, None, span(node))
    }

    fn ternary(&mut self, node: Node<'a>) -> ExprId {
        let parts = operands(node);
        let condition = node
            .child_by_field_name("condition")
            .or_else(|| parts.first().copied());
        let then_expr = node
            .child_by_field_name("if_true")
            .or_else(|| parts.get(1).copied());
        let else_expr = node
            .child_by_field_name("if_false")
            .or_else(|| parts.get(2).copied());
        let (Some(condition), Some(then_expr), Some(else_expr)) = (condition, then_expr, else_expr)
        else {
            return self.unknown_expr(node);
        };

        let condition = self.expr(condition);
        let then_expr = self.expr(then_expr);
        let else_expr = self.expr(else_expr);
        let then_ty = self.ast.expr(then_expr).ty;
        let ty = if then_ty == self.ast.expr(else_expr).ty {
            then_ty
        } else {
            None
        };
        self.ast.add_expr(
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            },
            ty,
            span(node),
        )
    }
}
