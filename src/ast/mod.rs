//! In-memory Swift AST consumed by the extractor.
//!
//! The AST is an arena owned by [`AstContext`]: one vector per node shape,
//! addressed through typed ids. Node identity is the pair (shape, index), so
//! two structurally equal nodes stored twice stay distinct, while a node that
//! is referenced from many parents (a shared subterm) is one node.
//!
//! # Node shapes
//!
//! ```text
//! Decl ─┬─ Stmt ── StmtCondition
//!       │     └─── CaseLabelItem
//!       ├─ Expr
//!       ├─ Pattern
//!       └─ TypeRepr ── Type (resolved, interned)
//! ```
//!
//! Resolved types are value-like: [`AstContext::intern_type`] hands out the
//! same [`TypeId`] for the same canonical type.

mod nodes;
mod types;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub use nodes::{
    Argument, CaseLabelItem, ConditionElement, Decl, DeclKind, Expr, ExprKind, NominalKind,
    Pattern, PatternBindingEntry, PatternKind, Stmt, StmtCondition, StmtKind, Type, TypeKind,
    TypeLoc, TypeRepr,
};
pub use types::{parse_type_text, TypeShape};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Position of the node in its arena.
            pub fn index(self) -> usize {
                self.0 as usize
            }

            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

define_id!(
    /// Id of a declaration.
    DeclId
);
define_id!(
    /// Id of a statement.
    StmtId
);
define_id!(
    /// Id of an expression.
    ExprId
);
define_id!(
    /// Id of a pattern.
    PatternId
);
define_id!(
    /// Id of an interned, resolved type.
    TypeId
);
define_id!(
    /// Id of a syntactic type annotation.
    TypeReprId
);
define_id!(
    /// Id of the condition list of an `if`/`guard`/`while`.
    StmtConditionId
);
define_id!(
    /// Id of one `case` label item of a switch case.
    CaseLabelItemId
);

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// The node shapes the extractor routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Decl,
    Stmt,
    StmtCondition,
    CaseLabelItem,
    Expr,
    Pattern,
    Type,
    TypeRepr,
}

impl Category {
    /// Every category, in routing order.
    pub const ALL: [Category; 8] = [
        Category::Decl,
        Category::Stmt,
        Category::StmtCondition,
        Category::CaseLabelItem,
        Category::Expr,
        Category::Pattern,
        Category::Type,
        Category::TypeRepr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Decl => "decl",
            Category::Stmt => "stmt",
            Category::StmtCondition => "stmt_condition",
            Category::CaseLabelItem => "case_label_item",
            Category::Expr => "expr",
            Category::Pattern => "pattern",
            Category::Type => "type",
            Category::TypeRepr => "type_repr",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to extract one node, tagged with its shape.
///
/// The `TypeRepr` variant pairs the syntactic annotation with the type it
/// resolved to; the two are distinct objects but are always visited together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstNode {
    Decl(DeclId),
    Stmt(StmtId),
    StmtCondition(StmtConditionId),
    CaseLabelItem(CaseLabelItemId),
    Expr(ExprId),
    Pattern(PatternId),
    Type(TypeId),
    TypeRepr(TypeReprId, Option<TypeId>),
}

impl AstNode {
    /// The routing discriminant of this node.
    pub fn category(&self) -> Category {
        match self {
            AstNode::Decl(_) => Category::Decl,
            AstNode::Stmt(_) => Category::Stmt,
            AstNode::StmtCondition(_) => Category::StmtCondition,
            AstNode::CaseLabelItem(_) => Category::CaseLabelItem,
            AstNode::Expr(_) => Category::Expr,
            AstNode::Pattern(_) => Category::Pattern,
            AstNode::Type(_) => Category::Type,
            AstNode::TypeRepr(..) => Category::TypeRepr,
        }
    }

    /// Identity of the node. A type annotation is identified by its
    /// syntactic node alone.
    pub fn key(&self) -> NodeKey {
        match *self {
            AstNode::Decl(id) => NodeKey::Decl(id),
            AstNode::Stmt(id) => NodeKey::Stmt(id),
            AstNode::StmtCondition(id) => NodeKey::StmtCondition(id),
            AstNode::CaseLabelItem(id) => NodeKey::CaseLabelItem(id),
            AstNode::Expr(id) => NodeKey::Expr(id),
            AstNode::Pattern(id) => NodeKey::Pattern(id),
            AstNode::Type(id) => NodeKey::Type(id),
            AstNode::TypeRepr(id, _) => NodeKey::TypeRepr(id),
        }
    }
}

/// Identity key of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Decl(DeclId),
    Stmt(StmtId),
    StmtCondition(StmtConditionId),
    CaseLabelItem(CaseLabelItemId),
    Expr(ExprId),
    Pattern(PatternId),
    Type(TypeId),
    TypeRepr(TypeReprId),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Decl(id) => write!(f, "decl[{}]", id.index()),
            NodeKey::Stmt(id) => write!(f, "stmt[{}]", id.index()),
            NodeKey::StmtCondition(id) => write!(f, "stmt_condition[{}]", id.index()),
            NodeKey::CaseLabelItem(id) => write!(f, "case_label_item[{}]", id.index()),
            NodeKey::Expr(id) => write!(f, "expr[{}]", id.index()),
            NodeKey::Pattern(id) => write!(f, "pattern[{}]", id.index()),
            NodeKey::Type(id) => write!(f, "type[{}]", id.index()),
            NodeKey::TypeRepr(id) => write!(f, "type_repr[{}]", id.index()),
        }
    }
}

macro_rules! impl_from_id {
    ($($id:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$id> for AstNode {
                fn from(id: $id) -> Self {
                    AstNode::$variant(id)
                }
            }
        )*
    };
}

impl_from_id! {
    DeclId => Decl,
    StmtId => Stmt,
    StmtConditionId => StmtCondition,
    CaseLabelItemId => CaseLabelItem,
    ExprId => Expr,
    PatternId => Pattern,
    TypeId => Type,
}

impl From<TypeLoc> for AstNode {
    fn from(loc: TypeLoc) -> Self {
        AstNode::TypeRepr(loc.repr, loc.ty)
    }
}

/// Arena owning every node of one source file.
#[derive(Debug, Default)]
pub struct AstContext {
    decls: Vec<Decl>,
    stmts: Vec<Stmt>,
    exprs: Vec<Expr>,
    patterns: Vec<Pattern>,
    types: Vec<Type>,
    type_reprs: Vec<TypeRepr>,
    conditions: Vec<StmtCondition>,
    case_label_items: Vec<CaseLabelItem>,
    /// Canonical type name -> interned type.
    type_index: HashMap<String, TypeId>,
}

impl AstContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_decl(&mut self, kind: DeclKind, span: Option<Span>) -> DeclId {
        self.decls.push(Decl { kind, span });
        DeclId::from_index(self.decls.len() - 1)
    }

    pub fn add_stmt(&mut self, kind: StmtKind, span: Option<Span>) -> StmtId {
        self.stmts.push(Stmt { kind, span });
        StmtId::from_index(self.stmts.len() - 1)
    }

    pub fn add_expr(&mut self, kind: ExprKind, ty: Option<TypeId>, span: Option<Span>) -> ExprId {
        self.exprs.push(Expr { kind, ty, span });
        ExprId::from_index(self.exprs.len() - 1)
    }

    pub fn add_pattern(&mut self, kind: PatternKind, span: Option<Span>) -> PatternId {
        self.patterns.push(Pattern { kind, span });
        PatternId::from_index(self.patterns.len() - 1)
    }

    pub fn add_type_repr(&mut self, text: impl Into<String>, span: Option<Span>) -> TypeReprId {
        self.type_reprs.push(TypeRepr {
            text: text.into(),
            span,
        });
        TypeReprId::from_index(self.type_reprs.len() - 1)
    }

    pub fn add_stmt_condition(
        &mut self,
        elements: Vec<ConditionElement>,
        span: Option<Span>,
    ) -> StmtConditionId {
        self.conditions.push(StmtCondition { elements, span });
        StmtConditionId::from_index(self.conditions.len() - 1)
    }

    pub fn add_case_label_item(
        &mut self,
        pattern: PatternId,
        guard: Option<ExprId>,
        span: Option<Span>,
    ) -> CaseLabelItemId {
        self.case_label_items.push(CaseLabelItem {
            pattern,
            guard,
            span,
        });
        CaseLabelItemId::from_index(self.case_label_items.len() - 1)
    }

    /// Intern a resolved type.
    ///
    /// Types with the same canonical name share one id.
    pub fn intern_type(&mut self, kind: TypeKind) -> TypeId {
        let name = self.canonical_name(&kind);
        if let Some(&id) = self.type_index.get(&name) {
            return id;
        }
        self.types.push(Type {
            kind,
            name: name.clone(),
        });
        let id = TypeId::from_index(self.types.len() - 1);
        self.type_index.insert(name, id);
        id
    }

    /// Intern the nominal type `name` with no generic arguments.
    pub fn named_type(&mut self, name: &str) -> TypeId {
        self.intern_type(TypeKind::Nominal {
            name: name.to_string(),
            args: Vec::new(),
        })
    }

    /// Look up an already interned type by canonical name.
    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.type_index.get(name).copied()
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn type_repr(&self, id: TypeReprId) -> &TypeRepr {
        &self.type_reprs[id.index()]
    }

    pub fn stmt_condition(&self, id: StmtConditionId) -> &StmtCondition {
        &self.conditions[id.index()]
    }

    pub fn case_label_item(&self, id: CaseLabelItemId) -> &CaseLabelItem {
        &self.case_label_items[id.index()]
    }

    /// Source span of any node. Resolved types have none.
    pub fn span_of(&self, node: AstNode) -> Option<Span> {
        match node {
            AstNode::Decl(id) => self.decl(id).span,
            AstNode::Stmt(id) => self.stmt(id).span,
            AstNode::StmtCondition(id) => self.stmt_condition(id).span,
            AstNode::CaseLabelItem(id) => self.case_label_item(id).span,
            AstNode::Expr(id) => self.expr(id).span,
            AstNode::Pattern(id) => self.pattern(id).span,
            AstNode::Type(_) => None,
            AstNode::TypeRepr(id, _) => self.type_repr(id).span,
        }
    }

    /// Declarations in creation order.
    pub fn decls(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId::from_index(i), decl))
    }

    pub fn stmts(&self) -> impl Iterator<Item = (StmtId, &Stmt)> {
        self.stmts
            .iter()
            .enumerate()
            .map(|(i, stmt)| (StmtId::from_index(i), stmt))
    }

    pub fn exprs(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, expr)| (ExprId::from_index(i), expr))
    }

    pub fn patterns(&self) -> impl Iterator<Item = (PatternId, &Pattern)> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(i, pattern)| (PatternId::from_index(i), pattern))
    }

    fn canonical_name(&self, kind: &TypeKind) -> String {
        let name = |id: &TypeId| self.ty(*id).name.as_str();
        match kind {
            TypeKind::Nominal { name: n, args } if args.is_empty() => n.clone(),
            TypeKind::Nominal { name: n, args } => {
                let args: Vec<_> = args.iter().map(name).collect();
                format!("{}<{}>", n, args.join(", "))
            }
            TypeKind::Optional { base } => match self.ty(*base).kind {
                TypeKind::Function { .. } => format!("({})?", name(base)),
                _ => format!("{}?", name(base)),
            },
            TypeKind::Array { element } => format!("[{}]", name(element)),
            TypeKind::Dictionary { key, value } => format!("[{}: {}]", name(key), name(value)),
            TypeKind::Tuple { elements } => {
                let elements: Vec<_> = elements.iter().map(name).collect();
                format!("({})", elements.join(", "))
            }
            TypeKind::Function { params, result } => {
                let params: Vec<_> = params.iter().map(name).collect();
                format!("({}) -> {}", params.join(", "), name(result))
            }
            TypeKind::Unknown { text } => text.trim().to_string(),
        }
    }
}
