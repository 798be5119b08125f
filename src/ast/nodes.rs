//! Node payloads for every AST shape.

use super::{
    AstNode, CaseLabelItemId, DeclId, ExprId, PatternId, Span, StmtConditionId, StmtId, TypeId,
    TypeReprId,
};

/// A syntactic type annotation together with the type it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeLoc {
    pub repr: TypeReprId,
    pub ty: Option<TypeId>,
}

/// A declaration.
#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Option<Span>,
}

/// Kind of nominal type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NominalKind {
    Class,
    Struct,
    Enum,
    Protocol,
    Extension,
    Actor,
}

impl NominalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NominalKind::Class => "class",
            NominalKind::Struct => "struct",
            NominalKind::Enum => "enum",
            NominalKind::Protocol => "protocol",
            NominalKind::Extension => "extension",
            NominalKind::Actor => "actor",
        }
    }

    /// Parse the declaration keyword (`class`, `struct`, ...).
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(NominalKind::Class),
            "struct" => Some(NominalKind::Struct),
            "enum" => Some(NominalKind::Enum),
            "protocol" => Some(NominalKind::Protocol),
            "extension" => Some(NominalKind::Extension),
            "actor" => Some(NominalKind::Actor),
            _ => None,
        }
    }
}

/// One `pattern = initializer` entry of a `let`/`var` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternBindingEntry {
    pub pattern: PatternId,
    pub init: Option<ExprId>,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Import {
        module: String,
    },
    Func {
        name: String,
        params: Vec<DeclId>,
        result: Option<TypeLoc>,
        body: Option<StmtId>,
    },
    Param {
        name: String,
        external_name: Option<String>,
        type_loc: Option<TypeLoc>,
    },
    Nominal {
        kind: NominalKind,
        name: String,
        inherited: Vec<TypeLoc>,
        members: Vec<DeclId>,
    },
    Var {
        name: String,
        is_let: bool,
        ty: Option<TypeId>,
    },
    PatternBinding {
        entries: Vec<PatternBindingEntry>,
    },
    EnumCase {
        elements: Vec<String>,
    },
    TypeAlias {
        name: String,
        type_loc: Option<TypeLoc>,
    },
    /// Statements at file scope, wrapped in a block.
    TopLevelCode {
        body: StmtId,
    },
    /// A construct the frontend could not model.
    Unknown {
        kind: String,
        children: Vec<AstNode>,
    },
}

impl DeclKind {
    pub fn name(&self) -> &str {
        match self {
            DeclKind::Import { .. } => "import",
            DeclKind::Func { .. } => "func",
            DeclKind::Param { .. } => "param",
            DeclKind::Nominal { kind, .. } => kind.as_str(),
            DeclKind::Var { .. } => "var",
            DeclKind::PatternBinding { .. } => "pattern_binding",
            DeclKind::EnumCase { .. } => "enum_case",
            DeclKind::TypeAlias { .. } => "typealias",
            DeclKind::TopLevelCode { .. } => "top_level_code",
            DeclKind::Unknown { kind, .. } => kind.as_str(),
        }
    }

    /// Name introduced by the declaration, if any.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            DeclKind::Func { name, .. }
            | DeclKind::Param { name, .. }
            | DeclKind::Nominal { name, .. }
            | DeclKind::Var { name, .. }
            | DeclKind::TypeAlias { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// A statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// A `{ ... }` block; elements may be declarations, statements or
    /// expressions.
    Brace {
        elements: Vec<AstNode>,
    },
    Return {
        result: Option<ExprId>,
    },
    If {
        condition: StmtConditionId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    Guard {
        condition: StmtConditionId,
        body: StmtId,
    },
    While {
        condition: StmtConditionId,
        body: StmtId,
    },
    RepeatWhile {
        body: StmtId,
        condition: ExprId,
    },
    ForEach {
        pattern: PatternId,
        sequence: ExprId,
        body: StmtId,
    },
    Switch {
        subject: ExprId,
        cases: Vec<StmtId>,
    },
    /// A switch case; `default:` has no labels.
    Case {
        labels: Vec<CaseLabelItemId>,
        body: StmtId,
    },
    Break,
    Continue,
    Throw {
        error: ExprId,
    },
    Defer {
        body: StmtId,
    },
    /// `do { } catch { }`; each catch clause is a block.
    Do {
        body: StmtId,
        catches: Vec<StmtId>,
    },
    Unknown {
        kind: String,
        children: Vec<AstNode>,
    },
}

impl StmtKind {
    pub fn name(&self) -> &str {
        match self {
            StmtKind::Brace { .. } => "brace",
            StmtKind::Return { .. } => "return",
            StmtKind::If { .. } => "if",
            StmtKind::Guard { .. } => "guard",
            StmtKind::While { .. } => "while",
            StmtKind::RepeatWhile { .. } => "repeat_while",
            StmtKind::ForEach { .. } => "for_each",
            StmtKind::Switch { .. } => "switch",
            StmtKind::Case { .. } => "case",
            StmtKind::Break => "break",
            StmtKind::Continue => "continue",
            StmtKind::Throw { .. } => "throw",
            StmtKind::Defer { .. } => "defer",
            StmtKind::Do { .. } => "do",
            StmtKind::Unknown { kind, .. } => kind.as_str(),
        }
    }
}

/// The comma-separated condition list of an `if`, `guard` or `while`.
#[derive(Debug, Clone)]
pub struct StmtCondition {
    pub elements: Vec<ConditionElement>,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionElement {
    /// A boolean expression.
    Boolean(ExprId),
    /// `let x = value` / `case .some(x) = value`.
    Pattern {
        pattern: PatternId,
        initializer: ExprId,
    },
}

/// One item of a `case a, b where cond:` label.
#[derive(Debug, Clone)]
pub struct CaseLabelItem {
    pub pattern: PatternId,
    pub guard: Option<ExprId>,
    pub span: Option<Span>,
}

/// An expression with its resolved type, when known.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<TypeId>,
    pub span: Option<Span>,
}

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub label: Option<String>,
    pub expr: ExprId,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntegerLiteral {
        text: String,
    },
    FloatLiteral {
        text: String,
    },
    StringLiteral {
        text: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NilLiteral,
    DeclRef {
        name: String,
        decl: Option<DeclId>,
    },
    Call {
        callee: ExprId,
        arguments: Vec<Argument>,
    },
    Binary {
        op: String,
        lhs: ExprId,
        rhs: ExprId,
    },
    Prefix {
        op: String,
        operand: ExprId,
    },
    MemberRef {
        base: ExprId,
        name: String,
    },
    Tuple {
        elements: Vec<ExprId>,
    },
    Array {
        elements: Vec<ExprId>,
    },
    Closure {
        params: Vec<DeclId>,
        body: StmtId,
    },
    Assign {
        dest: ExprId,
        source: ExprId,
    },
    Ternary {
        condition: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Unknown {
        kind: String,
        children: Vec<AstNode>,
    },
}

impl ExprKind {
    pub fn name(&self) -> &str {
        match self {
            ExprKind::IntegerLiteral { .. } => "integer_literal",
            ExprKind::FloatLiteral { .. } => "float_literal",
            ExprKind::StringLiteral { .. } => "string_literal",
            ExprKind::BooleanLiteral { .. } => "boolean_literal",
            ExprKind::NilLiteral => "nil_literal",
            ExprKind::DeclRef { .. } => "decl_ref",
            ExprKind::Call { .. } => "call",
            ExprKind::Binary { .. } => "binary",
            ExprKind::Prefix { .. } => "prefix",
            ExprKind::MemberRef { .. } => "member_ref",
            ExprKind::Tuple { .. } => "tuple",
            ExprKind::Array { .. } => "array",
            ExprKind::Closure { .. } => "closure",
            ExprKind::Assign { .. } => "assign",
            ExprKind::Ternary { .. } => "ternary",
            ExprKind::Unknown { kind, .. } => kind.as_str(),
        }
    }
}

/// A pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    /// Binds a name; `var` is the variable declaration it introduces.
    Named {
        name: String,
        var: Option<DeclId>,
    },
    /// `_`
    Any,
    Typed {
        sub: PatternId,
        type_loc: TypeLoc,
    },
    Tuple {
        elements: Vec<PatternId>,
    },
    /// An expression matched with `~=`.
    Expr {
        expr: ExprId,
    },
    /// `let p` / `var p`
    Binding {
        is_let: bool,
        sub: PatternId,
    },
    /// `.name` or `.name(sub)`
    EnumElement {
        name: String,
        sub: Option<PatternId>,
    },
    /// `is T`
    Is {
        type_loc: TypeLoc,
    },
    /// `p?`
    OptionalSome {
        sub: PatternId,
    },
    Unknown {
        kind: String,
        children: Vec<AstNode>,
    },
}

impl PatternKind {
    pub fn name(&self) -> &str {
        match self {
            PatternKind::Named { .. } => "named",
            PatternKind::Any => "any",
            PatternKind::Typed { .. } => "typed",
            PatternKind::Tuple { .. } => "tuple",
            PatternKind::Expr { .. } => "expr",
            PatternKind::Binding { .. } => "binding",
            PatternKind::EnumElement { .. } => "enum_element",
            PatternKind::Is { .. } => "is",
            PatternKind::OptionalSome { .. } => "optional_some",
            PatternKind::Unknown { kind, .. } => kind.as_str(),
        }
    }
}

/// A resolved, interned type.
#[derive(Debug, Clone)]
pub struct Type {
    pub kind: TypeKind,
    /// Canonical spelling, unique per interned type.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Nominal { name: String, args: Vec<TypeId> },
    Optional { base: TypeId },
    Array { element: TypeId },
    Dictionary { key: TypeId, value: TypeId },
    Tuple { elements: Vec<TypeId> },
    Function { params: Vec<TypeId>, result: TypeId },
    /// Annotation text the resolver could not make sense of.
    Unknown { text: String },
}

impl TypeKind {
    pub fn name(&self) -> &str {
        match self {
            TypeKind::Nominal { .. } => "nominal",
            TypeKind::Optional { .. } => "optional",
            TypeKind::Array { .. } => "array",
            TypeKind::Dictionary { .. } => "dictionary",
            TypeKind::Tuple { .. } => "tuple",
            TypeKind::Function { .. } => "function",
            TypeKind::Unknown { .. } => "unknown_type",
        }
    }
}

/// A syntactic type annotation.
#[derive(Debug, Clone)]
pub struct TypeRepr {
    pub text: String,
    pub span: Option<Span>,
}
