//! Canonicalization of type annotation text.
//!
//! The frontend resolves annotations syntactically: the annotation text is
//! parsed into a [`TypeShape`], sugar is normalized (`Optional<T>` is `T?`,
//! `Array<T>` is `[T]`, `Void` is `()`), and the shape is interned bottom-up
//! so equal types share one [`TypeId`].

use super::{AstContext, TypeId, TypeKind};

/// Structure of a type as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Named {
        name: String,
        args: Vec<TypeShape>,
    },
    Optional(Box<TypeShape>),
    Array(Box<TypeShape>),
    Dictionary(Box<TypeShape>, Box<TypeShape>),
    Tuple(Vec<TypeShape>),
    Function {
        params: Vec<TypeShape>,
        result: Box<TypeShape>,
    },
}

/// Words that may prefix a type without changing its identity.
const TYPE_PREFIX_WORDS: &[&str] = &[
    "inout",
    "some",
    "any",
    "borrowing",
    "consuming",
    "__owned",
    "__shared",
];

/// Effect words between a function's parameters and its arrow.
const EFFECT_WORDS: &[&str] = &["async", "throws", "rethrows"];

/// Parse annotation text into a shape.
///
/// Returns None for text that is not a well-formed type.
pub fn parse_type_text(text: &str) -> Option<TypeShape> {
    let mut parser = TypeTextParser {
        chars: text.chars().collect(),
        pos: 0,
    };
    let shape = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos == parser.chars.len() {
        Some(shape)
    } else {
        None
    }
}

struct TypeTextParser {
    chars: Vec<char>,
    pos: usize,
}

impl TypeTextParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        self.skip_ws();
        let len = expected.chars().count();
        let end = self.pos + len;
        if end <= self.chars.len() && self.chars[self.pos..end].iter().copied().eq(expected.chars()) {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            _ => return None,
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else if c == '.' && matches!(self.peek_at(1), Some(n) if n.is_alphabetic() || n == '_')
            {
                // Qualified name: Swift.Int
                self.pos += 1;
            } else {
                break;
            }
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    /// Consume any of `words` as whole words, returning whether one was eaten.
    fn skip_words(&mut self, words: &[&str]) -> bool {
        let mut skipped = false;
        loop {
            let save = self.pos;
            match self.ident() {
                Some(word) if words.contains(&word.as_str()) => skipped = true,
                _ => {
                    self.pos = save;
                    return skipped;
                }
            }
        }
    }

    fn skip_attributes(&mut self) {
        loop {
            if self.eat('@') {
                let _ = self.ident();
                continue;
            }
            if !self.skip_words(TYPE_PREFIX_WORDS) {
                break;
            }
        }
    }

    /// Whether an arrow follows, without consuming anything.
    fn arrow_follows(&mut self) -> bool {
        let save = self.pos;
        self.skip_words(EFFECT_WORDS);
        let found = self.eat_str("->");
        self.pos = save;
        found
    }

    fn parse_type(&mut self) -> Option<TypeShape> {
        self.skip_attributes();
        let base = self.parse_postfix()?;
        self.skip_words(EFFECT_WORDS);
        if self.eat_str("->") {
            let result = self.parse_type()?;
            let params = match base {
                TypeShape::Tuple(elements) => elements,
                other => vec![other],
            };
            return Some(TypeShape::Function {
                params,
                result: Box::new(result),
            });
        }
        Some(base)
    }

    fn parse_postfix(&mut self) -> Option<TypeShape> {
        let mut shape = self.parse_primary()?;
        loop {
            if self.eat_str("...") {
                shape = TypeShape::Array(Box::new(shape));
            } else if self.eat('?') || self.eat('!') {
                shape = TypeShape::Optional(Box::new(shape));
            } else {
                return Some(shape);
            }
        }
    }

    fn parse_primary(&mut self) -> Option<TypeShape> {
        if self.eat('[') {
            let first = self.parse_type()?;
            if self.eat(':') {
                let value = self.parse_type()?;
                if !self.eat(']') {
                    return None;
                }
                return Some(TypeShape::Dictionary(Box::new(first), Box::new(value)));
            }
            if !self.eat(']') {
                return None;
            }
            return Some(TypeShape::Array(Box::new(first)));
        }

        if self.eat('(') {
            let mut elements = Vec::new();
            if !self.eat(')') {
                loop {
                    self.skip_element_label();
                    elements.push(self.parse_type()?);
                    if self.eat(',') {
                        continue;
                    }
                    if self.eat(')') {
                        break;
                    }
                    return None;
                }
            }
            // (T) is just T unless it is a parameter list
            if elements.len() == 1 && !self.arrow_follows() {
                return elements.pop();
            }
            return Some(TypeShape::Tuple(elements));
        }

        let name = self.ident()?;
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return None;
            }
        }
        Some(desugar(name, args))
    }

    /// Skip `label:` or `_ label:` in a tuple element.
    fn skip_element_label(&mut self) {
        let save = self.pos;
        let first = self.ident();
        if first.is_some() {
            let after_first = self.pos;
            if self.eat(':') {
                return;
            }
            self.pos = after_first;
            if self.ident().is_some() && self.eat(':') {
                return;
            }
        }
        self.pos = save;
    }
}

fn desugar(name: String, mut args: Vec<TypeShape>) -> TypeShape {
    let bare = name.strip_prefix("Swift.").unwrap_or(&name);
    match (bare, args.len()) {
        ("Optional", 1) | ("ImplicitlyUnwrappedOptional", 1) => {
            TypeShape::Optional(Box::new(args.remove(0)))
        }
        ("Array", 1) => TypeShape::Array(Box::new(args.remove(0))),
        ("Dictionary", 2) => {
            let value = args.remove(1);
            let key = args.remove(0);
            TypeShape::Dictionary(Box::new(key), Box::new(value))
        }
        ("Void", 0) => TypeShape::Tuple(Vec::new()),
        _ => TypeShape::Named { name, args },
    }
}

impl AstContext {
    /// Intern a parsed shape, children first.
    pub fn intern_shape(&mut self, shape: &TypeShape) -> TypeId {
        let kind = match shape {
            TypeShape::Named { name, args } => {
                let args: Vec<TypeId> = args.iter().map(|a| self.intern_shape(a)).collect();
                TypeKind::Nominal {
                    name: name.clone(),
                    args,
                }
            }
            TypeShape::Optional(base) => TypeKind::Optional {
                base: self.intern_shape(base),
            },
            TypeShape::Array(element) => TypeKind::Array {
                element: self.intern_shape(element),
            },
            TypeShape::Dictionary(key, value) => {
                let key = self.intern_shape(key);
                let value = self.intern_shape(value);
                TypeKind::Dictionary { key, value }
            }
            TypeShape::Tuple(elements) => TypeKind::Tuple {
                elements: elements.iter().map(|e| self.intern_shape(e)).collect(),
            },
            TypeShape::Function { params, result } => {
                let params: Vec<TypeId> = params.iter().map(|p| self.intern_shape(p)).collect();
                let result = self.intern_shape(result);
                TypeKind::Function { params, result }
            }
        };
        self.intern_type(kind)
    }

    /// Resolve annotation text to an interned type.
    ///
    /// Text that does not parse becomes an unknown type keyed by its
    /// whitespace-normalized spelling.
    pub fn resolve_type_text(&mut self, text: &str) -> TypeId {
        match parse_type_text(text) {
            Some(shape) => self.intern_shape(&shape),
            None => self.intern_type(TypeKind::Unknown {
                text: text.split_whitespace().collect::<Vec<_>>().join(" "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeShape {
        TypeShape::Named {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    #[test]
    fn test_parse_optional_dictionary() {
        let shape = parse_type_text("[String: Int]?").unwrap();
        assert_eq!(
            shape,
            TypeShape::Optional(Box::new(TypeShape::Dictionary(
                Box::new(named("String")),
                Box::new(named("Int"))
            )))
        );
    }

    #[test]
    fn test_parse_function_types() {
        let shape = parse_type_text("(Int, String) throws -> Bool").unwrap();
        assert_eq!(
            shape,
            TypeShape::Function {
                params: vec![named("Int"), named("String")],
                result: Box::new(named("Bool")),
            }
        );

        let shape = parse_type_text("@escaping () -> Void").unwrap();
        assert_eq!(
            shape,
            TypeShape::Function {
                params: Vec::new(),
                result: Box::new(TypeShape::Tuple(Vec::new())),
            }
        );

        // Parenthesized function type made optional
        match parse_type_text("((Int) -> Void)?").unwrap() {
            TypeShape::Optional(inner) => {
                assert!(matches!(*inner, TypeShape::Function { .. }))
            }
            other => panic!("expected optional function type, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_prefixes_and_labels() {
        assert_eq!(
            parse_type_text("inout [Int]").unwrap(),
            TypeShape::Array(Box::new(named("Int")))
        );
        assert_eq!(
            parse_type_text("(x: Int, y: Int)").unwrap(),
            TypeShape::Tuple(vec![named("Int"), named("Int")])
        );
        assert_eq!(parse_type_text("Swift.Int").unwrap(), named("Swift.Int"));
        assert_eq!(
            parse_type_text("Int...").unwrap(),
            TypeShape::Array(Box::new(named("Int")))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert!(parse_type_text("[Int").is_none());
        assert!(parse_type_text("Int)").is_none());
        assert!(parse_type_text("").is_none());
        assert!(parse_type_text("Array<Int").is_none());
    }

    #[test]
    fn test_sugar_resolves_to_same_type() {
        let mut ast = AstContext::new();
        let a = ast.resolve_type_text("Optional<Int>");
        let b = ast.resolve_type_text("Int?");
        let c = ast.resolve_type_text("Int!");
        assert_eq!(a, b);
        assert_eq!(b, c);

        let d = ast.resolve_type_text("Array<Dictionary<String, Int>>");
        let e = ast.resolve_type_text("[[String : Int]]");
        assert_eq!(d, e);
        assert_eq!(ast.ty(d).name, "[[String: Int]]");

        assert_eq!(ast.resolve_type_text("Void"), ast.resolve_type_text("()"));
    }

    #[test]
    fn test_unparseable_text_is_unknown() {
        let mut ast = AstContext::new();
        let id = ast.resolve_type_text("[Int  ");
        assert!(matches!(ast.ty(id).kind, TypeKind::Unknown { .. }));
        assert_eq!(ast.ty(id).name, "[Int");
    }
}
