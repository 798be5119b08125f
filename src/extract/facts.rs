//! Relational facts emitted by the visitors.

use super::Label;
use serde::Serialize;
use std::fmt;

/// One argument of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FactValue {
    Label(Label),
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Label(label) => write!(f, "{}", label),
            FactValue::Str(s) => write!(f, "\"{}\"", escape(s)),
            FactValue::Int(n) => write!(f, "{}", n),
            FactValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Escape a string for the quoted trap form.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl From<Label> for FactValue {
    fn from(label: Label) -> Self {
        FactValue::Label(label)
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Str(s.to_string())
    }
}

impl From<&String> for FactValue {
    fn from(s: &String) -> Self {
        FactValue::Str(s.clone())
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::Str(s)
    }
}

impl From<usize> for FactValue {
    fn from(n: usize) -> Self {
        FactValue::Int(n as i64)
    }
}

impl From<i64> for FactValue {
    fn from(n: i64) -> Self {
        FactValue::Int(n)
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

/// A named relation over labels and scalars, e.g. `func_decls(#3, "main")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub relation: &'static str,
    pub args: Vec<FactValue>,
}

impl Fact {
    pub fn new(relation: &'static str, args: Vec<FactValue>) -> Self {
        Self { relation, args }
    }

    /// The first argument when it is a label, i.e. the node the fact is about.
    pub fn subject(&self) -> Option<Label> {
        match self.args.first() {
            Some(FactValue::Label(label)) => Some(*label),
            _ => None,
        }
    }

    /// Every label mentioned by the fact.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.args.iter().filter_map(|arg| match arg {
            FactValue::Label(label) => Some(*label),
            _ => None,
        })
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.relation)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

/// Build a [`Fact`] from a relation name and arguments convertible into
/// [`FactValue`].
macro_rules! fact {
    ($relation:expr $(, $arg:expr)* $(,)?) => {
        $crate::extract::Fact::new(
            $relation,
            vec![$($crate::extract::FactValue::from($arg)),*],
        )
    };
}

pub(crate) use fact;

/// Append-only fact buffer for one run.
#[derive(Debug, Default)]
pub struct FactSink {
    facts: Vec<Fact>,
}

impl FactSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, fact: Fact) {
        self.facts.push(fact);
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn into_facts(self) -> Vec<Fact> {
        self.facts
    }
}
