//! Labels: opaque, run-unique identifiers for AST nodes.

use super::ExtractError;
use crate::ast::NodeKey;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Identifier assigned to exactly one AST node for the duration of a run.
///
/// Rendered as `#N` in every output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(u64);

impl Label {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Node identity -> label, with the reverse map kept to catch two nodes
/// ending up with one label.
#[derive(Debug)]
pub struct LabelRegistry {
    labels: HashMap<NodeKey, Label>,
    owners: HashMap<Label, NodeKey>,
    next: u64,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self {
            labels: HashMap::new(),
            owners: HashMap::new(),
            next: 1,
        }
    }

    /// Label of `key`, allocating the next one on first sight.
    pub fn fetch(&mut self, key: NodeKey) -> Result<Label, ExtractError> {
        if let Some(&label) = self.labels.get(&key) {
            return Ok(label);
        }

        let label = Label(self.next);
        self.next += 1;

        if let Some(&existing) = self.owners.get(&label) {
            return Err(ExtractError::IdentityCollision {
                label,
                existing,
                new: key,
            });
        }

        self.owners.insert(label, key);
        self.labels.insert(key, label);
        Ok(label)
    }

    /// Label of `key` if one was already assigned.
    pub fn lookup(&self, key: NodeKey) -> Option<Label> {
        self.labels.get(&key).copied()
    }

    /// The node a label was assigned to.
    pub fn owner(&self, label: Label) -> Option<NodeKey> {
        self.owners.get(&label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstContext, AstNode, ExprKind};

    fn two_exprs() -> (NodeKey, NodeKey) {
        let mut ast = AstContext::new();
        let a = ast.add_expr(ExprKind::NilLiteral, None, None);
        let b = ast.add_expr(ExprKind::NilLiteral, None, None);
        (AstNode::from(a).key(), AstNode::from(b).key())
    }

    #[test]
    fn test_fetch_is_stable() {
        let (a, b) = two_exprs();
        let mut registry = LabelRegistry::new();

        let first = registry.fetch(a).unwrap();
        let second = registry.fetch(b).unwrap();
        assert_eq!(registry.fetch(a).unwrap(), first);
        assert_ne!(first, second);
        assert_eq!(first.get(), 1);
        assert_eq!(second.to_string(), "#2");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.owner(first), Some(a));
    }

    #[test]
    fn test_lookup_never_allocates() {
        let (a, _) = two_exprs();
        let mut registry = LabelRegistry::new();
        assert_eq!(registry.lookup(a), None);
        assert!(registry.is_empty());

        let label = registry.fetch(a).unwrap();
        assert_eq!(registry.lookup(a), Some(label));
    }

    #[test]
    fn test_collision_is_fatal() {
        let (a, b) = two_exprs();
        let mut registry = LabelRegistry::new();
        let label = registry.fetch(a).unwrap();

        // Force the allocator to hand out a label that is already owned.
        registry.next = label.get();
        match registry.fetch(b) {
            Err(ExtractError::IdentityCollision {
                label: l,
                existing,
                new,
            }) => {
                assert_eq!(l, label);
                assert_eq!(existing, a);
                assert_eq!(new, b);
            }
            other => panic!("expected collision, got {:?}", other),
        }
        assert_eq!(registry.lookup(b), None);
    }

    #[test]
    fn test_label_serializes_as_text() {
        let json = serde_json::to_string(&Label(7)).unwrap();
        assert_eq!(json, "\"#7\"");
    }
}
