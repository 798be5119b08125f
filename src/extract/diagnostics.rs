//! Recovered problems reported during extraction.

use super::Label;
use crate::ast::{Category, Span};
use serde::{Deserialize, Serialize};

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A node that could not be fully modeled.
///
/// Every diagnostic is paired with an `unspecified_elements` fact for the
/// same label.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub label: Label,
    pub category: Category,
    /// Kind of the offending node, e.g. `dictionary_literal` or `ERROR`.
    pub kind: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Severity and message for an unsupported node of `kind`.
    pub fn classify(category: Category, kind: &str) -> (Severity, String) {
        match (category, kind) {
            (_, "ERROR") => (Severity::Error, "syntax error".to_string()),
            (Category::Type, _) => (
                Severity::Info,
                format!("type `{}` could not be resolved", kind),
            ),
            _ => (
                Severity::Warning,
                format!("unsupported {} `{}`", category, kind),
            ),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span {
            Some(span) => write!(f, "{}: ", span)?,
            None => write!(f, "-: ")?,
        }
        write!(f, "{} [{}] {}", self.severity, self.label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display_and_order() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Info);
    }

    #[test]
    fn test_classify() {
        let (severity, message) = Diagnostic::classify(Category::Expr, "ERROR");
        assert_eq!(severity, Severity::Error);
        assert_eq!(message, "syntax error");

        let (severity, message) = Diagnostic::classify(Category::Expr, "dictionary_literal");
        assert_eq!(severity, Severity::Warning);
        assert_eq!(message, "unsupported expr `dictionary_literal`");

        let (severity, _) = Diagnostic::classify(Category::Type, "Foo<");
        assert_eq!(severity, Severity::Info);
    }
}
