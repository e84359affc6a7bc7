//! Diagnostics produced while scanning and parsing. These are recoverable by design: they
//! accumulate in source order and the parse continues, so a partially broken file still
//! yields a tree.

use rcss_shared::byte_stream::Span;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// How bad a diagnostic is. The parser core itself only emits errors; the warning level
/// exists for downstream tooling that layers checks on top of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// A character that matches no lexical class; the scanner skipped it
    LexError,
    /// A production's expected token was not found
    SyntaxError,
    /// A construct was still open when the input ended
    UnexpectedEndOfInput,
}

/// A single recoverable error (message) on the given position
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Human readable message
    pub message: String,
    /// Source extent the diagnostic points at
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} at {}:{}",
            self.severity, self.message, self.span.start.line, self.span.start.column
        )
    }
}
