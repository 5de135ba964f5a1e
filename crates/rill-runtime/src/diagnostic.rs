//! Diagnostic system for errors and warnings
//!
//! All errors and warnings flow through the unified Diagnostic type,
//! ensuring consistent formatting across the lexer, parser, resolver, and
//! interpreter.

use crate::span::Span;
use crate::value::RuntimeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Fatal error that prevents execution
    Error,
    /// Warning that doesn't prevent execution
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message (error or warning)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "RL0402")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: usize,
    /// Length of error span
    pub length: usize,
    /// Additional notes (optional)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code: code.into(),
            message: message.into(),
            line: span.line,
            column: span.start + 1,
            length: span.len(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Create a new warning diagnostic with code
    pub fn warning_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code: code.into(),
            message: message.into(),
            line: span.line,
            column: span.start + 1,
            length: span.len(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Create a new error diagnostic (uses generic error code)
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::error_with_code("RL9999", message, span)
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[RL0402]: Undefined variable 'x'
        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level, self.code, self.message
        ));

        // Location: --> line 12, column 9
        output.push_str(&format!("  --> line {}, column {}\n", self.line, self.column));

        for note in &self.notes {
            output.push_str(&format!("  note: {}\n", note));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("  help: {}\n", help));
        }

        output
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.level, self.code, self.message)
    }
}

/// True if any diagnostic in the slice is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics
        .iter()
        .any(|d| d.level == DiagnosticLevel::Error)
}

impl From<RuntimeError> for Diagnostic {
    /// Convert a runtime error into its reporting form.
    ///
    /// Runtime errors terminate the current run; the diagnostic carries the
    /// offending site and a stable `RL04xx` code.
    fn from(error: RuntimeError) -> Self {
        let span = error.span();
        let code = match &error {
            RuntimeError::TypeError { .. } => "RL0401",
            RuntimeError::UndefinedVariable { .. } => "RL0402",
            RuntimeError::UndefinedProperty { .. } => "RL0403",
            RuntimeError::NotCallable { .. } => "RL0404",
            RuntimeError::ArityMismatch { .. } => "RL0405",
            RuntimeError::SuperclassNotClass { .. } => "RL0406",
            RuntimeError::NotAnInstance { .. } => "RL0407",
            RuntimeError::StackOverflow { .. } => "RL0408",
        };
        Diagnostic::error_with_code(code, error.to_string(), span)
    }
}
