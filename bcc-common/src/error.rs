//! Compiler-wide errors and the per-unit diagnostic log

use crate::source_loc::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures that abort a compiler operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Semantic error at {location}: {message}")]
    SemanticError {
        location: SourceLocation,
        message: String,
    },

    #[error("Code generation error at {location}: {message}")]
    CodegenError {
        location: SourceLocation,
        message: String,
    },

    /// The unit recorded errors, so it produces no output
    #[error("Compilation of '{unit}' failed: {summary}")]
    UnitRejected { unit: String, summary: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    pub fn semantic_error(message: String, location: SourceLocation) -> Self {
        CompilerError::SemanticError { location, message }
    }

    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::CodegenError { location, message }
    }

    /// A defect in the compiler itself rather than in its input
    pub fn internal(message: impl Into<String>) -> Self {
        CompilerError::InternalError { message: message.into() }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError { message: err.to_string() }
    }
}

/// IR builder failures are plain strings
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::internal(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn noun(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// One rendered message, as a user would see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity,
            message: message.into(),
            location,
            notes: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)?;
        self.notes.iter().try_for_each(|note| write!(f, "\n  note: {note}"))
    }
}

/// Ordered log of the diagnostics of one compilation unit.
///
/// A unit with at least one error must not produce output; warnings never
/// block it.
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: String, location: SourceLocation) -> &mut Diagnostic {
        self.report(Diagnostic::new(Severity::Error, message, location))
    }

    pub fn warning(&mut self, message: String, location: SourceLocation) -> &mut Diagnostic {
        self.report(Diagnostic::new(Severity::Warning, message, location))
    }

    /// Append `diagnostic`, handing it back so notes can be attached
    pub fn report(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        self.diagnostics.push(diagnostic);
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// e.g. "2 errors and 1 warning"
    pub fn summary(&self) -> String {
        let counted = [Severity::Error, Severity::Warning]
            .into_iter()
            .filter_map(|severity| match self.count(severity) {
                0 => None,
                1 => Some(format!("1 {severity}")),
                n => Some(format!("{n} {severity}s")),
            })
            .collect::<Vec<_>>();

        if counted.is_empty() {
            "No errors or warnings".to_string()
        } else {
            counted.join(" and ")
        }
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32) -> SourceLocation {
        SourceLocation::new("test.c", line, 1)
    }

    #[test]
    fn test_reporter_counts() {
        let mut reporter = ErrorReporter::new();
        reporter.warning("unused value".to_string(), at(1));
        assert!(!reporter.has_errors());
        assert_eq!(reporter.warning_count(), 1);

        reporter.error("bad operand".to_string(), at(2));
        assert!(reporter.has_errors());
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.diagnostics().len(), 2);

        reporter.clear();
        assert!(!reporter.has_errors());
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_notes_are_rendered() {
        let mut reporter = ErrorReporter::new();
        reporter
            .error("bad operand".to_string(), at(4))
            .notes
            .push("while checking 'x'".to_string());
        assert_eq!(
            reporter.diagnostics()[0].to_string(),
            "test.c:4:1: error: bad operand\n  note: while checking 'x'"
        );
    }

    #[test]
    fn test_summary() {
        let mut reporter = ErrorReporter::new();
        assert_eq!(reporter.summary(), "No errors or warnings");

        reporter.warning("w".to_string(), at(1));
        assert_eq!(reporter.summary(), "1 warning");

        reporter.error("e1".to_string(), at(2));
        reporter.error("e2".to_string(), at(3));
        assert_eq!(reporter.summary(), "2 errors and 1 warning");
    }

    #[test]
    fn test_builder_strings_become_internal_errors() {
        let err: CompilerError = String::from("No current block").into();
        assert_eq!(err.to_string(), "Internal compiler error: No current block");
    }
}
