//! Diagnostics sink for one compilation unit

use super::errors::{SemanticError, SemanticWarning};
use bcc_common::{ErrorReporter, SourceLocation};

/// Collects the typed errors and warnings raised while building a unit
/// and forwards their rendered form to an [`ErrorReporter`], whose error
/// counter decides whether the unit produces output.
#[derive(Debug)]
pub struct Diagnostics {
    reporter: ErrorReporter,
    errors: Vec<SemanticError>,
    warnings: Vec<SemanticWarning>,
    location: SourceLocation,
    warnings_as_errors: bool,
}

impl Diagnostics {
    pub fn new(filename: &str) -> Self {
        Self {
            reporter: ErrorReporter::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            location: SourceLocation::unknown(filename),
            warnings_as_errors: false,
        }
    }

    /// Count every warning as an error as well
    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    /// Position stamped on every diagnostic recorded from now on
    pub fn set_location(&mut self, location: SourceLocation) {
        self.location = location;
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn error(&mut self, error: SemanticError) {
        log::error!("{}: {}", self.location, error);
        self.reporter.error(error.to_string(), self.location.clone());
        self.errors.push(error);
    }

    pub fn warning(&mut self, warning: SemanticWarning) {
        log::warn!("{}: {}", self.location, warning);
        let message = warning.to_string();
        if self.warnings_as_errors {
            self.reporter
                .error(message, self.location.clone())
                .notes
                .push("warnings are treated as errors".to_string());
        } else {
            self.reporter.warning(message, self.location.clone());
        }
        self.warnings.push(warning);
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[SemanticWarning] {
        &self.warnings
    }

    /// Whether output must be withheld for this unit
    pub fn has_errors(&self) -> bool {
        self.reporter.has_errors()
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Forget everything recorded so far, keeping the settings
    pub fn reset(&mut self) {
        self.reporter.clear();
        self.errors.clear();
        self.warnings.clear();
        self.location = SourceLocation::unknown(&self.location.filename);
    }
}
