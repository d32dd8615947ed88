//! Frontend configuration

use bcc_common::CompilerError;
use serde::{Deserialize, Serialize};

/// Per-unit settings, handed to [`crate::CompilationUnit::new`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Name of the produced module, usually the input file name
    pub module_name: String,
    /// Count implicit cast warnings as errors, blocking output
    pub warnings_as_errors: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            module_name: "module".to_string(),
            warnings_as_errors: false,
        }
    }
}

impl FrontendConfig {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            ..Self::default()
        }
    }

    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        serde_json::from_str(json)
            .map_err(|e| CompilerError::internal(format!("invalid frontend configuration: {e}")))
    }
}
