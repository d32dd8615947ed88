//! Source positions
//!
//! Construction calls carry no positions of their own. Whoever drives
//! them moves a current location forward, and every diagnostic recorded
//! meanwhile is stamped with it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based line and column in a named file. Line 0 means the position is
/// not known yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            filename: filename.to_owned(),
            line,
            column,
        }
    }

    pub fn unknown(filename: &str) -> Self {
        Self::new(filename, 0, 0)
    }

    pub fn is_known(&self) -> bool {
        self.line != 0
    }

    /// Same file, another position
    pub fn moved_to(&self, line: u32, column: u32) -> Self {
        Self {
            filename: self.filename.clone(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        } else {
            f.write_str(&self.filename)
        }
    }
}
