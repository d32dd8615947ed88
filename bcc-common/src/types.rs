//! Identifiers and small vocabulary types shared by every compiler stage

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol identifier, unique within one compilation unit
pub type SymbolId = u32;

/// Basic block label, unique within one IR function
pub type LabelId = u32;

/// SSA temporary, unique within one IR function
pub type TempId = u32;

/// Storage classes a declaration may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StorageClass {
    #[default]
    Auto,
    Static,
    Extern,
    Register,
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageClass::Auto => "auto",
            StorageClass::Static => "static",
            StorageClass::Extern => "extern",
            StorageClass::Register => "register",
        })
    }
}

/// Hands out consecutive ids from zero. Labels and temps are numbered
/// per function, so the IR builder restarts both at each function.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Ids handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_class_display() {
        assert_eq!(StorageClass::default(), StorageClass::Auto);
        assert_eq!(StorageClass::Static.to_string(), "static");
        assert_eq!(StorageClass::Extern.to_string(), "extern");
    }

    #[test]
    fn test_id_generator() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.issued(), 2);
        ids.reset();
        assert_eq!(ids.next_id(), 0);
    }
}
