//! Symbol table built during pass 1.

use std::collections::BTreeMap;

use crate::errors::AssembleErrorKind;

/// Label-to-address map with duplicate detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    labels: BTreeMap<String, u32>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    /// Declares `name` at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleErrorKind::DuplicateLabel`] when `name` was already
    /// declared, regardless of address.
    pub fn define(&mut self, name: &str, address: u32) -> Result<(), AssembleErrorKind> {
        if self.labels.contains_key(name) {
            return Err(AssembleErrorKind::DuplicateLabel(name.to_owned()));
        }
        let _ = self.labels.insert(name.to_owned(), address);
        Ok(())
    }

    /// Looks up the address declared for `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }
}
