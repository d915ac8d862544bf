//! Flat identifier → value table built from a file's symbol scope.
//!
//! Only constants are kept. When the scope holds the same constant name
//! twice the first declaration wins, matching the binding a Go compiler
//! reports before rejecting the redeclaration.

use std::collections::HashMap;

use crate::source::ast::{GoFile, ObjectKind, Scope};
use crate::value::ConstValue;

/// Per-file map of constant identifiers to their resolved values.
#[derive(Debug, Clone, Default)]
pub struct SymbolValueTable {
    values: HashMap<String, ConstValue>,
}

impl SymbolValueTable {
    /// Build the table from a scope, ignoring non-constant objects.
    pub fn from_scope(scope: &Scope) -> Self {
        let mut values = HashMap::with_capacity(scope.len());
        for object in scope.iter().filter(|o| o.kind == ObjectKind::Const) {
            values
                .entry(object.name.clone())
                .or_insert_with(|| object.value.clone());
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ConstValue> {
        self.values.get(name)
    }

    /// The value for `name`, or `Unresolved` when absent.
    pub fn resolve(&self, name: &str) -> ConstValue {
        self.values.get(name).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Table for a loaded file.
pub fn build_symbol_table(file: &GoFile) -> SymbolValueTable {
    SymbolValueTable::from_scope(&file.scope)
}
