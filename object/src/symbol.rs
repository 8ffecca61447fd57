use std::collections::HashMap;

use crate::value::Datum;

/// Interned symbol handle. Two handles are equal exactly when they name the
/// same (package, name) pair in the same [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub u32);

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    /// Owning package. A back reference; the registry owns both.
    pub package: PackageId,
    /// Resolve through the global/dynamic slot regardless of lexical nesting.
    pub special: bool,
    /// Implemented directly by the engine, invoked with `PRIM`.
    pub primitive: bool,
    /// Transformer installed by `DEFMACRO`.
    pub macro_fn: Option<Datum>,
    /// Global value slot.
    pub value: Option<Datum>,
}

impl Symbol {
    pub(crate) fn new(name: &str, package: PackageId) -> Self {
        Self {
            name: name.to_owned(),
            package,
            special: false,
            primitive: false,
            macro_fn: None,
            value: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub(crate) table: HashMap<String, SymbolId>,
}

impl Package {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            table: HashMap::new(),
        }
    }

    /// Look up a symbol by name without interning.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.table.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
