use std::collections::HashMap;

use crate::special::{pkg, sym};
use crate::symbol::{Package, PackageId, Symbol, SymbolId};
use crate::value::Datum;

/// Interning tables for packages and symbols.
///
/// Owns every [`Symbol`] and [`Package`] for its whole lifetime; nothing is
/// ever removed. Handles stay valid and stable as long as the registry
/// lives. There is no internal locking: one registry serves one compilation
/// at a time, and callers sharing it across threads must serialize access
/// themselves.
#[derive(Debug, Clone)]
pub struct Registry {
    packages: Vec<Package>,
    package_names: HashMap<String, PackageId>,
    symbols: Vec<Symbol>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self {
            packages: Vec::new(),
            package_names: HashMap::new(),
            symbols: Vec::new(),
        };
        for name in pkg::NAMES {
            registry.get_or_create_package(name);
        }
        for name in sym::SL_NAMES {
            registry.intern(pkg::SL, name);
        }
        registry.intern(pkg::CONTROL, "*PACKAGE*");
        debug_assert_eq!(registry.find_symbol(pkg::SL, "DEFMACRO"), Some(sym::DEFMACRO));
        debug_assert_eq!(registry.find_symbol(pkg::CONTROL, "*PACKAGE*"), Some(sym::PACKAGE));
        registry
    }

    // ── packages ───────────────────────────────────────────────────

    /// Exact-name lookup, creating the package on a miss.
    pub fn get_or_create_package(&mut self, name: &str) -> PackageId {
        if let Some(&id) = self.package_names.get(name) {
            return id;
        }
        let id = PackageId(self.packages.len() as u32);
        self.packages.push(Package::new(name));
        self.package_names.insert(name.to_owned(), id);
        id
    }

    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.package_names.get(name).copied()
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0 as usize]
    }

    /// Package unqualified symbols are interned into: the value of
    /// `*PACKAGE*` when it holds a package, `SL` otherwise.
    pub fn current_package(&self) -> PackageId {
        match self.symbol(sym::PACKAGE).value {
            Some(Datum::Package(id)) => id,
            _ => pkg::SL,
        }
    }

    pub fn set_current_package(&mut self, package: Option<PackageId>) {
        self.symbol_mut(sym::PACKAGE).value = package.map(Datum::Package);
    }

    // ── symbols ────────────────────────────────────────────────────

    /// Look up or create `name` in `package`.
    pub fn intern(&mut self, package: PackageId, name: &str) -> SymbolId {
        if let Some(id) = self.find_symbol(package, name) {
            return id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(name, package));
        self.packages[package.0 as usize]
            .table
            .insert(name.to_owned(), id);
        id
    }

    /// Intern into the current package.
    pub fn intern_current(&mut self, name: &str) -> SymbolId {
        let package = self.current_package();
        self.intern(package, name)
    }

    pub fn find_symbol(&self, package: PackageId, name: &str) -> Option<SymbolId> {
        self.package(package).find(name)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.symbol(id).name
    }

    pub fn is_keyword(&self, id: SymbolId) -> bool {
        self.symbol(id).package == pkg::KEYWORD
    }

    pub fn is_special(&self, id: SymbolId) -> bool {
        self.symbol(id).special
    }

    pub fn is_primitive(&self, id: SymbolId) -> bool {
        self.symbol(id).primitive
    }

    pub fn macro_fn(&self, id: SymbolId) -> Option<&Datum> {
        self.symbol(id).macro_fn.as_ref()
    }

    pub fn set_special(&mut self, id: SymbolId, special: bool) {
        self.symbol_mut(id).special = special;
    }

    pub fn set_primitive(&mut self, id: SymbolId, primitive: bool) {
        self.symbol_mut(id).primitive = primitive;
    }

    pub fn set_macro(&mut self, id: SymbolId, transformer: Datum) {
        self.symbol_mut(id).macro_fn = Some(transformer);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
