//! Well-known packages and symbols.
//!
//! [`Registry::new`](crate::Registry::new) creates these first, in exactly
//! the order listed here, so their handles are the same constants in every
//! registry. Pass them around by value; there is nothing to look up.

/// Package handles.
pub mod pkg {
    use crate::symbol::PackageId;

    /// Default package for unqualified symbols when `*PACKAGE*` is unset.
    pub const SL: PackageId = PackageId(0);
    /// Self-evaluating keywords (`:FOO`).
    pub const KEYWORD: PackageId = PackageId(1);
    /// Control package holding `*PACKAGE*`.
    pub const CONTROL: PackageId = PackageId(2);

    pub(crate) const NAMES: [&str; 3] = ["SL", "KEYWORD", "%"];
}

/// Symbol handles.
pub mod sym {
    use crate::symbol::SymbolId;

    pub const NIL: SymbolId = SymbolId(0);
    pub const T: SymbolId = SymbolId(1);
    pub const QUOTE: SymbolId = SymbolId(2);
    pub const QUASIQUOTE: SymbolId = SymbolId(3);
    pub const QQ_UNQUOTE: SymbolId = SymbolId(4);
    pub const QQ_SPLICE: SymbolId = SymbolId(5);
    pub const VECTOR: SymbolId = SymbolId(6);
    pub const LAMBDA: SymbolId = SymbolId(7);
    pub const IF: SymbolId = SymbolId(8);
    pub const PROGN: SymbolId = SymbolId(9);
    pub const SET: SymbolId = SymbolId(10);
    pub const CC: SymbolId = SymbolId(11);
    pub const DEFMACRO: SymbolId = SymbolId(12);
    /// `%:*PACKAGE*`, the current-package variable.
    pub const PACKAGE: SymbolId = SymbolId(13);

    /// Names interned into `SL`, in handle order.
    pub(crate) const SL_NAMES: [&str; 13] = [
        "NIL",
        "T",
        "QUOTE",
        "QUASIQUOTE",
        "QQ-UNQUOTE",
        "QQ-SPLICE",
        "VECTOR",
        "LAMBDA",
        "IF",
        "PROGN",
        "SET!",
        "C/C",
        "DEFMACRO",
    ];
}
