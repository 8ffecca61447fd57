use std::fmt;

use crate::chars::char_name;
use crate::registry::Registry;
use crate::special::{pkg, sym};
use crate::symbol::SymbolId;
use crate::value::Datum;

/// Readable rendering of a [`Datum`]; symbol names need the registry.
///
/// Created by [`Registry::display`].
pub struct DisplayDatum<'a> {
    datum: &'a Datum,
    registry: &'a Registry,
}

impl Registry {
    pub fn display<'a>(&'a self, datum: &'a Datum) -> DisplayDatum<'a> {
        DisplayDatum {
            datum,
            registry: self,
        }
    }

    /// Symbol name with as much package prefix as needed to read it back.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let symbol = self.symbol(id);
        if symbol.package == pkg::KEYWORD {
            format!(":{}", symbol.name)
        } else if symbol.package == pkg::SL
            || symbol.package == self.current_package()
        {
            symbol.name.clone()
        } else {
            format!("{}:{}", self.package(symbol.package).name, symbol.name)
        }
    }
}

impl fmt::Display for DisplayDatum<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_datum(f, self.datum, self.registry)
    }
}

fn write_datum(f: &mut fmt::Formatter<'_>, datum: &Datum, registry: &Registry) -> fmt::Result {
    match datum {
        Datum::Nil => f.write_str("NIL"),
        Datum::Bool(true) => f.write_str("T"),
        Datum::Bool(false) => f.write_str("NIL"),
        Datum::Number(n) => write!(f, "{n}"),
        Datum::Text(s) => write_escaped(f, s, '"', '"'),
        Datum::Regexp(s) => {
            f.write_str("#")?;
            write_escaped(f, s, '/', '/')
        }
        Datum::Char(c) => match char_name(*c) {
            Some(name) => write!(f, "#\\{name}"),
            None => write!(f, "#\\{c}"),
        },
        Datum::Symbol(id) => f.write_str(&registry.qualified_name(*id)),
        Datum::Package(id) => write!(f, "#<PACKAGE {}>", registry.package(*id).name),
        Datum::Object(obj) => write!(f, "#<OBJECT {}>", obj.0),
        Datum::Cons(cell) => {
            if cell.car == Datum::Symbol(sym::VECTOR) {
                if let Some(items) = cell.cdr.to_vec() {
                    f.write_str("#(")?;
                    write_items(f, &items, registry)?;
                    return f.write_str(")");
                }
            }
            let (items, tail) = datum.split_tail();
            f.write_str("(")?;
            write_items(f, &items, registry)?;
            if !tail.is_nil() {
                f.write_str(" . ")?;
                write_datum(f, &tail, registry)?;
            }
            f.write_str(")")
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Datum], registry: &Registry) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write_datum(f, item, registry)?;
    }
    Ok(())
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str, open: char, close: char) -> fmt::Result {
    write!(f, "{open}")?;
    for c in s.chars() {
        if c == close || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, "{close}")
}
