use std::rc::Rc;

use crate::symbol::{PackageId, SymbolId};

/// Opaque handle to a value owned by the execution engine (closures,
/// primitive functions, anything the engine hands back from `run`).
///
/// The front end never looks inside; it only stores these as macro
/// transformers and embeds them as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub u64);

/// One parsed symbolic-expression value.
///
/// Lists are chains of [`Cons`] cells terminated by [`Datum::Nil`]. A cell
/// whose tail is neither a cell nor `Nil` makes the list improper (dotted).
/// Vectors have no variant of their own: the reader produces a list headed
/// by the `VECTOR` marker symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// The empty list.
    Nil,
    Bool(bool),
    Number(f64),
    Text(Rc<str>),
    Char(char),
    /// Regular expression literal; holds the pattern source.
    Regexp(Rc<str>),
    Symbol(SymbolId),
    Cons(Rc<Cons>),
    Package(PackageId),
    Object(ObjectRef),
}

/// A list cell.
#[derive(Debug, Clone)]
pub struct Cons {
    pub car: Datum,
    pub cdr: Datum,
}

// Walks the tail in a loop; derived equality would recurse once per cell.
impl PartialEq for Cons {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            if a.car != b.car {
                return false;
            }
            match (&a.cdr, &b.cdr) {
                (Datum::Cons(x), Datum::Cons(y)) => {
                    a = &**x;
                    b = &**y;
                }
                (x, y) => return x == y,
            }
        }
    }
}

// Unlinks uniquely owned tail cells one at a time so dropping a long list
// does not recurse once per cell.
impl Drop for Cons {
    fn drop(&mut self) {
        let mut rest = std::mem::replace(&mut self.cdr, Datum::Nil);
        while let Datum::Cons(cell) = rest {
            match Rc::try_unwrap(cell) {
                Ok(mut cell) => rest = std::mem::replace(&mut cell.cdr, Datum::Nil),
                Err(_) => break,
            }
        }
    }
}

impl Datum {
    pub fn cons(car: Datum, cdr: Datum) -> Self {
        Datum::Cons(Rc::new(Cons { car, cdr }))
    }

    pub fn text(s: &str) -> Self {
        Datum::Text(Rc::from(s))
    }

    pub fn regexp(s: &str) -> Self {
        Datum::Regexp(Rc::from(s))
    }

    /// Build a proper list from the items, in order.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Datum>,
        I::IntoIter: DoubleEndedIterator,
    {
        Self::list_with_tail(items, Datum::Nil)
    }

    /// Build a list from the items whose final cell's tail is `tail`.
    pub fn list_with_tail<I>(items: I, tail: Datum) -> Self
    where
        I: IntoIterator<Item = Datum>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(tail, |acc, item| Datum::cons(item, acc))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Datum::Nil)
    }

    pub fn is_cons(&self) -> bool {
        matches!(self, Datum::Cons(_))
    }

    pub fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            Datum::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_cons(&self) -> Option<&Cons> {
        match self {
            Datum::Cons(cell) => Some(cell),
            _ => None,
        }
    }

    /// Head of a cell; `Nil` for anything else.
    pub fn car(&self) -> Datum {
        match self {
            Datum::Cons(cell) => cell.car.clone(),
            _ => Datum::Nil,
        }
    }

    /// Tail of a cell; `Nil` for anything else.
    pub fn cdr(&self) -> Datum {
        match self {
            Datum::Cons(cell) => cell.cdr.clone(),
            _ => Datum::Nil,
        }
    }

    /// Iterate over the heads of a list. Stops at the first non-cell tail;
    /// use [`ListIter::tail`] afterwards to see what terminated the walk.
    pub fn iter(&self) -> ListIter {
        ListIter { rest: self.clone() }
    }

    /// Element count of a proper list, `None` if the list is dotted.
    pub fn proper_len(&self) -> Option<usize> {
        let mut iter = self.iter();
        let count = iter.by_ref().count();
        iter.tail().is_nil().then_some(count)
    }

    /// Collect a proper list into a vector, `None` if the list is dotted.
    pub fn to_vec(&self) -> Option<Vec<Datum>> {
        let mut iter = self.iter();
        let items: Vec<Datum> = iter.by_ref().collect();
        iter.tail().is_nil().then_some(items)
    }

    /// Split a possibly dotted list into its heads and its final tail.
    pub fn split_tail(&self) -> (Vec<Datum>, Datum) {
        let mut iter = self.iter();
        let items: Vec<Datum> = iter.by_ref().collect();
        (items, iter.rest)
    }
}

impl From<f64> for Datum {
    fn from(n: f64) -> Self {
        Datum::Number(n)
    }
}

impl From<SymbolId> for Datum {
    fn from(id: SymbolId) -> Self {
        Datum::Symbol(id)
    }
}

pub struct ListIter {
    rest: Datum,
}

impl ListIter {
    /// What is left after the walk: `Nil` for a proper list, the dotted
    /// tail otherwise.
    pub fn tail(&self) -> &Datum {
        &self.rest
    }
}

impl Iterator for ListIter {
    type Item = Datum;

    fn next(&mut self) -> Option<Datum> {
        let (car, cdr) = match &self.rest {
            Datum::Cons(cell) => (cell.car.clone(), cell.cdr.clone()),
            _ => return None,
        };
        self.rest = cdr;
        Some(car)
    }
}
