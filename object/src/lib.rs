mod chars;
mod printer;
mod registry;
mod special;
mod symbol;
mod value;

pub use chars::{char_name, named_char};
pub use printer::DisplayDatum;
pub use registry::Registry;
pub use special::{pkg, sym};
pub use symbol::{Package, PackageId, Symbol, SymbolId};
pub use value::{Cons, Datum, ListIter, ObjectRef};
