use bytecode::Code;
use log::debug;
use object::{Datum, Registry};
use parser::{Cursor, Pos, Reader};

use crate::compiler::Compiler;
use crate::error::Error;
use crate::evaluator::Evaluator;

/// A top-level form together with its compiled code.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub form: Datum,
    pub code: Code,
    /// Where reading stopped after this form.
    pub end: Pos,
}

/// Reads and compiles a source one top-level form at a time.
///
/// Forms are compiled as soon as they are read, so a `DEFMACRO` affects the
/// forms after it. An error only costs the form it occurred in; the next
/// call to `next` carries on after it.
pub struct Driver<'src, 'a, E: Evaluator> {
    cursor: Option<Cursor<'src>>,
    registry: &'a mut Registry,
    evaluator: &'a mut E,
}

impl<'src, 'a, E: Evaluator> Driver<'src, 'a, E> {
    pub fn new(source: &'src str, registry: &'a mut Registry, evaluator: &'a mut E) -> Self {
        Self {
            cursor: Some(Cursor::new(source)),
            registry,
            evaluator,
        }
    }

    pub fn registry(&self) -> &Registry {
        &*self.registry
    }

    fn read(&mut self) -> Option<Result<Datum, Error>> {
        let cursor = self.cursor.take()?;
        let mut reader = Reader::with_cursor(cursor, &mut *self.registry);
        let result = reader.read_datum();
        self.cursor = Some(reader.into_cursor());
        match result {
            Ok(Some(datum)) => Some(Ok(datum)),
            Ok(None) => {
                self.cursor = None;
                None
            }
            Err(err) => Some(Err(err.into())),
        }
    }
}

impl<E: Evaluator> Iterator for Driver<'_, '_, E> {
    type Item = Result<Compiled, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let form = match self.read()? {
            Ok(form) => form,
            Err(err) => {
                debug!("skipping unreadable form: {err}");
                return Some(Err(err));
            }
        };
        let end = self.cursor.as_ref().map_or(Pos::origin(), Cursor::pos);
        let result = Compiler::new(&mut *self.registry, &mut *self.evaluator).compile_form(&form);
        match result {
            Ok(code) => {
                debug!("compiled form ending at {end} into {} entries", code.len());
                Some(Ok(Compiled { form, code, end }))
            }
            Err(err) => {
                debug!("form ending at {end} failed: {err}");
                Some(Err(err.into()))
            }
        }
    }
}

/// Compile every top-level form of `source`, stopping at the first error.
pub fn compile_source<E: Evaluator>(
    source: &str,
    registry: &mut Registry,
    evaluator: &mut E,
) -> Result<Vec<Code>, Error> {
    Driver::new(source, registry, evaluator)
        .map(|compiled| compiled.map(|c| c.code))
        .collect()
}
