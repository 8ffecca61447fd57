use bytecode::Code;
use object::{Datum, Registry};

/// Error raised by the execution engine. The compiler never inspects it.
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// The execution engine, as far as the compiler needs it.
///
/// Used synchronously in two places: `DEFMACRO` assembles and runs a
/// freshly compiled closure once to obtain the transformer, and every macro
/// call applies that transformer to its unevaluated arguments. A call that
/// never returns hangs the compile.
pub trait Evaluator {
    /// Resolved, runnable form of a code body.
    type Program;

    /// Resolve labels and produce runnable code. Rejects bodies with
    /// duplicated or dangling label placements.
    fn assemble(&mut self, code: &Code) -> Result<Self::Program, EngineError>;

    /// Run top-level code to completion and return its value.
    fn run(&mut self, program: &Self::Program, registry: &mut Registry) -> Result<Datum, EngineError>;

    /// Call a function value (as returned by `run`) with arguments.
    fn apply(
        &mut self,
        function: &Datum,
        args: &[Datum],
        registry: &mut Registry,
    ) -> Result<Datum, EngineError>;
}

/// Stand-in for drivers without an engine; refuses to run anything.
#[derive(Debug, Default)]
pub struct NoEngine;

#[derive(Debug)]
pub struct NoEngineError;

impl std::fmt::Display for NoEngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("no execution engine attached; cannot run macros")
    }
}

impl std::error::Error for NoEngineError {}

impl Evaluator for NoEngine {
    type Program = ();

    fn assemble(&mut self, code: &Code) -> Result<(), EngineError> {
        code.verify_labels()?;
        Ok(())
    }

    fn run(&mut self, _program: &(), _registry: &mut Registry) -> Result<Datum, EngineError> {
        Err(Box::new(NoEngineError))
    }

    fn apply(
        &mut self,
        _function: &Datum,
        _args: &[Datum],
        _registry: &mut Registry,
    ) -> Result<Datum, EngineError> {
        Err(Box::new(NoEngineError))
    }
}
