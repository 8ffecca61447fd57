//! # Slip
//!
//! Compiles symbolic expressions into stack-machine [`Code`].
//!
//! ```text
//!  source ──▶ Reader ──▶ Datum ──▶ Compiler ──▶ Code ──▶ (engine)
//!                                     │  ▲
//!                       DEFMACRO/expand  │ transformer values
//!                                     ▼  │
//!                                   Evaluator
//! ```
//!
//! The compiler never executes code itself. Macros are the one place where
//! compile time needs run time; that goes through the [`Evaluator`] the
//! caller provides.

pub mod compiler;
pub mod driver;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod forms;

pub use bytecode::Code;
pub use compiler::Compiler;
pub use driver::{compile_source, Compiled, Driver};
pub use env::Environment;
pub use error::{CompileError, Error};
pub use evaluator::{EngineError, Evaluator, NoEngine};
pub use forms::SpecialForm;
