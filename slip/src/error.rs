use std::fmt;

use parser::ReadError;

use crate::evaluator::EngineError;

/// Why a form could not be compiled. Aborts the current top-level form.
#[derive(Debug)]
pub enum CompileError {
    /// A special form got the wrong number of sub-forms.
    Arity {
        form: &'static str,
        min: usize,
        max: Option<usize>,
        found: usize,
    },
    /// `SET!` of something other than a plain symbol.
    SetNonSymbol { target: String },
    /// Arguments passed to an inlined parameterless lambda.
    TooManyArguments { found: usize },
    /// `DEFMACRO` whose name is not a symbol.
    MacroName { name: String },
    /// A lambda parameter that is not a symbol.
    BadParameter { parameter: String },
    /// A dotted list where a proper one is required.
    ImproperList { context: &'static str },
    /// Raised by the execution engine while running a macro. Passed through
    /// as is.
    Engine(EngineError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity {
                form,
                min,
                max,
                found,
            } => match max {
                Some(max) if max == min => {
                    write!(f, "{form} expects exactly {min} arguments, got {found}")
                }
                Some(max) => write!(f, "{form} expects {min} to {max} arguments, got {found}"),
                None => write!(f, "{form} expects at least {min} arguments, got {found}"),
            },
            Self::SetNonSymbol { target } => write!(f, "only symbols can be set, not {target}"),
            Self::TooManyArguments { found } => {
                write!(f, "too many arguments: lambda takes none, got {found}")
            }
            Self::MacroName { name } => {
                write!(f, "DEFMACRO requires a symbol name for the macro, not {name}")
            }
            Self::BadParameter { parameter } => {
                write!(f, "lambda parameter must be a symbol, not {parameter}")
            }
            Self::ImproperList { context } => write!(f, "improper list in {context}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Either half of turning source text into code failed.
#[derive(Debug)]
pub enum Error {
    Read(ReadError),
    Compile(CompileError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "read error: {err}"),
            Self::Compile(err) => write!(f, "compile error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Compile(err) => Some(err),
        }
    }
}

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        Self::Read(err)
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Self::Compile(err)
    }
}
