use core::fmt;

/// Instruction mnemonics understood by the execution engine.
///
/// Operands are listed per variant; `L` is a [`Label`](crate::Label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Push a constant. Operands: `value`
    Const,

    /// Push a lexical variable. Operands: `frame`, `slot`
    LVar,

    /// Push a global (or dynamically bound) variable. Operands: `symbol`
    GVar,

    /// Store the top of stack into a lexical variable, leaving it pushed.
    /// Operands: `frame`, `slot`
    LSet,

    /// Store the top of stack into a global variable, leaving it pushed.
    /// Operands: `symbol`
    GSet,

    /// Invoke a primitive on the top `argc` stack entries.
    /// Operands: `symbol`, `argc`
    Prim,

    /// Call the function on top of stack with `argc` arguments below it.
    /// Operands: `argc`
    Call,

    /// Push a resume point; the callee's `RET` continues at `L`.
    /// Operands: `L`
    Save,

    /// Operands: `L`
    Jump,

    /// Pop the top of stack and jump if it is false. Operands: `L`
    FJump,

    /// Return the top of stack to the most recent resume point.
    Ret,

    Pop,

    /// Push a closure over the current environment. Operands: `body`
    Fn,

    /// Check for exactly `n` arguments and bind them as a new frame.
    /// Operands: `n`
    Args,

    /// Bind the first `n` arguments positionally and the rest as a list in
    /// slot `n`. Operands: `n`
    ArgRest,

    /// Dynamically bind a special parameter for the extent of the call.
    /// Operands: `symbol`, `index`
    Bind,

    /// Push the current continuation.
    Cc,
}

impl Op {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Const => "CONST",
            Self::LVar => "LVAR",
            Self::GVar => "GVAR",
            Self::LSet => "LSET",
            Self::GSet => "GSET",
            Self::Prim => "PRIM",
            Self::Call => "CALL",
            Self::Save => "SAVE",
            Self::Jump => "JUMP",
            Self::FJump => "FJUMP",
            Self::Ret => "RET",
            Self::Pop => "POP",
            Self::Fn => "FN",
            Self::Args => "ARGS",
            Self::ArgRest => "ARG_",
            Self::Bind => "BIND",
            Self::Cc => "CC",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
