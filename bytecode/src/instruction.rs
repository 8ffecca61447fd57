use object::{Datum, SymbolId};

use crate::builder::Label;
use crate::code::Code;
use crate::op::Op;

/// One instruction with its operands.
///
/// Lexical addresses are `(frame, slot)` pairs: `frame` counts enclosing
/// frames outward from the innermost (0), `slot` is the parameter position
/// within that frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Const {
        value: Datum,
    },
    LVar {
        frame: usize,
        slot: usize,
    },
    GVar {
        name: SymbolId,
    },
    LSet {
        frame: usize,
        slot: usize,
    },
    GSet {
        name: SymbolId,
    },
    Prim {
        name: SymbolId,
        argc: usize,
    },
    Call {
        argc: usize,
    },
    Save {
        label: Label,
    },
    Jump {
        label: Label,
    },
    FJump {
        label: Label,
    },
    Ret,
    Pop,
    Fn {
        body: Code,
    },
    Args {
        count: usize,
    },
    ArgRest {
        fixed: usize,
    },
    Bind {
        name: SymbolId,
        index: usize,
    },
    Cc,
}

impl Instruction {
    pub fn op(&self) -> Op {
        match self {
            Self::Const { .. } => Op::Const,
            Self::LVar { .. } => Op::LVar,
            Self::GVar { .. } => Op::GVar,
            Self::LSet { .. } => Op::LSet,
            Self::GSet { .. } => Op::GSet,
            Self::Prim { .. } => Op::Prim,
            Self::Call { .. } => Op::Call,
            Self::Save { .. } => Op::Save,
            Self::Jump { .. } => Op::Jump,
            Self::FJump { .. } => Op::FJump,
            Self::Ret => Op::Ret,
            Self::Pop => Op::Pop,
            Self::Fn { .. } => Op::Fn,
            Self::Args { .. } => Op::Args,
            Self::ArgRest { .. } => Op::ArgRest,
            Self::Bind { .. } => Op::Bind,
            Self::Cc => Op::Cc,
        }
    }

    /// The jump target this instruction refers to, if any.
    pub fn label(&self) -> Option<Label> {
        match self {
            Self::Save { label } | Self::Jump { label } | Self::FJump { label } => Some(*label),
            _ => None,
        }
    }
}
