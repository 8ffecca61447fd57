use core::fmt;

use object::{Datum, SymbolId};

use crate::code::{Code, Entry};
use crate::instruction::Instruction;

/// A jump target.
///
/// Opaque and only ever compared for identity. Created by
/// [`LabelGenerator::fresh`], placed once with [`CodeBuilder::place`] and
/// referenced by any number of `SAVE`/`JUMP`/`FJUMP` instructions. The
/// assembler resolves placements to addresses; nothing here knows offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(u32);

impl Label {
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Hands out labels in increasing order, never the same one twice.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    last: u32,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    pub fn fresh(&mut self) -> Label {
        self.last += 1;
        Label(self.last)
    }
}

/// Builds one code body.
///
/// Nested closure bodies get their own builder; the finished [`Code`] goes
/// into the enclosing body with [`CodeBuilder::closure`].
#[derive(Debug, Default)]
pub struct CodeBuilder {
    entries: Vec<Entry>,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn finish(self) -> Code {
        Code::new(self.entries)
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.entries.push(Entry::Op(instruction));
    }

    /// Mark the current position as the target of `label`.
    pub fn place(&mut self, label: Label) {
        self.entries.push(Entry::Label(label));
    }

    /// `CONST value`
    pub fn constant(&mut self, value: Datum) {
        self.emit(Instruction::Const { value });
    }

    /// `LVAR frame slot`
    pub fn local_var(&mut self, frame: usize, slot: usize) {
        self.emit(Instruction::LVar { frame, slot });
    }

    /// `GVAR name`
    pub fn global_var(&mut self, name: SymbolId) {
        self.emit(Instruction::GVar { name });
    }

    /// `LSET frame slot`
    pub fn local_set(&mut self, frame: usize, slot: usize) {
        self.emit(Instruction::LSet { frame, slot });
    }

    /// `GSET name`
    pub fn global_set(&mut self, name: SymbolId) {
        self.emit(Instruction::GSet { name });
    }

    /// `PRIM name argc`
    pub fn prim(&mut self, name: SymbolId, argc: usize) {
        self.emit(Instruction::Prim { name, argc });
    }

    /// `CALL argc`
    pub fn call(&mut self, argc: usize) {
        self.emit(Instruction::Call { argc });
    }

    /// `SAVE label`
    pub fn save(&mut self, label: Label) {
        self.emit(Instruction::Save { label });
    }

    /// `JUMP label`
    pub fn jump(&mut self, label: Label) {
        self.emit(Instruction::Jump { label });
    }

    /// `FJUMP label`
    pub fn jump_if_false(&mut self, label: Label) {
        self.emit(Instruction::FJump { label });
    }

    /// `RET`
    pub fn ret(&mut self) {
        self.emit(Instruction::Ret);
    }

    /// `POP`
    pub fn pop(&mut self) {
        self.emit(Instruction::Pop);
    }

    /// `FN body`
    pub fn closure(&mut self, body: Code) {
        self.emit(Instruction::Fn { body });
    }

    /// `ARGS count`
    pub fn args(&mut self, count: usize) {
        self.emit(Instruction::Args { count });
    }

    /// `ARG_ fixed`
    pub fn arg_rest(&mut self, fixed: usize) {
        self.emit(Instruction::ArgRest { fixed });
    }

    /// `BIND name index`
    pub fn bind_dynamic(&mut self, name: SymbolId, index: usize) {
        self.emit(Instruction::Bind { name, index });
    }

    /// `CC`
    pub fn capture_continuation(&mut self) {
        self.emit(Instruction::Cc);
    }
}
