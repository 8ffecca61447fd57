use core::fmt;

use object::Registry;

use crate::builder::Label;
use crate::instruction::Instruction;

/// One element of a code body: a label placement or an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Label(Label),
    Op(Instruction),
}

/// A flat instruction sequence with embedded label placements, ready to be
/// handed to an assembler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Code {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelError {
    /// Placed more than once in the same body.
    Duplicate(Label),
    /// Referenced but never placed.
    Unplaced(Label),
    /// Placed but never referenced.
    Unreferenced(Label),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(l) => write!(f, "label {l} placed more than once"),
            Self::Unplaced(l) => write!(f, "label {l} referenced but never placed"),
            Self::Unreferenced(l) => write!(f, "label {l} placed but never referenced"),
        }
    }
}

impl std::error::Error for LabelError {}

impl Code {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The instructions of this body in order, skipping label placements.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Op(instruction) => Some(instruction),
            Entry::Label(_) => None,
        })
    }

    pub fn last_instruction(&self) -> Option<&Instruction> {
        self.instructions().last()
    }

    /// Check what an assembler would reject: every referenced label placed
    /// exactly once and every placed label referenced. Each closure body is
    /// checked on its own.
    pub fn verify_labels(&self) -> Result<(), LabelError> {
        let mut placed: Vec<Label> = Vec::new();
        let mut referenced: Vec<Label> = Vec::new();
        for entry in &self.entries {
            match entry {
                Entry::Label(label) => {
                    if placed.contains(label) {
                        return Err(LabelError::Duplicate(*label));
                    }
                    placed.push(*label);
                }
                Entry::Op(Instruction::Fn { body }) => body.verify_labels()?,
                Entry::Op(instruction) => {
                    if let Some(label) = instruction.label() {
                        if !referenced.contains(&label) {
                            referenced.push(label);
                        }
                    }
                }
            }
        }
        if let Some(label) = referenced.iter().find(|l| !placed.contains(l)) {
            return Err(LabelError::Unplaced(*label));
        }
        if let Some(label) = placed.iter().find(|l| !referenced.contains(l)) {
            return Err(LabelError::Unreferenced(*label));
        }
        Ok(())
    }

    /// Human-readable listing; symbol operands are named through `registry`.
    pub fn listing<'a>(&'a self, registry: &'a Registry) -> Listing<'a> {
        Listing {
            code: self,
            registry,
        }
    }
}

impl<'a> IntoIterator for &'a Code {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One line per entry, labels flush left, closure bodies indented.
pub struct Listing<'a> {
    code: &'a Code,
    registry: &'a Registry,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_body(f, self.code, self.registry, 1)
    }
}

fn write_body(f: &mut fmt::Formatter<'_>, code: &Code, registry: &Registry, depth: usize) -> fmt::Result {
    let indent = "    ".repeat(depth);
    for entry in code {
        let instruction = match entry {
            Entry::Label(label) => {
                writeln!(f, "{label}:")?;
                continue;
            }
            Entry::Op(instruction) => instruction,
        };
        write!(f, "{indent}{}", instruction.op())?;
        match instruction {
            Instruction::Const { value } => writeln!(f, " {}", registry.display(value))?,
            Instruction::LVar { frame, slot } | Instruction::LSet { frame, slot } => {
                writeln!(f, " {frame} {slot}")?
            }
            Instruction::GVar { name } | Instruction::GSet { name } => {
                writeln!(f, " {}", registry.qualified_name(*name))?
            }
            Instruction::Prim { name, argc } => {
                writeln!(f, " {} {argc}", registry.qualified_name(*name))?
            }
            Instruction::Call { argc } => writeln!(f, " {argc}")?,
            Instruction::Save { label } | Instruction::Jump { label } | Instruction::FJump { label } => {
                writeln!(f, " {label}")?
            }
            Instruction::Fn { body } => {
                writeln!(f)?;
                write_body(f, body, registry, depth + 1)?;
            }
            Instruction::Args { count } => writeln!(f, " {count}")?,
            Instruction::ArgRest { fixed } => writeln!(f, " {fixed}")?,
            Instruction::Bind { name, index } => {
                writeln!(f, " {} {index}", registry.qualified_name(*name))?
            }
            Instruction::Ret | Instruction::Pop | Instruction::Cc => writeln!(f)?,
        }
    }
    Ok(())
}
