mod builder;
mod code;
mod instruction;
mod op;

pub use builder::{CodeBuilder, Label, LabelGenerator};
pub use code::{Code, Entry, LabelError, Listing};
pub use instruction::Instruction;
pub use op::Op;
