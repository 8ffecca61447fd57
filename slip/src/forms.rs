use object::{sym, SymbolId};

/// The forms the compiler handles itself instead of compiling as calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Quote,
    Progn,
    Set,
    If,
    Cc,
    Defmacro,
    Lambda,
}

impl SpecialForm {
    pub fn from_symbol(head: SymbolId) -> Option<Self> {
        Some(match head {
            sym::QUOTE => Self::Quote,
            sym::PROGN => Self::Progn,
            sym::SET => Self::Set,
            sym::IF => Self::If,
            sym::CC => Self::Cc,
            sym::DEFMACRO => Self::Defmacro,
            sym::LAMBDA => Self::Lambda,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Quote => "QUOTE",
            Self::Progn => "PROGN",
            Self::Set => "SET!",
            Self::If => "IF",
            Self::Cc => "C/C",
            Self::Defmacro => "DEFMACRO",
            Self::Lambda => "LAMBDA",
        }
    }

    /// Accepted sub-form count, `(min, max)`; `None` is unbounded.
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Quote => (1, Some(1)),
            Self::Progn => (0, None),
            Self::Set => (2, Some(2)),
            Self::If => (2, Some(3)),
            Self::Cc => (0, Some(0)),
            Self::Defmacro => (2, None),
            Self::Lambda => (1, None),
        }
    }

    pub fn accepts(self, count: usize) -> bool {
        let (min, max) = self.arity();
        count >= min && max.is_none_or(|max| count <= max)
    }
}
