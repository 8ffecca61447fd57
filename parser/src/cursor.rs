//! Character stream with position tracking.

use std::str::Chars;

/// A single position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    /// Byte offset from the start of the input (0-based).
    pub offset: usize,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, in characters).
    pub column: usize,
}

impl Pos {
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The very beginning of a source text.
    pub const fn origin() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One-character lookahead over a source string. No backtracking.
pub struct Cursor<'a> {
    chars: Chars<'a>,
    pos: Pos,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars(),
            pos: Pos::origin(),
        }
    }

    /// Current source position.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// The current character, `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Consume one character and return it, updating position tracking.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Consume characters while `pred` holds and return them.
    pub fn read_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut buf = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            buf.push(c);
            self.advance();
        }
        buf
    }
}
