//! Recursive-descent reader turning source text into [`Datum`]s.
//!
//! # Syntax
//!
//! | Syntax          | Reads as                                  |
//! |-----------------|-------------------------------------------|
//! | `; …`           | Line comment, skipped                      |
//! | `"…"`           | Text; `\x` stands for `x` verbatim          |
//! | `( … )`         | List; `(a . b)` is a dotted pair           |
//! | `#\x`, `#\Name` | Character literal                           |
//! | `#/…/`          | Regexp literal, escaped like strings        |
//! | `#( … )`        | `(VECTOR …)`                               |
//! | `'x`            | `(QUOTE x)`                                |
//! | `` `(…) ``      | `(QUASIQUOTE (…))`                         |
//! | `` `x ``        | `(QUOTE x)` when `x` is not a list         |
//! | `,x` / `,@x`    | `(QQ-UNQUOTE x)` / `(QQ-SPLICE x)`         |
//!
//! Anything else is a symbol or an unsigned decimal number. Symbol names are
//! upper-cased; `PKG:NAME` (or `PKG::NAME`) interns into `PKG`, `:NAME` into
//! `KEYWORD`, and a bare name into the current package.
use log::trace;
use object::{named_char, pkg, sym, Datum, Registry, SymbolId};

use crate::cursor::{Cursor, Pos};

#[derive(Debug, Clone, PartialEq)]
pub struct ReadError {
    pub message: String,
    pub pos: Pos,
}

impl ReadError {
    pub fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {} (offset {})", self.message, self.pos, self.pos.offset)
    }
}

impl std::error::Error for ReadError {}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\t' | '\r' | '\x0C' | '\u{2028}' | '\u{2029}')
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '%' | '$'
                | '_'
                | '-'
                | ':'
                | '.'
                | '+'
                | '*'
                | '@'
                | '!'
                | '?'
                | '&'
                | '='
                | '<'
                | '>'
                | '['
                | ']'
                | '{'
                | '}'
                | '/'
        )
}

fn is_char_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Digits with at most one embedded dot.
fn parse_number(text: &str) -> Option<f64> {
    let dots = text.chars().filter(|&c| c == '.').count();
    let digits = text.chars().filter(char::is_ascii_digit).count();
    if digits == 0 || dots > 1 || digits + dots != text.chars().count() {
        return None;
    }
    text.parse().ok()
}

/// Reads one datum per call from a source string, interning symbols into a
/// [`Registry`].
///
/// An error aborts the current top-level datum. Every error consumes at
/// least one character, so calling [`read_datum`](Reader::read_datum) again
/// resumes after the offending text.
pub struct Reader<'src, 'reg> {
    cursor: Cursor<'src>,
    registry: &'reg mut Registry,
    quasiquote_depth: usize,
}

impl<'src, 'reg> Reader<'src, 'reg> {
    pub fn new(source: &'src str, registry: &'reg mut Registry) -> Self {
        Self::with_cursor(Cursor::new(source), registry)
    }

    /// Continue reading from a cursor left by [`into_cursor`](Reader::into_cursor).
    pub fn with_cursor(cursor: Cursor<'src>, registry: &'reg mut Registry) -> Self {
        Self {
            cursor,
            registry,
            quasiquote_depth: 0,
        }
    }

    /// Give up the registry borrow, keeping the read position.
    pub fn into_cursor(self) -> Cursor<'src> {
        self.cursor
    }

    pub fn pos(&self) -> Pos {
        self.cursor.pos()
    }

    pub fn registry(&self) -> &Registry {
        &*self.registry
    }

    /// Read the next top-level datum. `Ok(None)` means no more data.
    pub fn read_datum(&mut self) -> Result<Option<Datum>, ReadError> {
        let result = self.read_token();
        match &result {
            Ok(Some(datum)) => {
                trace!("read {} ending at {}", self.registry.display(datum), self.pos())
            }
            Ok(None) => trace!("end of input at {}", self.pos()),
            Err(_) => self.quasiquote_depth = 0,
        }
        result
    }

    fn error(&self, message: impl Into<String>) -> ReadError {
        ReadError::new(message, self.cursor.pos())
    }

    /// Build an error at the current character, then step past it.
    fn error_consuming(&mut self, message: impl Into<String>) -> ReadError {
        let err = self.error(message);
        self.cursor.advance();
        err
    }

    fn skip_whitespace(&mut self) {
        self.cursor.read_while(is_whitespace);
    }

    fn skip_atmosphere(&mut self) {
        loop {
            self.skip_whitespace();
            if self.cursor.peek() != Some(';') {
                return;
            }
            self.cursor.read_while(|c| c != '\n');
        }
    }

    fn read_token(&mut self) -> Result<Option<Datum>, ReadError> {
        self.skip_atmosphere();
        let Some(c) = self.cursor.peek() else {
            return Ok(None);
        };
        let datum = match c {
            '"' => self.read_string()?,
            '(' => self.read_list()?,
            ')' => return Err(self.error_consuming("unmatched `)`")),
            '#' => self.read_sharp()?,
            '`' => self.read_quasiquote()?,
            ',' => self.read_unquote()?,
            '\'' => self.read_quote()?,
            _ => {
                let pos = self.cursor.pos();
                let text = self.cursor.read_while(is_symbol_char);
                if text.is_empty() {
                    return Err(self.error_consuming(format!("unexpected character `{c}`")));
                }
                if text == "." {
                    return Err(ReadError::new("dot outside of a list", pos));
                }
                self.parse_atom(&text)
            }
        };
        Ok(Some(datum))
    }

    /// Read a datum that must be there, e.g. after a quote character.
    fn read_required(&mut self, after: &str) -> Result<Datum, ReadError> {
        match self.read_token()? {
            Some(datum) => Ok(datum),
            None => Err(self.error(format!("unexpected end of input after {after}"))),
        }
    }

    fn read_escaped(&mut self, delimiter: char, what: &str) -> Result<String, ReadError> {
        let start = self.cursor.pos();
        self.cursor.advance();
        let mut text = String::new();
        loop {
            match self.cursor.advance() {
                Some('\\') => match self.cursor.advance() {
                    Some(c) => text.push(c),
                    None => break,
                },
                Some(c) if c == delimiter => return Ok(text),
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(ReadError::new(format!("unterminated {what}"), start))
    }

    fn read_string(&mut self) -> Result<Datum, ReadError> {
        let text = self.read_escaped('"', "string literal")?;
        Ok(Datum::text(&text))
    }

    fn read_list(&mut self) -> Result<Datum, ReadError> {
        self.cursor.advance();
        let mut items = Vec::new();
        loop {
            self.skip_atmosphere();
            match self.cursor.peek() {
                // End of input closes every open list.
                None => break,
                Some(')') => {
                    self.cursor.advance();
                    break;
                }
                Some('.') => {
                    let pos = self.cursor.pos();
                    let text = self.cursor.read_while(is_symbol_char);
                    if text != "." {
                        items.push(self.parse_atom(&text));
                        continue;
                    }
                    if items.is_empty() {
                        return Err(ReadError::new("dot with no preceding element", pos));
                    }
                    let tail = self.read_required("dot")?;
                    self.skip_atmosphere();
                    match self.cursor.peek() {
                        Some(')') => {
                            self.cursor.advance();
                        }
                        None => {}
                        Some(_) => return Err(self.error("expected `)` after dotted tail")),
                    }
                    return Ok(Datum::list_with_tail(items, tail));
                }
                Some(_) => match self.read_token()? {
                    Some(datum) => items.push(datum),
                    None => break,
                },
            }
        }
        Ok(Datum::list(items))
    }

    fn read_sharp(&mut self) -> Result<Datum, ReadError> {
        let pos = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.peek() {
            Some('\\') => {
                self.cursor.advance();
                self.read_char(pos)
            }
            Some('/') => {
                let pattern = self.read_escaped('/', "regexp literal")?;
                Ok(Datum::regexp(&pattern))
            }
            Some('(') => {
                let items = self.read_list()?;
                Ok(Datum::cons(Datum::Symbol(sym::VECTOR), items))
            }
            Some(c) => Err(self.error_consuming(format!("unsupported dispatch syntax `#{c}`"))),
            None => Err(ReadError::new("unexpected end of input after `#`", pos)),
        }
    }

    fn read_char(&mut self, start: Pos) -> Result<Datum, ReadError> {
        let Some(first) = self.cursor.advance() else {
            return Err(ReadError::new("unexpected end of input in character literal", start));
        };
        let rest = self.cursor.read_while(is_char_name_char);
        if rest.is_empty() {
            return Ok(Datum::Char(first));
        }
        let name = format!("{first}{rest}");
        match named_char(&name) {
            Some(c) => Ok(Datum::Char(c)),
            None => Err(ReadError::new(format!("unknown character name `{name}`"), start)),
        }
    }

    fn wrap(head: SymbolId, datum: Datum) -> Datum {
        Datum::list([Datum::Symbol(head), datum])
    }

    fn read_quote(&mut self) -> Result<Datum, ReadError> {
        self.cursor.advance();
        let datum = self.read_required("quote")?;
        Ok(Self::wrap(sym::QUOTE, datum))
    }

    fn read_quasiquote(&mut self) -> Result<Datum, ReadError> {
        self.cursor.advance();
        self.skip_whitespace();
        // Only a list opens a quasiquote level; anything else is a plain quote.
        if self.cursor.peek() != Some('(') {
            let datum = self.read_required("backquote")?;
            return Ok(Self::wrap(sym::QUOTE, datum));
        }
        self.quasiquote_depth += 1;
        let datum = self.read_required("backquote");
        self.quasiquote_depth -= 1;
        Ok(Self::wrap(sym::QUASIQUOTE, datum?))
    }

    fn read_unquote(&mut self) -> Result<Datum, ReadError> {
        if self.quasiquote_depth == 0 {
            return Err(self.error_consuming("comma outside of quasiquote"));
        }
        self.cursor.advance();
        self.skip_whitespace();
        let head = if self.cursor.peek() == Some('@') {
            self.cursor.advance();
            sym::QQ_SPLICE
        } else {
            sym::QQ_UNQUOTE
        };
        self.quasiquote_depth -= 1;
        let datum = self.read_required("comma");
        self.quasiquote_depth += 1;
        Ok(Self::wrap(head, datum?))
    }

    fn parse_atom(&mut self, text: &str) -> Datum {
        if let Some(n) = parse_number(text) {
            return Datum::Number(n);
        }
        let name = text.to_ascii_uppercase();
        let id = match name.split_once(':') {
            Some((package, rest)) => {
                let rest = rest.strip_prefix(':').unwrap_or(rest);
                let package = if package.is_empty() {
                    pkg::KEYWORD
                } else {
                    self.registry.get_or_create_package(package)
                };
                self.registry.intern(package, rest)
            }
            None => self.registry.intern_current(&name),
        };
        Datum::Symbol(id)
    }
}

impl Iterator for Reader<'_, '_> {
    type Item = Result<Datum, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_datum().transpose()
    }
}

/// Read every datum in `source`, stopping at the first error.
pub fn read_all(source: &str, registry: &mut Registry) -> Result<Vec<Datum>, ReadError> {
    Reader::new(source, registry).collect()
}
