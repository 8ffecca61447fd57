//! # Parser
//!
//! Reads symbolic-expression source text into [`object::Datum`] trees.
//!
//! ```text
//!  &str ──▶ Cursor ──▶ Reader ──▶ Datum stream
//!                        │
//!                        ▼
//!                     Registry (symbol interning)
//! ```
//!
//! ```rust
//! use object::Registry;
//! use parser::Reader;
//!
//! let mut registry = Registry::new();
//! let reader = Reader::new("(defmacro m (x) (list 'quote x)) (m 5)", &mut registry);
//!
//! for result in reader {
//!     match result {
//!         Ok(datum) => println!("{datum:?}"),
//!         Err(err) => eprintln!("Read error: {err}"),
//!     }
//! }
//! ```

pub mod cursor;
pub mod reader;

pub use cursor::{Cursor, Pos};
pub use reader::{read_all, ReadError, Reader};

#[cfg(test)]
mod tests {
    use object::{pkg, sym, Datum, Registry};

    use crate::cursor::Pos;
    use crate::reader::{read_all, ReadError, Reader};

    fn read_one(src: &str, reg: &mut Registry) -> Datum {
        let mut reader = Reader::new(src, reg);
        reader
            .read_datum()
            .expect("read error")
            .expect("no datum")
    }

    fn read_err(src: &str) -> ReadError {
        let mut reg = Registry::new();
        let mut reader = Reader::new(src, &mut reg);
        reader.read_datum().expect_err("expected a read error")
    }

    fn show(src: &str) -> String {
        let mut reg = Registry::new();
        let datum = read_one(src, &mut reg);
        reg.display(&datum).to_string()
    }

    // ── Atoms ──────────────────────────────────────────────────────

    #[test]
    fn reads_numbers() {
        let mut reg = Registry::new();
        assert_eq!(read_one("42", &mut reg), Datum::Number(42.0));
        assert_eq!(read_one("3.25", &mut reg), Datum::Number(3.25));
        assert_eq!(read_one("5.", &mut reg), Datum::Number(5.0));
        assert_eq!(read_one("(.5)", &mut reg), Datum::list([Datum::Number(0.5)]));
    }

    #[test]
    fn signed_and_multi_dot_text_is_a_symbol() {
        assert_eq!(show("-5"), "-5");
        assert!(matches!(
            read_one("-5", &mut Registry::new()),
            Datum::Symbol(_)
        ));
        assert!(matches!(
            read_one("1.2.3", &mut Registry::new()),
            Datum::Symbol(_)
        ));
    }

    #[test]
    fn reads_strings_with_verbatim_escapes() {
        let mut reg = Registry::new();
        assert_eq!(read_one(r#""a\"b\\c\n""#, &mut reg), Datum::text("a\"b\\cn"));
        assert_eq!(read_one(r#""""#, &mut reg), Datum::text(""));
    }

    #[test]
    fn reads_characters() {
        let mut reg = Registry::new();
        assert_eq!(read_one(r"#\a", &mut reg), Datum::Char('a'));
        assert_eq!(read_one(r"#\Space", &mut reg), Datum::Char(' '));
        assert_eq!(read_one(r"#\newline", &mut reg), Datum::Char('\n'));
        assert_eq!(read_one(r"#\(", &mut reg), Datum::Char('('));
        assert_eq!(
            read_one(r"(#\a #\b)", &mut reg),
            Datum::list([Datum::Char('a'), Datum::Char('b')])
        );
    }

    #[test]
    fn unknown_character_name_is_an_error() {
        let err = read_err("  #\\bogus");
        assert_eq!(err.message, "unknown character name `bogus`");
        assert_eq!(err.pos, Pos::new(2, 1, 3));
    }

    #[test]
    fn reads_regexp_literals() {
        let mut reg = Registry::new();
        assert_eq!(read_one(r"#/a\/b+/", &mut reg), Datum::regexp("a/b+"));
    }

    #[test]
    fn reads_vectors_as_tagged_lists() {
        let mut reg = Registry::new();
        assert_eq!(
            read_one("#(1 2)", &mut reg),
            Datum::list([
                Datum::Symbol(sym::VECTOR),
                Datum::Number(1.0),
                Datum::Number(2.0)
            ])
        );
        assert_eq!(show("#(1 #(2))"), "#(1 #(2))");
    }

    #[test]
    fn unsupported_dispatch_is_an_error() {
        let err = read_err("#x");
        assert_eq!(err.message, "unsupported dispatch syntax `#x`");
    }

    // ── Symbols and packages ───────────────────────────────────────

    #[test]
    fn symbols_are_case_folded_and_interned() {
        let mut reg = Registry::new();
        let a = read_one("foo", &mut reg);
        let b = read_one("FOO", &mut reg);
        let c = read_one("Foo", &mut reg);
        assert_eq!(a, b);
        assert_eq!(b, c);
        let id = a.as_symbol().expect("symbol");
        assert_eq!(reg.name(id), "FOO");
        assert_eq!(reg.symbol(id).package, pkg::SL);
    }

    #[test]
    fn special_form_names_read_as_well_known_symbols() {
        let mut reg = Registry::new();
        assert_eq!(read_one("lambda", &mut reg), Datum::Symbol(sym::LAMBDA));
        assert_eq!(read_one("set!", &mut reg), Datum::Symbol(sym::SET));
        assert_eq!(read_one("c/c", &mut reg), Datum::Symbol(sym::CC));
    }

    #[test]
    fn symbol_characters_are_ascii_only() {
        let mut reg = Registry::new();
        let id = read_one("stra", &mut reg).as_symbol().expect("symbol");
        assert_eq!(reg.name(id), "STRA");
        let err = read_err("\u{df}");
        assert_eq!(err.message, "unexpected character `\u{df}`");
        assert_eq!(err.pos, Pos::new(0, 1, 1));
    }

    #[test]
    fn keywords_intern_into_keyword_package() {
        let mut reg = Registry::new();
        let id = read_one(":foo", &mut reg).as_symbol().expect("symbol");
        assert_eq!(reg.symbol(id).package, pkg::KEYWORD);
        assert_eq!(reg.name(id), "FOO");
        assert!(reg.is_keyword(id));
    }

    #[test]
    fn qualified_symbols_intern_into_named_package() {
        let mut reg = Registry::new();
        let single = read_one("pkg:foo", &mut reg).as_symbol().expect("symbol");
        let double = read_one("PKG::FOO", &mut reg).as_symbol().expect("symbol");
        assert_eq!(single, double);
        let package = reg.find_package("PKG").expect("package created");
        assert_eq!(reg.symbol(single).package, package);
        assert_eq!(reg.find_symbol(package, "FOO"), Some(single));
    }

    #[test]
    fn unqualified_symbols_use_current_package() {
        let mut reg = Registry::new();
        let user = reg.get_or_create_package("USER");
        reg.set_current_package(Some(user));
        let id = read_one("bar", &mut reg).as_symbol().expect("symbol");
        assert_eq!(reg.symbol(id).package, user);
        assert_eq!(reg.find_symbol(pkg::SL, "BAR"), None);
    }

    // ── Lists ──────────────────────────────────────────────────────

    #[test]
    fn reads_dotted_lists() {
        let mut reg = Registry::new();
        let datum = read_one("(1 2 . 3)", &mut reg);
        let (items, tail) = datum.split_tail();
        assert_eq!(items, vec![Datum::Number(1.0), Datum::Number(2.0)]);
        assert_eq!(tail, Datum::Number(3.0));
        assert_eq!(reg.display(&datum).to_string(), "(1 2 . 3)");
    }

    #[test]
    fn dot_must_follow_an_element_and_precede_the_close() {
        assert_eq!(read_err("( . a)").message, "dot with no preceding element");
        assert_eq!(read_err("(a . b c)").message, "expected `)` after dotted tail");
        assert_eq!(read_err(".").message, "dot outside of a list");
    }

    #[test]
    fn dot_prefixed_symbols_are_not_dots() {
        assert_eq!(show("(a ... b)"), "(A ... B)");
    }

    #[test]
    fn empty_list_is_nil_not_end_of_input() {
        let mut reg = Registry::new();
        let mut reader = Reader::new("() ", &mut reg);
        assert_eq!(reader.read_datum(), Ok(Some(Datum::Nil)));
        assert_eq!(reader.read_datum(), Ok(None));
        assert_eq!(reader.read_datum(), Ok(None));
    }

    #[test]
    fn end_of_input_closes_open_lists() {
        assert_eq!(show("(a (b c"), "(A (B C))");
    }

    #[test]
    fn skips_comments_and_whitespace() {
        let src = "; leading\r\n(a ; inside\n b ; before close\n)\x0C";
        assert_eq!(show(src), "(A B)");
    }

    #[test]
    fn unmatched_close_is_an_error_and_reading_resumes() {
        let mut reg = Registry::new();
        let results: Vec<_> = Reader::new(") 7", &mut reg).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            Err(ReadError::new("unmatched `)`", Pos::origin()))
        );
        assert_eq!(results[1], Ok(Datum::Number(7.0)));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = read_err("\n  \"abc");
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.pos, Pos::new(3, 2, 3));
    }

    // ── Quotation ──────────────────────────────────────────────────

    #[test]
    fn quote_wraps_next_datum() {
        assert_eq!(show("'x"), "(QUOTE X)");
        assert_eq!(show("'(1 2)"), "(QUOTE (1 2))");
    }

    #[test]
    fn quasiquote_with_unquote() {
        assert_eq!(
            show("`(a ,(+ 1 2))"),
            "(QUASIQUOTE (A (QQ-UNQUOTE (+ 1 2))))"
        );
        assert_eq!(show("`(a ,@b)"), "(QUASIQUOTE (A (QQ-SPLICE B)))");
        assert_eq!(show("` (a , b)"), "(QUASIQUOTE (A (QQ-UNQUOTE B)))");
    }

    #[test]
    fn backquote_before_non_list_is_plain_quote() {
        assert_eq!(show("`x"), "(QUOTE X)");
        assert_eq!(show("`(a `b)"), "(QUASIQUOTE (A (QUOTE B)))");
        // The degraded quote opens no level, so this comma has none to close.
        assert_eq!(read_err("`,b").message, "comma outside of quasiquote");
        assert_eq!(show("`(a `,b)"), "(QUASIQUOTE (A (QUOTE (QQ-UNQUOTE B))))");
    }

    #[test]
    fn nested_quasiquote_levels() {
        assert_eq!(
            show("`(a `(b ,(c ,d)))"),
            "(QUASIQUOTE (A (QUASIQUOTE (B (QQ-UNQUOTE (C (QQ-UNQUOTE D)))))))"
        );
        assert_eq!(read_err("`(a ,(b ,c))").message, "comma outside of quasiquote");
    }

    #[test]
    fn bare_comma_is_an_error() {
        let err = read_err("(a ,b)");
        assert_eq!(err.message, "comma outside of quasiquote");
        assert_eq!(err.pos, Pos::new(3, 1, 4));
    }

    #[test]
    fn error_resets_quasiquote_depth() {
        let mut reg = Registry::new();
        let mut reader = Reader::new("`(a #bad) ,c", &mut reg);
        assert!(reader.read_datum().is_err());
        // Whatever is left of the broken form reads on its own, so the
        // later comma is outside any quasiquote.
        let errors: Vec<ReadError> = reader.by_ref().filter_map(Result::err).collect();
        assert!(
            errors
                .iter()
                .any(|e| e.message == "comma outside of quasiquote" && e.pos == Pos::new(10, 1, 11)),
            "errors: {errors:?}"
        );
    }

    #[test]
    fn quote_at_end_of_input_is_an_error() {
        assert_eq!(read_err("'").message, "unexpected end of input after quote");
    }

    #[test]
    fn read_all_collects_every_form() {
        let mut reg = Registry::new();
        let forms = read_all("1 (2) three", &mut reg).expect("read error");
        assert_eq!(forms.len(), 3);
        assert_eq!(forms[1], Datum::list([Datum::Number(2.0)]));
    }

    #[test]
    fn reading_resumes_from_a_handed_back_cursor() {
        let mut reg = Registry::new();
        let mut reader = Reader::new("a\n  (b)", &mut reg);
        let first = reader.read_datum().unwrap();
        let cursor = reader.into_cursor();
        assert_eq!(cursor.pos(), Pos::new(1, 1, 2));

        // The registry is free between forms.
        let a = reg.find_symbol(pkg::SL, "A").unwrap();
        assert_eq!(first, Some(Datum::Symbol(a)));

        let mut reader = Reader::with_cursor(cursor, &mut reg);
        let second = reader.read_datum().unwrap().unwrap();
        assert_eq!(reader.pos(), Pos::new(7, 2, 6));
        assert_eq!(reader.read_datum(), Ok(None));
        assert_eq!(reg.display(&second).to_string(), "(B)");
    }

    #[test]
    fn reads_and_drops_a_very_long_list() {
        let mut reg = Registry::new();
        let n = 1_000_000;
        let forms = read_all(&format!("({})", "1 ".repeat(n)), &mut reg).expect("read error");
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].proper_len(), Some(n));
        drop(forms);
    }
}
