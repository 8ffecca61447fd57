/// Character names accepted after `#\`, matched case-insensitively.
///
/// When two names map to the same character the first one listed is the
/// one used for printing.
const CHAR_NAMES: [(&str, char); 14] = [
    ("Space", ' '),
    ("Newline", '\n'),
    ("Linefeed", '\n'),
    ("Tab", '\t'),
    ("Return", '\r'),
    ("Page", '\x0C'),
    ("Backspace", '\x08'),
    ("Rubout", '\x7F'),
    ("Delete", '\x7F'),
    ("Escape", '\x1B'),
    ("Esc", '\x1B'),
    ("Bell", '\x07'),
    ("Nul", '\0'),
    ("Null", '\0'),
];

/// Resolve a multi-character name like `Space` or `newline`.
pub fn named_char(name: &str) -> Option<char> {
    CHAR_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, c)| c)
}

/// Printing name for a character, if it has one.
pub fn char_name(c: char) -> Option<&'static str> {
    CHAR_NAMES.iter().find(|&&(_, ch)| ch == c).map(|&(n, _)| n)
}
