//! Character classification for word motion

/// ASCII punctuation other than `_`, which belongs to identifiers
pub fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation() && ch != '_'
}

/// Character class a word motion stops between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Whitespace,
    /// Alphanumeric characters (and `_`)
    WordChar,
    Punctuation,
}

pub fn char_type(ch: char) -> CharType {
    match ch {
        c if c.is_whitespace() => CharType::Whitespace,
        c if is_punctuation(c) => CharType::Punctuation,
        _ => CharType::WordChar,
    }
}
