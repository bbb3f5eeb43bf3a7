//! Character classes and token runs for LispIsh.
//!
//! The classes are fixed for the lifetime of the process.
//! Runs are matched with anchored regexes against the unread remainder of the input,
//! so the scanner can advance over a whole name, number, or whitespace run at once.
//! The regexes are built from the character constants below.

/// Punctuation allowed in a method name, in addition to ASCII letters.
pub const NAME_PUNCTUATION: &[char] = &['<', '=', '>', '/', '+', '-'];

/// Characters skipped between tokens.
pub const WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// Characters that may open (and then must close) a string literal.
pub const QUOTES: &[char] = &['"', '\''];

/// The character that escapes the next one inside a string literal.
pub const ESCAPE: char = '\\';

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_quote(ch: char) -> bool {
    QUOTES.contains(&ch)
}

mod regex {
    use regex::Regex;
    use std::sync::OnceLock;

    use super::{NAME_PUNCTUATION, WHITESPACE};

    /// The characters as the body of a regex class, each escaped.
    fn class(chars: &[char]) -> String {
        chars
            .iter()
            .map(|ch| regex::escape(ch.encode_utf8(&mut [0; 4])))
            .collect()
    }

    pub(super) fn space() -> &'static Regex {
        static SPACE: OnceLock<Regex> = OnceLock::new();
        SPACE.get_or_init(|| {
            Regex::new(&format!(r"\A[{}]+", class(WHITESPACE)))
                .expect("could not compile regex for empty space")
        })
    }

    pub(super) fn name() -> &'static Regex {
        static NAME: OnceLock<Regex> = OnceLock::new();
        NAME.get_or_init(|| {
            Regex::new(&format!(r"\A[A-Za-z{}]+", class(NAME_PUNCTUATION)))
                .expect("could not compile regex for name")
        })
    }

    pub(super) fn digits() -> &'static Regex {
        static DIGITS: OnceLock<Regex> = OnceLock::new();
        DIGITS.get_or_init(|| Regex::new(r"\A[0-9]+").expect("could not compile regex for number"))
    }
}

/// Length in bytes of the whitespace run at the start of `input`.
pub fn space_len(input: &str) -> usize {
    regex::space().find(input).map_or(0, |m| m.end())
}

/// Length in bytes of the name run at the start of `input`.
pub fn name_len(input: &str) -> usize {
    regex::name().find(input).map_or(0, |m| m.end())
}

/// Length in bytes of the digit run at the start of `input`.
pub fn digits_len(input: &str) -> usize {
    regex::digits().find(input).map_or(0, |m| m.end())
}
