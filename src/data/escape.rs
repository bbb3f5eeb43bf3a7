//! String-literal quoting for emitted LispIsh.
//!
//! The reader decodes a literal by letting a backslash escape exactly the next character.
//! Quoting here is the inverse: only the backslash and the chosen delimiter are escaped,
//! and everything else (newlines, control characters, non-ASCII) is written as-is.

use crate::reader::lexical::ESCAPE;

/// The delimiter to quote `value` with.
///
/// Double quotes, unless the value contains a double quote and no single quote.
pub fn delimiter_for(value: &str) -> char {
    if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    }
}

/// Quote and escape `value` so that the reader decodes it back to `value`.
pub fn quote(value: &str) -> String {
    let delimiter = delimiter_for(value);
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for ch in value.chars() {
        if ch == ESCAPE || ch == delimiter {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
    out.push(delimiter);
    out
}
