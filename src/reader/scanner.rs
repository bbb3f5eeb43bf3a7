//! Cursor over a single input string, with line/column bookkeeping for diagnostics.

use super::{Expected, ParseError, ParseErrorKind, Position, ReadResult};

/// A cursor over the text of one parse.
///
/// `index` is a byte offset into `text`, always on a character boundary.
/// `line` is 1-based; `col` is 0-based, counts characters, and resets after a newline.
pub struct Scanner<'a> {
    text: &'a str,
    index: usize,
    line: usize,
    col: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Scanner {
            text,
            index: 0,
            line: 1,
            col: 0,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            col: self.col,
        }
    }

    /// The unread remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.text[self.index..]
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.text.len()
    }

    /// An error of the given kind at the current position.
    pub fn fail(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.position())
    }

    pub fn peek(&self) -> ReadResult<char> {
        self.rest()
            .chars()
            .next()
            .ok_or_else(|| self.fail(ParseErrorKind::EndOfInput))
    }

    pub fn consume(&mut self) -> ReadResult<char> {
        let ch = self.peek()?;
        self.advance(ch);
        Ok(ch)
    }

    /// Consume `want`, or fail without moving.
    pub fn expect(&mut self, want: char) -> ReadResult<char> {
        match self.rest().chars().next() {
            Some(ch) if ch == want => {
                self.advance(ch);
                Ok(ch)
            }
            found => Err(self.fail(ParseErrorKind::UnexpectedCharacter {
                expected: Expected::Char(want),
                found,
            })),
        }
    }

    /// Consume the next `len` bytes and return them.
    ///
    /// `len` must land on a character boundary; the run matchers in `lexical` guarantee that.
    pub fn take(&mut self, len: usize) -> &'a str {
        let run = &self.rest()[..len];
        for ch in run.chars() {
            self.advance(ch);
        }
        run
    }

    pub fn skip_whitespace(&mut self) {
        let len = super::lexical::space_len(self.rest());
        self.take(len);
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        self.index += ch.len_utf8();
    }
}
