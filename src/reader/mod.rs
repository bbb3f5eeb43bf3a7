//! Support for reading LispIsh expressions from strings.
//!
//! The reader is a recursive-descent parser over a single [`Scanner`].
//! One character of lookahead always picks the next production:
//!
//! ```text
//! method := '(' name args ')'
//! name   := [A-Za-z<=>/+-]+
//! args   := (method | number | string)*
//! number := [0-9]+
//! string := '"' body '"' | "'" body "'"
//! ```
//!
//! Whitespace may appear between any two tokens.
//! Inside a string body, a backslash escapes exactly the next character.
//! Calls nest at most [`MAX_DEPTH`] deep.

use std::io::ErrorKind;

use crate::data::{Integer, Method, Value};

pub mod lexical;
mod scanner;

use scanner::Scanner;

/// How deeply method calls may nest, counting the outermost call.
///
/// Parsing, emitting, and dropping a tree all recurse once per level,
/// so this bounds their stack use whatever the input.
pub const MAX_DEPTH: usize = 256;

/// Parse the text as a single method call, with nothing but whitespace after it.
pub fn parse(text: &str) -> ReadResult<Method> {
    tracing::trace!(len = text.len(), "parsing expression");
    Parser::new(text).parse().map_err(|err| {
        tracing::debug!(line = err.line, col = err.col, "parse failed: {}", err.kind);
        err
    })
}

/// Parse the text and emit it back in canonical form.
///
/// Empty input stays empty; anything else must be a single valid expression.
pub fn canonicalize(text: &str) -> ReadResult<String> {
    if text.is_empty() {
        return Ok(String::new());
    }
    Ok(parse(text)?.emit(0))
}

/// A location in the input: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// What the parser was looking for when it found something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// One specific character, e.g. a closing paren.
    Char(char),
    /// The start of any argument: a method call, number, or string.
    Argument,
}

/// The ways a parse can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ran out while a token was still required.
    EndOfInput,
    UnexpectedCharacter {
        expected: Expected,
        /// `None` if the input was exhausted.
        found: Option<char>,
    },
    /// A string literal was never closed.
    UnclosedString,
    /// A complete expression was followed by more than whitespace.
    ExpectedEof { found: char },
    EmptyName { found: char },
    EmptyNumber { found: char },
    /// A digit run that does not fit in an [`Integer`].
    NumberTooLarge { digits: String },
    /// A call nested more than [`MAX_DEPTH`] deep.
    TooDeep { limit: usize },
}

/// Renders a found character, or `EOF` if there was none.
struct Found(Option<char>);

impl std::fmt::Display for Found {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(ch) => write!(f, "<{ch}>"),
            None => write!(f, "<EOF>"),
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::EndOfInput => write!(f, "Ran off end of input"),
            ParseErrorKind::UnexpectedCharacter {
                expected: Expected::Char(want),
                found,
            } => write!(f, "Expected <{want}> but found {}", Found(*found)),
            ParseErrorKind::UnexpectedCharacter {
                expected: Expected::Argument,
                found,
            } => write!(
                f,
                "Expected a string, number, or function call but found {}",
                Found(*found)
            ),
            ParseErrorKind::UnclosedString => write!(f, "Unclosed string ran off end of input"),
            ParseErrorKind::ExpectedEof { found } => {
                write!(f, "Expected <EOF> but found <{found}>")
            }
            ParseErrorKind::EmptyName { found } => write!(f, "Expected a name but found <{found}>"),
            ParseErrorKind::EmptyNumber { found } => {
                write!(f, "Expected a number but found <{found}>")
            }
            ParseErrorKind::NumberTooLarge { digits } => {
                write!(f, "Number {digits} does not fit in an integer")
            }
            ParseErrorKind::TooDeep { limit } => {
                write!(f, "Calls nested deeper than {limit} levels")
            }
        }
    }
}

/// Error type if a parse does not complete.
///
/// Like any reader, some failures could be fixed by more input, e.g. "(and 1",
/// and some could not, e.g. "(and 1))".
/// [`ParseError::is_incomplete`] covers this distinction for interactive callers;
/// the parser itself treats both as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub col: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, at: Position) -> Self {
        ParseError {
            kind,
            line: at.line,
            col: at.col,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            col: self.col,
        }
    }

    /// The human-readable message, without the position.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// True if the input ended early, i.e. appending more input could make it parse.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::EndOfInput
                | ParseErrorKind::UnclosedString
                | ParseErrorKind::UnexpectedCharacter { found: None, .. }
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.col)
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for std::io::Error {
    fn from(value: ParseError) -> Self {
        let kind = if value.is_incomplete() {
            ErrorKind::UnexpectedEof
        } else {
            ErrorKind::InvalidInput
        };
        std::io::Error::new(kind, value)
    }
}

/// The main result type for this module.
pub type ReadResult<T> = Result<T, ParseError>;

impl std::str::FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parser state for a single call to [`parse`].
struct Parser<'a> {
    scanner: Scanner<'a>,
    /// Calls currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(text),
            depth: 0,
        }
    }

    fn parse(mut self) -> ReadResult<Method> {
        let method = self.method()?;
        self.scanner.skip_whitespace();
        self.expect_eof()?;
        Ok(method)
    }

    fn expect_eof(&self) -> ReadResult<()> {
        match self.scanner.rest().chars().next() {
            None => Ok(()),
            Some(found) => Err(self.scanner.fail(ParseErrorKind::ExpectedEof { found })),
        }
    }

    fn method(&mut self) -> ReadResult<Method> {
        self.scanner.skip_whitespace();
        let open = self.scanner.position();
        self.scanner.expect('(')?;
        if self.depth == MAX_DEPTH {
            return Err(ParseError::new(
                ParseErrorKind::TooDeep { limit: MAX_DEPTH },
                open,
            ));
        }
        self.depth += 1;
        let name = self.name()?;
        let args = self.args()?;
        self.scanner.skip_whitespace();
        self.scanner.expect(')')?;
        self.depth -= 1;
        Ok(Method::new(name, args))
    }

    fn name(&mut self) -> ReadResult<String> {
        self.scanner.skip_whitespace();
        let len = lexical::name_len(self.scanner.rest());
        if len == 0 {
            let found = self.scanner.peek()?;
            return Err(self.scanner.fail(ParseErrorKind::EmptyName { found }));
        }
        Ok(self.scanner.take(len).to_owned())
    }

    fn args(&mut self) -> ReadResult<Vec<Value>> {
        let mut args = Vec::new();
        self.scanner.skip_whitespace();
        loop {
            let arg = match self.scanner.peek()? {
                ')' => break,
                '(' => Value::Method(self.method()?),
                ch if lexical::is_digit(ch) => Value::Number(self.number()?),
                ch if lexical::is_quote(ch) => Value::String(self.string()?),
                ch => {
                    return Err(self.scanner.fail(ParseErrorKind::UnexpectedCharacter {
                        expected: Expected::Argument,
                        found: Some(ch),
                    }))
                }
            };
            args.push(arg);
            self.scanner.skip_whitespace();
        }
        Ok(args)
    }

    fn number(&mut self) -> ReadResult<Integer> {
        self.scanner.skip_whitespace();
        let start = self.scanner.position();
        let len = lexical::digits_len(self.scanner.rest());
        if len == 0 {
            let found = self.scanner.peek()?;
            return Err(self.scanner.fail(ParseErrorKind::EmptyNumber { found }));
        }
        let digits = self.scanner.take(len);
        digits.parse().map_err(|_| {
            ParseError::new(
                ParseErrorKind::NumberTooLarge {
                    digits: digits.to_owned(),
                },
                start,
            )
        })
    }

    /// Read a string literal, opening quote included, and return its decoded contents.
    fn string(&mut self) -> ReadResult<String> {
        self.scanner.skip_whitespace();
        let end = match self.scanner.peek()? {
            ch if lexical::is_quote(ch) => self.scanner.consume()?,
            ch => {
                return Err(self.scanner.fail(ParseErrorKind::UnexpectedCharacter {
                    expected: Expected::Char('"'),
                    found: Some(ch),
                }))
            }
        };

        let mut string = String::new();
        loop {
            if self.scanner.at_end() {
                return Err(self.scanner.fail(ParseErrorKind::UnclosedString));
            }
            let ch = self.scanner.consume()?;
            if ch == end {
                return Ok(string);
            }
            if ch == lexical::ESCAPE {
                if self.scanner.at_end() {
                    return Err(self.scanner.fail(ParseErrorKind::UnclosedString));
                }
                string.push(self.scanner.consume()?);
            } else {
                string.push(ch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(input: &str) -> ParseError {
        match parse(input) {
            Ok(v) => panic!("expected error for input {input:?}, got {v:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn parse_empty_call() -> ReadResult<()> {
        let method = parse("(foo)")?;
        assert_eq!(method.name(), "foo");
        assert_eq!(method.canonical_name(), "FOO");
        assert!(method.args().is_empty());
        Ok(())
    }

    #[test]
    fn parse_tree() -> ReadResult<()> {
        let input = r#"(and (= (user-email) "a@b.c") (Or 1 'two' (cohort)))"#;
        let want = Method::new(
            "and",
            vec![
                Method::new(
                    "=",
                    vec![
                        Method::new("user-email", vec![]).into(),
                        Value::String("a@b.c".to_owned()),
                    ],
                )
                .into(),
                Method::new(
                    "Or",
                    vec![
                        Value::Number(1),
                        Value::String("two".to_owned()),
                        Method::new("cohort", vec![]).into(),
                    ],
                )
                .into(),
            ],
        );

        assert_eq!(parse(input)?, want);
        Ok(())
    }

    #[test]
    fn whitespace_is_optional_between_tokens() -> ReadResult<()> {
        let tight = parse(r#"(f(g)1"x"'y'2)"#)?;
        let loose = parse("\n\t( f ( g ) 1 \"x\"\r\n 'y' 2 )  \n")?;
        assert_eq!(tight, loose);
        assert_eq!(tight.args().len(), 5);
        Ok(())
    }

    #[test]
    fn names_keep_their_case() -> ReadResult<()> {
        let method = parse("(UsEr-EmAiL)")?;
        assert_eq!(method.name(), "UsEr-EmAiL");
        assert_eq!(method.canonical_name(), "USER-EMAIL");
        for name in ["<=", ">", "/", "+", "-", "-leading"] {
            let method = parse(&format!("({name} 1)"))?;
            assert_eq!(method.name(), name);
        }
        Ok(())
    }

    #[test]
    fn string_escapes() -> ReadResult<()> {
        let method = parse(r#"(foo "a\"b" 'a\'b' "back\\slash" "\n" 'it"s')"#)?;
        let strings: Vec<&str> = method.args().iter().filter_map(Value::as_str).collect();
        assert_eq!(strings, vec!["a\"b", "a'b", "back\\slash", "n", "it\"s"]);
        Ok(())
    }

    #[test]
    fn strings_capture_control_characters() -> ReadResult<()> {
        let method = parse("(foo \"line\nbreak\ttab\")")?;
        assert_eq!(method.args()[0].as_str(), Some("line\nbreak\ttab"));
        Ok(())
    }

    #[test]
    fn error_on_unterminated_call() {
        let err = parse_err("(foo");
        assert_eq!(err.kind, ParseErrorKind::EndOfInput);
        assert_eq!((err.line, err.col), (1, 4));
        assert!(err.is_incomplete());
        assert_eq!(err.to_string(), "Ran off end of input at 1:4");
    }

    #[test]
    fn error_on_trailing_input() {
        let err = parse_err("(foo) bar");
        assert_eq!(err.kind, ParseErrorKind::ExpectedEof { found: 'b' });
        assert_eq!((err.line, err.col), (1, 6));
        assert!(!err.is_incomplete());
        assert_eq!(err.to_string(), "Expected <EOF> but found <b> at 1:6");
    }

    #[test]
    fn error_on_bare_literal() {
        let err = parse_err("42");
        match err.kind {
            ParseErrorKind::UnexpectedCharacter {
                expected: Expected::Char('('),
                found: Some('4'),
            } => (),
            v => panic!("unexpected error: {v:?}"),
        }
        assert_eq!(err.to_string(), "Expected <(> but found <4> at 1:0");
    }

    #[test]
    fn error_on_empty_input() {
        let err = parse_err("   ");
        match err.kind {
            ParseErrorKind::UnexpectedCharacter { found: None, .. } => (),
            v => panic!("unexpected error: {v:?}"),
        }
        assert_eq!((err.line, err.col), (1, 3));
        assert_eq!(err.to_string(), "Expected <(> but found <EOF> at 1:3");
    }

    #[test]
    fn error_on_empty_name() {
        let err = parse_err("(1 2)");
        assert_eq!(err.kind, ParseErrorKind::EmptyName { found: '1' });
        assert_eq!((err.line, err.col), (1, 1));
        assert_eq!(err.to_string(), "Expected a name but found <1> at 1:1");
    }

    #[test]
    fn error_on_negative_number() {
        let err = parse_err("(foo -1)");
        match err.kind {
            ParseErrorKind::UnexpectedCharacter {
                expected: Expected::Argument,
                found: Some('-'),
            } => (),
            v => panic!("unexpected error: {v:?}"),
        }
        assert_eq!((err.line, err.col), (1, 5));
    }

    #[test]
    fn error_on_unclosed_string() {
        let input = "(foo\n  \"hello)\n";
        let err = parse_err(input);
        assert_eq!(err.kind, ParseErrorKind::UnclosedString);
        assert_eq!((err.line, err.col), (3, 0));
        assert!(err.is_incomplete());
    }

    #[test]
    fn error_on_escaped_stringend() {
        let err = parse_err(r#"(foo "hello\"#);
        assert_eq!(err.kind, ParseErrorKind::UnclosedString);
        let err = parse_err(r#"(foo 'it\')"#);
        assert_eq!(err.kind, ParseErrorKind::UnclosedString);
    }

    #[test]
    fn mismatched_quotes_do_not_close() {
        let err = parse_err(r#"(foo "bar')"#);
        assert_eq!(err.kind, ParseErrorKind::UnclosedString);
    }

    #[test]
    fn error_on_huge_number() {
        let err = parse_err("(foo\n 99999999999999999999999)");
        match &err.kind {
            ParseErrorKind::NumberTooLarge { digits } => assert_eq!(digits.len(), 23),
            v => panic!("unexpected error: {v:?}"),
        }
        // Reported at the start of the digits.
        assert_eq!((err.line, err.col), (2, 1));
    }

    #[test]
    fn error_on_extra_close() {
        let err = parse_err("(foo))");
        assert_eq!(err.kind, ParseErrorKind::ExpectedEof { found: ')' });
        assert_eq!((err.line, err.col), (1, 5));
    }

    #[test]
    fn position_after_newlines() {
        let err = parse_err("(and\n    (or 1 2)\n    x)");
        assert_eq!((err.line, err.col), (3, 4));
    }

    #[test]
    fn canonicalize_normalizes() -> ReadResult<()> {
        assert_eq!(canonicalize("")?, "");
        assert_eq!(canonicalize("  ( foo   1 )\n")?, "(foo 1)");
        assert!(canonicalize(" ").is_err());
        Ok(())
    }

    #[test]
    fn from_str_parses() -> ReadResult<()> {
        let method: Method = "(before 1700000000)".parse()?;
        assert_eq!(method.canonical_name(), "BEFORE");
        Ok(())
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "(a ".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let err = parse_err(&nested(100_000));
        assert_eq!(err.kind, ParseErrorKind::TooDeep { limit: MAX_DEPTH });
        // At the first paren past the limit.
        assert_eq!((err.line, err.col), (1, 3 * MAX_DEPTH));
        assert!(!err.is_incomplete());
        assert_eq!(
            err.to_string(),
            format!("Calls nested deeper than {MAX_DEPTH} levels at 1:{}", 3 * MAX_DEPTH)
        );

        // Unclosed, too: the limit is hit before the input runs out.
        let err = parse_err(&"(a ".repeat(100_000));
        assert_eq!(err.kind, ParseErrorKind::TooDeep { limit: MAX_DEPTH });
    }

    #[test]
    fn nesting_up_to_the_limit() -> ReadResult<()> {
        let method = parse(&nested(MAX_DEPTH))?;
        assert_eq!(method.methods().count(), MAX_DEPTH);
        assert_eq!(parse(&method.emit(0))?, method);

        // Siblings do not add to the depth.
        let wide = format!("(a {})", nested(MAX_DEPTH - 1).repeat(3));
        assert_eq!(parse(&wide)?.methods().count(), 3 * (MAX_DEPTH - 1) + 1);
        Ok(())
    }

    #[test]
    fn io_error_kinds() {
        let err: std::io::Error = parse_err("(foo").into();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        let err: std::io::Error = parse_err("(foo))").into();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
