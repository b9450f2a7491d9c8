//! JSON Tokenizer - State machine for JSON token extraction
//!
//! Implements a pull-parser style tokenizer that extracts JSON tokens:
//! - Object and array start/end
//! - Property names
//! - Scalar values (string, number, true, false, null)
//!
//! The tokenizer never allocates. Container nesting is tracked in a 64-bit
//! stack (one bit per level), which caps documents at 64 levels.

use super::escape::decode_escape;
use super::scanner::Scanner;
use std::fmt;

/// Deepest nesting the tokenizer can track
pub const TOKENIZER_MAX_DEPTH: usize = 64;

/// Type of JSON token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName,
    String,
    Number,
    True,
    False,
    Null,
}

/// A parsed JSON token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw value bytes. Strings and property names exclude the quotes and
    /// keep escapes undecoded; structural tokens hold their delimiter.
    pub raw: &'a [u8],
    /// Raw span in input (start, end), quotes included for strings
    pub span: (usize, usize),
    /// True if the raw bytes contain escape sequences
    pub escaped: bool,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, raw: &'a [u8], span: (usize, usize)) -> Self {
        Token {
            kind,
            raw,
            span,
            escaped: false,
        }
    }
}

/// Malformed input error raised by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Source of JSON tokens consumed by the dispatch engine
///
/// Implementations must report malformed input as `ParseError` rather than
/// guessing, and must report the number of open containers after each token.
pub trait TokenSource<'a> {
    /// Get the next token, or `None` at end of input
    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError>;

    /// Number of containers open after the last returned token
    fn depth(&self) -> usize;
}

/// Lenient-mode switches, mirroring common relaxed JSON readers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Accept `[1, 2,]` and `{"a": 1,}`
    pub allow_trailing_commas: bool,
    /// Skip `// line` and `/* block */` comments between tokens
    pub allow_comments: bool,
}

impl TokenizerOptions {
    /// RFC 8259 only: no trailing commas, no comments
    pub const fn strict() -> Self {
        TokenizerOptions {
            allow_trailing_commas: false,
            allow_comments: false,
        }
    }
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        TokenizerOptions {
            allow_trailing_commas: true,
            allow_comments: true,
        }
    }
}

/// What the grammar accepts next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Any value (document start, after ':' or after ',' in an array)
    Value,
    /// Any value or ']' (after '[')
    ValueOrEnd,
    /// Property name or '}' (after '{')
    KeyOrEnd,
    /// Property name (after ',' in an object)
    Key,
    /// ':' after a property name
    Colon,
    /// ',' or the closing delimiter of the current container
    CommaOrEnd,
    /// Root value complete; only whitespace may follow
    Done,
}

/// JSON tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    options: TokenizerOptions,
    expect: Expect,
    depth: usize,
    /// Bit `i` set if the container at level `i` is an object
    containers: u64,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input (lenient mode)
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, TokenizerOptions::default())
    }

    /// Create a new tokenizer in strict mode
    pub fn new_strict(input: &'a [u8]) -> Self {
        Self::with_options(input, TokenizerOptions::strict())
    }

    pub fn with_options(input: &'a [u8], options: TokenizerOptions) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            options,
            expect: Expect::Value,
            depth: 0,
            containers: 0,
        }
    }

    /// Get the current position in the input
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Get the next token, or None at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        loop {
            self.skip_insignificant()?;

            let b = match self.scanner.peek() {
                Some(b) => b,
                None => return self.end_of_input(),
            };

            match self.expect {
                Expect::Done => return Err(self.error("Trailing data after document")),
                Expect::Value => return self.read_value(b).map(Some),
                Expect::ValueOrEnd => {
                    if b == b']' {
                        return self.close(b']').map(Some);
                    }
                    return self.read_value(b).map(Some);
                }
                Expect::KeyOrEnd => {
                    return match b {
                        b'}' => self.close(b'}').map(Some),
                        b'"' => self.read_property_name().map(Some),
                        _ => Err(self.error("Expected property name or '}'")),
                    };
                }
                Expect::Key => {
                    if b != b'"' {
                        return Err(self.error("Expected property name"));
                    }
                    return self.read_property_name().map(Some);
                }
                Expect::Colon => {
                    if b != b':' {
                        return Err(self.error("Expected ':' after property name"));
                    }
                    self.scanner.advance(1);
                    self.expect = Expect::Value;
                }
                Expect::CommaOrEnd => match b {
                    b',' => {
                        self.scanner.advance(1);
                        let trailing = self.options.allow_trailing_commas;
                        self.expect = match (self.in_object(), trailing) {
                            (true, true) => Expect::KeyOrEnd,
                            (true, false) => Expect::Key,
                            (false, true) => Expect::ValueOrEnd,
                            (false, false) => Expect::Value,
                        };
                    }
                    b'}' | b']' => return self.close(b).map(Some),
                    _ => return Err(self.error("Expected ',' or closing delimiter")),
                },
            }
        }
    }

    /// Skip whitespace and, when enabled, comments
    fn skip_insignificant(&mut self) -> Result<(), ParseError> {
        loop {
            self.scanner.skip_whitespace();
            if !self.options.allow_comments || self.scanner.peek() != Some(b'/') {
                return Ok(());
            }
            match self.scanner.peek_at(1) {
                Some(b'/') => {
                    self.scanner.advance(2);
                    self.scanner.skip_line_comment();
                }
                Some(b'*') => {
                    self.scanner.advance(2);
                    if !self.scanner.skip_block_comment() {
                        return Err(self.error("Unterminated comment"));
                    }
                }
                // A lone '/' is reported by the grammar
                _ => return Ok(()),
            }
        }
    }

    fn end_of_input(&self) -> Result<Option<Token<'a>>, ParseError> {
        // Inside open containers the consumer decides what truncation means
        if self.depth == 0 && self.expect != Expect::Done {
            return Err(self.error("Unexpected end of input: no JSON value"));
        }
        Ok(None)
    }

    fn read_value(&mut self, b: u8) -> Result<Token<'a>, ParseError> {
        match b {
            b'{' => self.open(TokenKind::StartObject),
            b'[' => self.open(TokenKind::StartArray),
            b'"' => {
                let token = self.read_string(TokenKind::String)?;
                self.after_value();
                Ok(token)
            }
            b'-' | b'0'..=b'9' => {
                let token = self.read_number()?;
                self.after_value();
                Ok(token)
            }
            b't' => self.read_literal(b"true", TokenKind::True),
            b'f' => self.read_literal(b"false", TokenKind::False),
            b'n' => self.read_literal(b"null", TokenKind::Null),
            _ => Err(self.error("Unexpected character")),
        }
    }

    fn open(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        if self.depth >= TOKENIZER_MAX_DEPTH {
            return Err(self.error("Maximum nesting depth exceeded"));
        }
        let start = self.scanner.position();
        let is_object = kind == TokenKind::StartObject;
        if is_object {
            self.containers |= 1u64 << self.depth;
        } else {
            self.containers &= !(1u64 << self.depth);
        }
        self.depth += 1;
        self.scanner.advance(1);
        self.expect = if is_object {
            Expect::KeyOrEnd
        } else {
            Expect::ValueOrEnd
        };
        Ok(Token::new(kind, self.scanner.slice(start, start + 1), (start, start + 1)))
    }

    fn close(&mut self, delimiter: u8) -> Result<Token<'a>, ParseError> {
        let kind = if delimiter == b'}' {
            TokenKind::EndObject
        } else {
            TokenKind::EndArray
        };
        if self.depth == 0 || self.in_object() != (kind == TokenKind::EndObject) {
            return Err(self.error("Mismatched closing delimiter"));
        }
        let start = self.scanner.position();
        self.scanner.advance(1);
        self.depth -= 1;
        self.after_value();
        Ok(Token::new(kind, self.scanner.slice(start, start + 1), (start, start + 1)))
    }

    fn after_value(&mut self) {
        self.expect = if self.depth == 0 {
            Expect::Done
        } else {
            Expect::CommaOrEnd
        };
    }

    #[inline]
    fn in_object(&self) -> bool {
        self.depth > 0 && self.containers & (1u64 << (self.depth - 1)) != 0
    }

    fn read_property_name(&mut self) -> Result<Token<'a>, ParseError> {
        let token = self.read_string(TokenKind::PropertyName)?;
        self.expect = Expect::Colon;
        Ok(token)
    }

    /// Read a quoted string; the cursor must be on the opening quote
    fn read_string(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(1);
        let content_start = self.scanner.position();
        let mut escaped = false;

        loop {
            let pos = match self.scanner.find_quote_or_escape() {
                Some(pos) => pos,
                None => return Err(ParseError::new("Unterminated string", start)),
            };
            let segment = self.scanner.slice(self.scanner.position(), pos);
            if segment.iter().any(|&c| c < 0x20) {
                return Err(self.error("Unescaped control character in string"));
            }
            self.scanner.advance(pos - self.scanner.position());

            if self.scanner.peek() == Some(b'"') {
                let raw = self.scanner.slice(content_start, pos);
                self.scanner.advance(1);
                let mut token = Token::new(kind, raw, (start, pos + 1));
                token.escaped = escaped;
                return Ok(token);
            }

            let (_, consumed) =
                decode_escape(self.scanner.remaining()).map_err(|msg| self.error(msg))?;
            self.scanner.advance(consumed);
            escaped = true;
        }
    }

    /// Read a number per RFC 8259: -?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?
    fn read_number(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();

        if self.scanner.peek() == Some(b'-') {
            self.scanner.advance(1);
        }
        match self.scanner.peek() {
            Some(b'0') => self.scanner.advance(1),
            Some(b'1'..=b'9') => {
                self.scanner.consume_digits();
            }
            _ => return Err(self.error("Invalid number")),
        }
        if self.scanner.peek() == Some(b'.') {
            self.scanner.advance(1);
            if self.scanner.consume_digits() == 0 {
                return Err(self.error("Expected digit after decimal point"));
            }
        }
        if matches!(self.scanner.peek(), Some(b'e') | Some(b'E')) {
            self.scanner.advance(1);
            if matches!(self.scanner.peek(), Some(b'+') | Some(b'-')) {
                self.scanner.advance(1);
            }
            if self.scanner.consume_digits() == 0 {
                return Err(self.error("Expected digit in exponent"));
            }
        }

        let end = self.scanner.position();
        Ok(Token::new(TokenKind::Number, self.scanner.slice(start, end), (start, end)))
    }

    fn read_literal(
        &mut self,
        literal: &'static [u8],
        kind: TokenKind,
    ) -> Result<Token<'a>, ParseError> {
        if !self.scanner.starts_with(literal) {
            return Err(self.error("Invalid literal"));
        }
        let start = self.scanner.position();
        self.scanner.advance(literal.len());
        self.after_value();
        let end = start + literal.len();
        Ok(Token::new(kind, self.scanner.slice(start, end), (start, end)))
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::new(message, self.scanner.position())
    }
}

impl<'a> TokenSource<'a> for Tokenizer<'a> {
    #[inline]
    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        Tokenizer::next_token(self)
    }

    #[inline]
    fn depth(&self) -> usize {
        self.depth
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl fmt::Debug for Tokenizer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("position", &self.scanner.position())
            .field("depth", &self.depth)
            .field("expect", &self.expect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &[u8]) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .map(|t| t.unwrap().kind)
            .collect()
    }

    #[test]
    fn test_simple_object() {
        use TokenKind::*;
        assert_eq!(
            kinds(br#"{"a": 1, "b": [true, false, null], "c": "x"}"#),
            vec![
                StartObject, PropertyName, Number, PropertyName, StartArray, True, False, Null,
                EndArray, PropertyName, String, EndObject
            ]
        );
    }

    #[test]
    fn test_raw_values() {
        let tokens: Vec<_> = Tokenizer::new(br#"{"k\"ey": "vA", "n": -1.5e+3}"#)
            .map(|t| t.unwrap())
            .collect();
        assert_eq!(tokens[1].raw, br#"k\"ey"#);
        assert!(tokens[1].escaped);
        assert_eq!(tokens[2].raw, br"vA");
        assert_eq!(tokens[4].raw, b"-1.5e+3");
        assert!(!tokens[4].escaped);
    }

    #[test]
    fn test_depth_tracking() {
        let mut tokenizer = Tokenizer::new(br#"{"a": [[1]]}"#);
        let mut depths = Vec::new();
        while tokenizer.next_token().unwrap().is_some() {
            depths.push(tokenizer.depth);
        }
        assert_eq!(depths, vec![1, 1, 2, 3, 3, 2, 1, 0]);
    }

    #[test]
    fn test_trailing_commas_and_comments() {
        let input = b"// header\n{\"a\": [1, 2,], /* note */ \"b\": 2,}";
        assert_eq!(kinds(input).len(), 9);

        let strict: Result<Vec<_>, _> = Tokenizer::new_strict(input).collect();
        assert!(strict.is_err());
        let strict: Result<Vec<_>, _> = Tokenizer::new_strict(b"[1,]").collect();
        assert!(strict.is_err());
    }

    #[test]
    fn test_malformed() {
        for input in [
            &b"{\"a\" 1}"[..],
            b"[1 2]",
            b"{\"a\": 01}",
            b"[1.]",
            b"[-]",
            b"[tru]",
            b"{\"a\": \"unterminated}",
            b"[\"bad \\q escape\"]",
            b"[\"raw\ncontrol\"]",
            b"{]",
            b"[1]]",
            b"{} {}",
            b"",
            b"   ",
            b"{1: 2}",
        ] {
            let result: Result<Vec<_>, _> = Tokenizer::new(input).collect();
            assert!(result.is_err(), "expected error for {:?}", String::from_utf8_lossy(input));
        }
    }

    #[test]
    fn test_truncated_inside_container_is_end() {
        let mut tokenizer = Tokenizer::new(br#"{"a": [1"#);
        let mut count = 0;
        while tokenizer.next_token().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 4);
        assert_eq!(tokenizer.depth, 2);
    }

    #[test]
    fn test_max_depth() {
        let deep = "[".repeat(TOKENIZER_MAX_DEPTH + 1);
        let result: Result<Vec<_>, _> = Tokenizer::new(deep.as_bytes()).collect();
        let err = result.unwrap_err();
        assert_eq!(err.position, TOKENIZER_MAX_DEPTH);
    }

    #[test]
    fn test_scalar_document() {
        assert_eq!(kinds(b" 42 "), vec![TokenKind::Number]);
        assert_eq!(kinds(b"\"s\""), vec![TokenKind::String]);
    }
}
