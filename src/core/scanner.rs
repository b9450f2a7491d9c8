//! SIMD-accelerated JSON scanning using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::{memchr, memchr2, memmem};

/// Byte cursor over a JSON document
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Get a slice from start to end positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Skip JSON insignificant whitespace (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Find the next '"' or '\' from the current position
    #[inline]
    pub fn find_quote_or_escape(&self) -> Option<usize> {
        memchr2(b'"', b'\\', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Skip a `//` line comment body; the cursor must be past the `//`.
    /// Stops after the newline, or at end of input.
    pub fn skip_line_comment(&mut self) {
        match memchr(b'\n', &self.input[self.pos..]) {
            Some(i) => self.pos += i + 1,
            None => self.pos = self.input.len(),
        }
    }

    /// Skip a `/* */` block comment body; the cursor must be past the `/*`.
    /// Returns false if the comment is never closed.
    pub fn skip_block_comment(&mut self) -> bool {
        match memmem::find(&self.input[self.pos..], b"*/") {
            Some(i) => {
                self.pos += i + 2;
                true
            }
            None => {
                self.pos = self.input.len();
                false
            }
        }
    }

    /// Consume a run of ASCII digits, returning how many were consumed
    #[inline]
    pub fn consume_digits(&mut self) -> usize {
        let start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        self.pos - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_quote_or_escape() {
        let scanner = Scanner::new(br#"abc\"def""#);
        assert_eq!(scanner.find_quote_or_escape(), Some(3));
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new(b"  \t\n\r{");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
        assert_eq!(scanner.peek(), Some(b'{'));
    }

    #[test]
    fn test_skip_comments() {
        let mut scanner = Scanner::new(b" line\n/* block */x");
        scanner.skip_line_comment();
        assert_eq!(scanner.position(), 6);
        scanner.advance(2);
        assert!(scanner.skip_block_comment());
        assert_eq!(scanner.peek(), Some(b'x'));

        let mut open = Scanner::new(b" never closed");
        assert!(!open.skip_block_comment());
        assert_eq!(open.peek(), None);
    }

    #[test]
    fn test_consume_digits() {
        let mut scanner = Scanner::new(b"12345.6");
        assert_eq!(scanner.consume_digits(), 5);
        assert_eq!(scanner.peek(), Some(b'.'));
    }
}
