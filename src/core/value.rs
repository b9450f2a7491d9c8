//! Scalar values handed to rule actions
//!
//! A `Scalar` borrows the raw token bytes from the input document. Numeric
//! and string interpretation happens on demand, so actions only pay for the
//! conversions they ask for.

use super::escape::{decode_str, decoded_eq};
use super::tokenizer::{Token, TokenKind};
use std::borrow::Cow;
use std::fmt;

/// Kind of a scalar JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Bool,
    Null,
}

impl ScalarKind {
    /// Map a token kind to its scalar kind, `None` for structural tokens
    #[inline]
    pub fn of(kind: TokenKind) -> Option<ScalarKind> {
        match kind {
            TokenKind::String => Some(ScalarKind::String),
            TokenKind::Number => Some(ScalarKind::Number),
            TokenKind::True | TokenKind::False => Some(ScalarKind::Bool),
            TokenKind::Null => Some(ScalarKind::Null),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Bool => "bool",
            ScalarKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// A scalar value token, borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar<'a> {
    kind: ScalarKind,
    raw: &'a [u8],
    escaped: bool,
}

impl<'a> Scalar<'a> {
    /// Build a scalar from a value token. Returns `None` for structural tokens.
    pub fn from_token(token: &Token<'a>) -> Option<Self> {
        ScalarKind::of(token.kind).map(|kind| Scalar {
            kind,
            raw: token.raw,
            escaped: token.escaped,
        })
    }

    /// Build a scalar directly from raw bytes
    pub fn new(kind: ScalarKind, raw: &'a [u8]) -> Self {
        Scalar {
            kind,
            raw,
            escaped: memchr::memchr(b'\\', raw).is_some(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Raw bytes as they appear in the document. Strings exclude the quotes
    /// and keep escape sequences undecoded.
    #[inline]
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Compare raw bytes (no escape decoding)
    #[inline]
    pub fn raw_eq(&self, other: &[u8]) -> bool {
        self.raw == other
    }

    /// Compare the decoded string value, allocation-free.
    /// Always false for non-string scalars.
    pub fn str_eq(&self, other: &str) -> bool {
        if self.kind != ScalarKind::String {
            return false;
        }
        if self.escaped {
            decoded_eq(self.raw, other.as_bytes())
        } else {
            self.raw == other.as_bytes()
        }
    }

    /// Decoded string value (borrowed unless escapes were present)
    pub fn as_str(&self) -> Option<Cow<'a, str>> {
        if self.kind != ScalarKind::String {
            return None;
        }
        decode_str(self.raw).ok()
    }

    /// Integer value, `None` if this is not an integral number in range
    pub fn as_i64(&self) -> Option<i64> {
        self.number_text()?.parse().ok()
    }

    /// Unsigned integer value, `None` if negative, fractional or out of range
    pub fn as_u64(&self) -> Option<u64> {
        self.number_text()?.parse().ok()
    }

    /// Floating point value of any number
    pub fn as_f64(&self) -> Option<f64> {
        self.number_text()?.parse().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ScalarKind::Bool => Some(self.raw == b"true"),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind == ScalarKind::Null
    }

    fn number_text(&self) -> Option<&'a str> {
        if self.kind != ScalarKind::Number {
            return None;
        }
        // Number tokens are ASCII by construction
        std::str::from_utf8(self.raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        let n = Scalar::new(ScalarKind::Number, b"-42");
        assert_eq!(n.as_i64(), Some(-42));
        assert_eq!(n.as_u64(), None);
        assert_eq!(n.as_f64(), Some(-42.0));

        let f = Scalar::new(ScalarKind::Number, b"1.5e3");
        assert_eq!(f.as_i64(), None);
        assert_eq!(f.as_f64(), Some(1500.0));
    }

    #[test]
    fn test_strings() {
        let s = Scalar::new(ScalarKind::String, br"\u0054X");
        assert!(s.str_eq("TX"));
        assert!(!s.raw_eq(b"TX"));
        assert_eq!(s.as_str().as_deref(), Some("TX"));
        assert_eq!(s.as_i64(), None);
    }

    #[test]
    fn test_bool_and_null() {
        assert_eq!(Scalar::new(ScalarKind::Bool, b"true").as_bool(), Some(true));
        assert_eq!(Scalar::new(ScalarKind::Bool, b"false").as_bool(), Some(false));
        assert!(Scalar::new(ScalarKind::Null, b"null").is_null());
        assert!(!Scalar::new(ScalarKind::Null, b"null").str_eq("null"));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ScalarKind::of(TokenKind::True), Some(ScalarKind::Bool));
        assert_eq!(ScalarKind::of(TokenKind::StartArray), None);
        assert_eq!(ScalarKind::Number.to_string(), "number");
    }
}
