//! Core JSON parsing primitives
//!
//! This module contains the fundamental building blocks for JSON parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: State machine for JSON token extraction
//! - Escape: JSON string escape decoding with Cow (zero-copy when possible)
//! - Value: Scalar values as seen by rule actions

pub mod escape;
pub mod scanner;
pub mod tokenizer;
pub mod value;

pub use tokenizer::{ParseError, Token, TokenKind, TokenSource, Tokenizer, TokenizerOptions};
pub use value::{Scalar, ScalarKind};
