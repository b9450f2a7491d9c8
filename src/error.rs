//! Error hierarchy
//!
//! Three families, all surfaced to the caller and never retried:
//! - configuration errors, raised while building a `Reducer`
//! - traversal errors, raised by `process` when the path stack and the
//!   token stream disagree
//! - malformed input, passed through verbatim from the tokenizer

use crate::core::ParseError;
use thiserror::Error;

/// Root error type for rule compilation and document processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Rules reference more distinct property names than symbols exist.
    #[error("symbol table full: at most {capacity} distinct property names")]
    SymbolCapacity { capacity: usize },

    /// A rule pattern is deeper than the path stack can hold.
    #[error("rule {rule}: pattern depth {depth} exceeds maximum of {max}")]
    PatternTooDeep { rule: usize, depth: usize, max: usize },

    /// A rule pattern cannot describe any JSON path.
    #[error("rule {rule}: invalid pattern: {reason}")]
    InvalidPattern { rule: usize, reason: &'static str },

    /// Invalid reducer configuration.
    #[error("config error: {0}")]
    InvalidConfig(String),

    /// Document nesting went past the path stack limit.
    #[error("document nesting exceeds maximum depth of {max}")]
    StackOverflow { max: usize },

    /// A container closed while no container was open.
    #[error("path stack underflow: container closed with no open container")]
    StackUnderflow,

    /// Input ended with containers still open.
    #[error("truncated document: {depth} container(s) still open at end of input")]
    TruncatedDocument { depth: usize },

    /// The tokenizer rejected the input.
    #[error("malformed JSON: {0}")]
    Malformed(#[from] ParseError),
}

impl EngineError {
    /// Raised while building a reducer, before any document is read
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::SymbolCapacity { .. }
                | EngineError::PatternTooDeep { .. }
                | EngineError::InvalidPattern { .. }
                | EngineError::InvalidConfig(_)
        )
    }

    /// Raised by `process` on a stack/stream disagreement
    pub fn is_traversal(&self) -> bool {
        matches!(
            self,
            EngineError::StackOverflow { .. }
                | EngineError::StackUnderflow
                | EngineError::TruncatedDocument { .. }
        )
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, EngineError::Malformed(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
