//! Reducer configuration
//!
//! Settings fixed when a `Reducer` is built. The defaults match the
//! relaxed reader most producers of telemetry-style JSON expect.

use crate::core::TokenizerOptions;
use crate::error::{EngineError, EngineResult};
use crate::path::MAX_DEPTH;

/// Build-time settings for a `Reducer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducerConfig {
    /// Deepest container nesting accepted, at most `MAX_DEPTH`
    pub max_depth: usize,
    /// Tokenizer leniency switches
    pub tokenizer: TokenizerOptions,
}

impl ReducerConfig {
    /// Full depth, RFC 8259 tokenizer
    pub const fn strict() -> Self {
        ReducerConfig {
            max_depth: MAX_DEPTH,
            tokenizer: TokenizerOptions::strict(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerOptions) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            return Err(EngineError::InvalidConfig(format!(
                "max_depth must be between 1 and {}, got {}",
                MAX_DEPTH, self.max_depth
            )));
        }
        Ok(())
    }
}

impl Default for ReducerConfig {
    fn default() -> Self {
        ReducerConfig {
            max_depth: MAX_DEPTH,
            tokenizer: TokenizerOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReducerConfig::default();
        assert_eq!(config.max_depth, 16);
        assert!(config.tokenizer.allow_trailing_commas);
        assert!(config.tokenizer.allow_comments);
        assert!(config.validate().is_ok());

        let strict = ReducerConfig::strict();
        assert!(!strict.tokenizer.allow_comments);
        assert!(strict.validate().is_ok());
    }

    #[test]
    fn test_validate_depth() {
        for bad in [0, MAX_DEPTH + 1, 1000] {
            let err = ReducerConfig::default().with_max_depth(bad).validate().unwrap_err();
            assert!(err.is_configuration());
            assert!(err.to_string().starts_with("config error: max_depth"));
        }
        assert!(ReducerConfig::default().with_max_depth(1).validate().is_ok());
    }
}
