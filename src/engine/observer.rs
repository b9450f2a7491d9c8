//! Traversal observer
//!
//! Optional hook into the dispatch loop, for instrumentation and
//! diagnostics. The loop is generic over the observer, so the no-op default
//! compiles away.

use crate::core::TokenKind;
use crate::path::PathSegment;

/// Callbacks made by the dispatch loop
pub trait TraversalObserver {
    /// Called after each token has been applied to the path stack.
    /// `depth` is the tokenizer's count of open containers.
    #[inline]
    fn on_token(&mut self, _kind: TokenKind, _depth: usize, _stack: &[PathSegment]) {}

    /// Called right before the action of rule `rule` runs
    #[inline]
    fn on_match(&mut self, _rule: usize) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TraversalObserver for NoopObserver {}

impl<O: TraversalObserver + ?Sized> TraversalObserver for &mut O {
    #[inline]
    fn on_token(&mut self, kind: TokenKind, depth: usize, stack: &[PathSegment]) {
        (**self).on_token(kind, depth, stack)
    }

    #[inline]
    fn on_match(&mut self, rule: usize) {
        (**self).on_match(rule)
    }
}
