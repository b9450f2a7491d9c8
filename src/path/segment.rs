//! Path Segments and the bounded Path Stack
//!
//! One segment per open container on the traversal path. Each segment
//! carries the container kind, the symbol of the property that opened it,
//! and a frame state. Rule actions may flip a frame to `Invalidated`, which
//! stops every rule reaching through that frame from matching until the
//! container closes.
//!
//! The stack lives in a fixed-capacity `ArrayVec` on the caller's frame;
//! pushing past the configured limit is an error, never a reallocation.

use super::symbols::{Symbol, SymbolTable};
use crate::error::{EngineError, EngineResult};
use arrayvec::ArrayVec;
use std::fmt;

/// Hard upper bound on path stack depth
pub const MAX_DEPTH: usize = 16;

/// Kind of an open container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Object,
    Array,
}

/// Whether rules may still match through a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameState {
    #[default]
    Active,
    Invalidated,
}

/// One open container on the traversal path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathSegment {
    kind: ContainerKind,
    symbol: Symbol,
    state: FrameState,
}

impl PathSegment {
    #[inline]
    pub const fn new(kind: ContainerKind, symbol: Symbol) -> Self {
        PathSegment {
            kind,
            symbol,
            state: FrameState::Active,
        }
    }

    /// Anonymous object (document root or array element)
    #[inline]
    pub const fn object() -> Self {
        Self::new(ContainerKind::Object, Symbol::WILDCARD)
    }

    /// Anonymous array (document root or array element)
    #[inline]
    pub const fn array() -> Self {
        Self::new(ContainerKind::Array, Symbol::WILDCARD)
    }

    #[inline]
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn is_invalidated(&self) -> bool {
        self.state == FrameState::Invalidated
    }

    /// Stop rules from matching through this frame
    #[inline]
    pub fn invalidate(&mut self) {
        self.state = FrameState::Invalidated;
    }

    /// Check this live segment against a compiled pattern segment
    ///
    /// The frame must be active, with the same kind and the same symbol.
    /// An anonymous pattern marker only matches a container with no
    /// recorded name: the root, an array element, or a property name the
    /// table has never seen.
    #[inline]
    pub fn matches(&self, pattern: &PathSegment) -> bool {
        self.state == FrameState::Active
            && self.kind == pattern.kind
            && self.symbol == pattern.symbol
    }

    /// Render with names resolved through `symbols`
    pub fn display<'a>(&'a self, symbols: &'a SymbolTable) -> impl fmt::Display + 'a {
        DisplaySegment {
            segment: self,
            symbols,
        }
    }
}

struct DisplaySegment<'a> {
    segment: &'a PathSegment,
    symbols: &'a SymbolTable,
}

impl fmt::Display for DisplaySegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segment.symbol != Symbol::WILDCARD {
            write!(f, "{}:", self.symbols.describe(self.segment.symbol))?;
        }
        let marker = match self.segment.kind {
            ContainerKind::Object => "{",
            ContainerKind::Array => "[",
        };
        f.write_str(marker)?;
        if self.segment.is_invalidated() {
            f.write_str("!")?;
        }
        Ok(())
    }
}

/// Fixed-capacity stack of open containers
#[derive(Debug, Clone)]
pub struct PathStack {
    segments: ArrayVec<PathSegment, MAX_DEPTH>,
    limit: usize,
}

impl PathStack {
    /// Create an empty stack holding at most `limit` segments
    /// (clamped to `MAX_DEPTH`)
    pub fn new(limit: usize) -> Self {
        PathStack {
            segments: ArrayVec::new(),
            limit: limit.min(MAX_DEPTH),
        }
    }

    /// Push a segment for a newly opened container
    #[inline]
    pub fn push(&mut self, segment: PathSegment) -> EngineResult<()> {
        if self.segments.len() >= self.limit {
            return Err(EngineError::StackOverflow { max: self.limit });
        }
        self.segments
            .try_push(segment)
            .map_err(|_| EngineError::StackOverflow { max: self.limit })
    }

    /// Pop the segment of the container that just closed
    #[inline]
    pub fn pop(&mut self) -> EngineResult<PathSegment> {
        self.segments.pop().ok_or(EngineError::StackUnderflow)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn as_slice(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check the whole stack against a compiled pattern
    #[inline]
    pub fn matches(&self, pattern: &[PathSegment]) -> bool {
        self.segments.len() == pattern.len()
            && self
                .segments
                .iter()
                .zip(pattern)
                .all(|(live, expected)| live.matches(expected))
    }

    /// Mutable view handed to rule actions
    #[inline]
    pub fn view(&mut self) -> PathView<'_> {
        PathView {
            segments: &mut self.segments,
        }
    }
}

/// Live path as seen by a rule action
///
/// Segments may be invalidated but not added or removed, so the stack
/// always stays in step with the token stream.
pub struct PathView<'a> {
    segments: &'a mut [PathSegment],
}

impl<'a> PathView<'a> {
    /// Wrap a segment slice (index 0 is the document root)
    pub fn new(segments: &'a mut [PathSegment]) -> Self {
        PathView { segments }
    }

    /// Number of open containers
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&PathSegment> {
        self.segments.get(index)
    }

    /// Innermost open container
    #[inline]
    pub fn parent(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    #[inline]
    pub fn as_slice(&self) -> &[PathSegment] {
        self.segments
    }

    /// Invalidate the frame at `index` (0 = root). Returns false if no such
    /// frame is open.
    pub fn invalidate(&mut self, index: usize) -> bool {
        match self.segments.get_mut(index) {
            Some(segment) => {
                segment.invalidate();
                true
            }
            None => false,
        }
    }

    /// Invalidate the innermost open container
    pub fn invalidate_parent(&mut self) -> bool {
        match self.segments.last_mut() {
            Some(segment) => {
                segment.invalidate();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for PathView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments.iter()).finish()
    }
}
