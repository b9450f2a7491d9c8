//! Path tracking
//!
//! - Symbols: interning of property names into one-byte codes
//! - Segments: one frame per open container, kept in a bounded stack

pub mod segment;
pub mod symbols;

pub use segment::{ContainerKind, FrameState, PathSegment, PathStack, PathView, MAX_DEPTH};
pub use symbols::{Symbol, SymbolTable, SYMBOL_CAPACITY};
