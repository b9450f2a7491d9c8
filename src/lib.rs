//! RustyJSON - Rule-driven JSON reduction without deserialization
//!
//! A `Reducer` compiles a list of path rules once, then folds any number
//! of JSON documents into an aggregate in a single forward pass:
//!
//! - `core`: memchr scanner, tokenizer, escape decoding, scalar values
//! - `path`: symbol table and the bounded path stack
//! - `rules`: rule declarations and the rule compiler
//! - `engine`: the dispatch loop, observers, parallel batches
//!
//! ```
//! use rustyjson::{Reducer, Rule, ScalarKind};
//!
//! let reducer = Reducer::new(
//!     0i64,
//!     vec![Rule::new(["{", "a", "[", "{"], |v, _, _, sum| {
//!         *sum += v.as_i64().unwrap_or(0)
//!     })
//!     .property("v")
//!     .kind(ScalarKind::Number)],
//! )
//! .unwrap();
//!
//! assert_eq!(reducer.process(br#"{"a": [{"v": 1}, {"v": 2}]}"#).unwrap(), 3);
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod memory;
pub mod path;
pub mod rules;

pub use config::ReducerConfig;
pub use crate::core::{
    ParseError, Scalar, ScalarKind, Token, TokenKind, TokenSource, Tokenizer, TokenizerOptions,
};
pub use engine::{NoopObserver, Reducer, ReducerBuilder, TraversalObserver};
pub use error::{EngineError, EngineResult};
pub use path::{ContainerKind, FrameState, PathSegment, PathView, Symbol, SymbolTable, MAX_DEPTH};
pub use rules::{PathMarker, Rule};
