//! Dispatch engine
//!
//! - `dispatch`: the `Reducer` and its single-pass token loop
//! - `observer`: optional per-token and per-match callbacks
//! - `parallel`: Rayon batch processing over independent documents

pub mod dispatch;
pub mod observer;
pub mod parallel;

pub use dispatch::{Reducer, ReducerBuilder};
pub use observer::{NoopObserver, TraversalObserver};
pub use parallel::{process_batch, reduce_batch};
