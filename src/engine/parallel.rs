//! Parallel batch processing
//!
//! Uses Rayon to reduce many independent documents with one shared
//! `Reducer`. Each document gets its own path stack and aggregate.

use super::dispatch::Reducer;
use crate::error::EngineResult;
use rayon::prelude::*;

/// Reduce every document, keeping input order in the results
pub fn process_batch<T>(reducer: &Reducer<T>, documents: &[&[u8]]) -> Vec<EngineResult<T>>
where
    T: Clone + Send + Sync,
{
    documents
        .par_iter()
        .map(|doc| reducer.process(doc))
        .collect()
}

/// Reduce every document and fold the aggregates into one
///
/// `combine` must be associative; the reducer's initial value is its
/// identity. The first error encountered is returned.
pub fn reduce_batch<T, F>(reducer: &Reducer<T>, documents: &[&[u8]], combine: F) -> EngineResult<T>
where
    T: Clone + Send + Sync,
    F: Fn(T, T) -> T + Send + Sync,
{
    documents
        .par_iter()
        .map(|doc| reducer.process(doc))
        .try_reduce(|| reducer.initial().clone(), |a, b| Ok(combine(a, b)))
}

impl<T: Clone + Send + Sync> Reducer<T> {
    /// See [`process_batch`]
    pub fn process_batch(&self, documents: &[&[u8]]) -> Vec<EngineResult<T>> {
        process_batch(self, documents)
    }
}
