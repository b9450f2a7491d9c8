//! Rule declarations
//!
//! A rule pairs a path pattern with an optional target property, an
//! optional target scalar kind, and an action run for every matching
//! scalar property.

use super::pattern::{parse_markers, PathMarker};
use crate::core::{Scalar, ScalarKind};
use crate::path::PathView;
use std::fmt;

/// Callback run for a matching scalar
///
/// Receives the value, the raw (un-interned) property name, the live path,
/// and the aggregate.
pub type Action<T> = dyn Fn(&Scalar<'_>, &[u8], &mut PathView<'_>, &mut T) + Send + Sync;

/// Declarative rule, compiled once when the reducer is built
pub struct Rule<T> {
    pub(crate) path: Vec<PathMarker>,
    pub(crate) property: Option<Box<[u8]>>,
    pub(crate) kind: Option<ScalarKind>,
    pub(crate) action: Box<Action<T>>,
}

impl<T> Rule<T> {
    /// Declare a rule for scalars directly inside the container `path`
    /// describes
    pub fn new<I, S, F>(path: I, action: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&Scalar<'_>, &[u8], &mut PathView<'_>, &mut T) + Send + Sync + 'static,
    {
        Self::from_markers(parse_markers(path), action)
    }

    /// Declare a rule from pre-parsed markers
    pub fn from_markers<F>(path: Vec<PathMarker>, action: F) -> Self
    where
        F: Fn(&Scalar<'_>, &[u8], &mut PathView<'_>, &mut T) + Send + Sync + 'static,
    {
        Rule {
            path,
            property: None,
            kind: None,
            action: Box::new(action),
        }
    }

    /// Only match the property with this name
    pub fn property(mut self, name: impl AsRef<[u8]>) -> Self {
        self.property = Some(name.as_ref().into());
        self
    }

    /// Only match scalars of this kind
    pub fn kind(mut self, kind: ScalarKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn path(&self) -> &[PathMarker] {
        &self.path
    }

    pub fn target_property(&self) -> Option<&[u8]> {
        self.property.as_deref()
    }

    pub fn target_kind(&self) -> Option<ScalarKind> {
        self.kind
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("path", &self.path)
            .field(
                "property",
                &self.property.as_deref().map(String::from_utf8_lossy),
            )
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
