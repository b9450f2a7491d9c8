//! Rule Compiler
//!
//! Compiles rule declarations into pre-encoded matchers. Every property
//! name is resolved to a `Symbol` once, so runtime matching is a depth
//! check plus integer/enum comparisons per segment.
//!
//! Compiled rules are bucketed by depth. Only rules of the current depth
//! can ever match, and each bucket keeps declaration order, so multi-fire
//! order is unchanged.

use super::pattern::PathMarker;
use super::rule::{Action, Rule};
use crate::core::ScalarKind;
use crate::error::{EngineError, EngineResult};
use crate::path::{ContainerKind, PathSegment, PathStack, Symbol, SymbolTable};
use std::fmt;

/// Rule with every name resolved to a symbol
pub struct CompiledRule<T> {
    segments: Box<[PathSegment]>,
    property: Option<Symbol>,
    kind: Option<ScalarKind>,
    action: Box<Action<T>>,
}

impl<T> CompiledRule<T> {
    /// Nesting depth at which this rule can match
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn property(&self) -> Option<Symbol> {
        self.property
    }

    #[inline]
    pub fn kind(&self) -> Option<ScalarKind> {
        self.kind
    }

    #[inline]
    pub(crate) fn action(&self) -> &Action<T> {
        &*self.action
    }

    /// Check a scalar property against this rule
    #[inline]
    pub fn matches(&self, stack: &PathStack, property: Symbol, kind: ScalarKind) -> bool {
        self.property.map_or(true, |p| p == property)
            && self.kind.map_or(true, |k| k == kind)
            && stack.matches(&self.segments)
    }
}

impl<T> fmt::Debug for CompiledRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("segments", &self.segments)
            .field("property", &self.property)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Immutable compiled rule set with its symbol table
pub struct RuleSet<T> {
    symbols: SymbolTable,
    rules: Vec<CompiledRule<T>>,
    /// Rule indices per depth, in declaration order
    by_depth: Vec<Vec<usize>>,
}

impl<T> RuleSet<T> {
    /// Compile declarations for a stack of at most `max_depth` segments
    pub fn compile<I>(declarations: I, max_depth: usize) -> EngineResult<Self>
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        let mut symbols = SymbolTable::new();
        let mut rules = Vec::new();
        let mut by_depth = vec![Vec::new(); max_depth + 1];

        for (index, declaration) in declarations.into_iter().enumerate() {
            let compiled = compile_rule(index, declaration, &mut symbols, max_depth)?;
            by_depth[compiled.depth()].push(index);
            rules.push(compiled);
        }

        let set = RuleSet {
            symbols,
            rules,
            by_depth,
        };

        tracing::debug!(
            rules = set.rules.len(),
            symbols = set.symbols.len(),
            max_depth,
            "compiled rule set"
        );
        for (index, rule) in set.rules.iter().enumerate() {
            tracing::trace!(
                rule = index,
                pattern = %set.describe(rule),
                "compiled rule"
            );
        }

        Ok(set)
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&CompiledRule<T>> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule<T>> {
        self.rules.iter()
    }

    /// Indices of rules that can match at `depth`, in declaration order
    #[inline]
    pub fn candidates(&self, depth: usize) -> &[usize] {
        self.by_depth.get(depth).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Human-readable pattern, e.g. `{ Telemetry:[ { .Model (string)`
    pub fn describe(&self, rule: &CompiledRule<T>) -> String {
        let mut out = rule
            .segments
            .iter()
            .map(|s| s.display(&self.symbols).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(property) = rule.property {
            out.push_str(" .");
            out.push_str(&self.symbols.describe(property));
        }
        if let Some(kind) = rule.kind {
            out.push_str(&format!(" ({})", kind));
        }
        out
    }
}

impl<T> fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("symbols", &self.symbols.len())
            .field("rules", &self.rules)
            .finish()
    }
}

fn compile_rule<T>(
    index: usize,
    declaration: Rule<T>,
    symbols: &mut SymbolTable,
    max_depth: usize,
) -> EngineResult<CompiledRule<T>> {
    let segments = compile_pattern(index, &declaration.path, symbols)?;

    if segments.len() > max_depth {
        return Err(EngineError::PatternTooDeep {
            rule: index,
            depth: segments.len(),
            max: max_depth,
        });
    }

    let property = declaration
        .property
        .as_deref()
        .map(|name| symbols.record(name))
        .transpose()?;

    Ok(CompiledRule {
        segments: segments.into_boxed_slice(),
        property,
        kind: declaration.kind,
        action: declaration.action,
    })
}

/// Translate markers into segments, recording every name
fn compile_pattern(
    index: usize,
    markers: &[PathMarker],
    symbols: &mut SymbolTable,
) -> EngineResult<Vec<PathSegment>> {
    let invalid = |reason| EngineError::InvalidPattern { rule: index, reason };

    let mut segments: Vec<PathSegment> = Vec::with_capacity(markers.len());
    let mut iter = markers.iter();

    while let Some(marker) = iter.next() {
        let segment = match marker {
            PathMarker::Object => PathSegment::object(),
            PathMarker::Array => PathSegment::array(),
            PathMarker::Name(name) => {
                match segments.last() {
                    None => return Err(invalid("pattern must start with '{' or '['")),
                    Some(parent) if parent.kind() == ContainerKind::Array => {
                        return Err(invalid("array elements have no property names"));
                    }
                    Some(_) => {}
                }
                let symbol = symbols.record(name)?;
                match iter.next() {
                    Some(PathMarker::Object) => PathSegment::new(ContainerKind::Object, symbol),
                    Some(PathMarker::Array) => PathSegment::new(ContainerKind::Array, symbol),
                    _ => return Err(invalid("property name must be followed by '{' or '['")),
                }
            }
        };
        segments.push(segment);
    }

    if segments.is_empty() {
        return Err(invalid("empty pattern"));
    }

    Ok(segments)
}
