//! Dispatch Engine
//!
//! Single forward pass over the token stream. The path stack mirrors the
//! open containers; every scalar property is checked against the rules of
//! the current depth and each match runs its action in declaration order.
//!
//! The stack and the aggregate belong to the `process` call, so a
//! `Reducer` is immutable after build and can serve any number of
//! documents, sequentially or from several threads.

use super::observer::{NoopObserver, TraversalObserver};
use crate::config::ReducerConfig;
use crate::core::{ParseError, Scalar, TokenKind, TokenSource, Tokenizer, TokenizerOptions};
use crate::error::{EngineError, EngineResult};
use crate::path::{ContainerKind, PathSegment, PathStack, Symbol, SymbolTable};
use crate::rules::{Rule, RuleSet};
use std::fmt;

/// Compiled rule set plus the initial aggregate
pub struct Reducer<T> {
    rules: RuleSet<T>,
    initial: T,
    config: ReducerConfig,
}

impl<T> Reducer<T> {
    /// Compile `rules` with the default configuration
    pub fn new<I>(initial: T, rules: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        Self::with_config(initial, rules, ReducerConfig::default())
    }

    pub fn with_config<I>(initial: T, rules: I, config: ReducerConfig) -> EngineResult<Self>
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        config.validate()?;
        let rules = RuleSet::compile(rules, config.max_depth)?;
        Ok(Reducer {
            rules,
            initial,
            config,
        })
    }

    pub fn builder(initial: T) -> ReducerBuilder<T> {
        ReducerBuilder::new(initial)
    }

    /// Value each `process` call starts from
    pub fn initial(&self) -> &T {
        &self.initial
    }

    pub fn rules(&self) -> &RuleSet<T> {
        &self.rules
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.rules.symbols()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Reduce `input` starting from an explicit aggregate
    pub fn process_with(&self, input: &[u8], init: T) -> EngineResult<T> {
        let mut tokens = Tokenizer::with_options(input, self.config.tokenizer);
        self.process_tokens(&mut tokens, init)
    }

    /// Reduce a token stream starting from an explicit aggregate
    pub fn process_tokens<'a, S>(&self, source: &mut S, init: T) -> EngineResult<T>
    where
        S: TokenSource<'a> + ?Sized,
    {
        self.process_observed(source, init, &mut NoopObserver)
    }

    /// Reduce a token stream, reporting every step to `observer`
    pub fn process_observed<'a, S, O>(
        &self,
        source: &mut S,
        init: T,
        observer: &mut O,
    ) -> EngineResult<T>
    where
        S: TokenSource<'a> + ?Sized,
        O: TraversalObserver + ?Sized,
    {
        self.run(source, init, observer).map_err(|err| {
            tracing::debug!(error = %err, "document rejected");
            err
        })
    }

    fn run<'a, S, O>(&self, source: &mut S, init: T, observer: &mut O) -> EngineResult<T>
    where
        S: TokenSource<'a> + ?Sized,
        O: TraversalObserver + ?Sized,
    {
        let mut stack = PathStack::new(self.config.max_depth);
        let mut state = init;

        while let Some(token) = source.next_token()? {
            match token.kind {
                TokenKind::StartObject => stack.push(PathSegment::object())?,
                TokenKind::StartArray => stack.push(PathSegment::array())?,
                TokenKind::EndObject | TokenKind::EndArray => {
                    stack.pop()?;
                }
                TokenKind::PropertyName => {
                    let symbol = self.symbols().encode(token.raw);
                    observer.on_token(token.kind, source.depth(), stack.as_slice());

                    let value = source
                        .next_token()?
                        .ok_or(EngineError::TruncatedDocument { depth: stack.len() })?;
                    match value.kind {
                        TokenKind::StartObject => {
                            stack.push(PathSegment::new(ContainerKind::Object, symbol))?
                        }
                        TokenKind::StartArray => {
                            stack.push(PathSegment::new(ContainerKind::Array, symbol))?
                        }
                        _ => match Scalar::from_token(&value) {
                            Some(scalar) => self.dispatch(
                                &scalar,
                                token.raw,
                                symbol,
                                &mut stack,
                                &mut state,
                                observer,
                            ),
                            None => {
                                return Err(ParseError::new(
                                    "Expected value after property name",
                                    value.span.0,
                                )
                                .into())
                            }
                        },
                    }
                    observer.on_token(value.kind, source.depth(), stack.as_slice());
                    continue;
                }
                // Array items and a root scalar have no property to match
                _ => {}
            }
            observer.on_token(token.kind, source.depth(), stack.as_slice());
        }

        if !stack.is_empty() {
            return Err(EngineError::TruncatedDocument { depth: stack.len() });
        }
        Ok(state)
    }

    /// Run every rule of the current depth that matches this scalar
    #[inline]
    fn dispatch<O>(
        &self,
        scalar: &Scalar<'_>,
        name: &[u8],
        symbol: Symbol,
        stack: &mut PathStack,
        state: &mut T,
        observer: &mut O,
    ) where
        O: TraversalObserver + ?Sized,
    {
        let kind = scalar.kind();
        for &index in self.rules.candidates(stack.len()) {
            if let Some(rule) = self.rules.get(index) {
                // Re-checked per rule: earlier actions may have invalidated a frame
                if rule.matches(stack, symbol, kind) {
                    observer.on_match(index);
                    (rule.action())(scalar, name, &mut stack.view(), state);
                }
            }
        }
    }
}

impl<T: Clone> Reducer<T> {
    /// Reduce `input` starting from a clone of the initial aggregate
    pub fn process(&self, input: &[u8]) -> EngineResult<T> {
        self.process_with(input, self.initial.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for Reducer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("rules", &self.rules)
            .field("initial", &self.initial)
            .field("config", &self.config)
            .finish()
    }
}

/// Incremental `Reducer` construction
pub struct ReducerBuilder<T> {
    initial: T,
    rules: Vec<Rule<T>>,
    config: ReducerConfig,
}

impl<T> ReducerBuilder<T> {
    pub fn new(initial: T) -> Self {
        ReducerBuilder {
            initial,
            rules: Vec::new(),
            config: ReducerConfig::default(),
        }
    }

    pub fn rule(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        self.rules.extend(rules);
        self
    }

    pub fn config(mut self, config: ReducerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn tokenizer(mut self, options: TokenizerOptions) -> Self {
        self.config.tokenizer = options;
        self
    }

    /// Validate the configuration and compile the rules
    pub fn build(self) -> EngineResult<Reducer<T>> {
        Reducer::with_config(self.initial, self.rules, self.config)
    }
}

impl<T> fmt::Debug for ReducerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducerBuilder")
            .field("rules", &self.rules.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
