//! Symbol Table
//!
//! Interns property-name byte strings into one-byte `Symbol` codes so that
//! path matching compares integers instead of strings.
//!
//! - Codes 0 and 1 are reserved (`NONE`, `WILDCARD`)
//! - Codes 2..=255 are assigned in first-seen order
//! - The table is append-only: no entry is ever removed or rewritten
//!
//! Unknown names encode to `WILDCARD`, so a lookup never fails.

use crate::error::{EngineError, EngineResult};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Number of distinct names a table can hold
pub const SYMBOL_CAPACITY: usize = 254;

/// Compact code standing in for an interned property name
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u8);

impl Symbol {
    /// No symbol
    pub const NONE: Symbol = Symbol(0);
    /// Anonymous container (root or array element); also the code of
    /// every name the table has not seen
    pub const WILDCARD: Symbol = Symbol(1);

    const FIRST_ASSIGNED: u8 = 2;

    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_ASSIGNED
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Symbol::NONE => f.write_str("Symbol::NONE"),
            Symbol::WILDCARD => f.write_str("Symbol::WILDCARD"),
            Symbol(code) => write!(f, "Symbol({})", code),
        }
    }
}

/// Append-only interning table for property names
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    /// Names indexed by `code - FIRST_ASSIGNED`
    names: Vec<Box<[u8]>>,
    /// Name bytes -> assigned symbol
    index: HashMap<Box<[u8]>, Symbol>,
}

impl SymbolTable {
    /// Create a new empty table
    pub fn new() -> Self {
        SymbolTable {
            names: Vec::with_capacity(16),
            index: HashMap::with_capacity(16),
        }
    }

    /// Intern `name`, returning its symbol
    ///
    /// Returns the existing symbol if the name is already known. Fails once
    /// `SYMBOL_CAPACITY` distinct names have been recorded.
    pub fn record(&mut self, name: &[u8]) -> EngineResult<Symbol> {
        if let Some(&symbol) = self.index.get(name) {
            return Ok(symbol);
        }

        if self.names.len() >= SYMBOL_CAPACITY {
            return Err(EngineError::SymbolCapacity {
                capacity: SYMBOL_CAPACITY,
            });
        }

        let symbol = Symbol(Symbol::FIRST_ASSIGNED + self.names.len() as u8);
        let owned: Box<[u8]> = name.into();
        self.names.push(owned.clone());
        self.index.insert(owned, symbol);
        Ok(symbol)
    }

    /// Look up the symbol for `name`, `WILDCARD` if it was never recorded
    #[inline]
    pub fn encode(&self, name: &[u8]) -> Symbol {
        self.index.get(name).copied().unwrap_or(Symbol::WILDCARD)
    }

    /// Name bytes for a symbol
    ///
    /// `WILDCARD` decodes to `*`; `NONE` and unassigned codes decode to
    /// the empty string.
    pub fn decode(&self, symbol: Symbol) -> &[u8] {
        match symbol {
            Symbol::WILDCARD => b"*",
            Symbol::NONE => b"",
            Symbol(code) => self
                .names
                .get((code - Symbol::FIRST_ASSIGNED) as usize)
                .map(|name| &**name)
                .unwrap_or(b""),
        }
    }

    /// Lossy UTF-8 rendering of a symbol, for diagnostics
    pub fn describe(&self, symbol: Symbol) -> Cow<'_, str> {
        String::from_utf8_lossy(self.decode(symbol))
    }

    /// Get the number of recorded names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no names have been recorded
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Recorded names with their symbols, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[u8])> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (Symbol(Symbol::FIRST_ASSIGNED + i as u8), &**name))
    }
}
