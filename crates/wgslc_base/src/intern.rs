//! String interning for identifier payloads.
//!
//! The lexer interns every identifier it scans — variable names, field
//! names, type names, builtin names — and tokens and AST nodes carry the
//! resulting [`Symbol`] handles instead of owned strings. The interner
//! lives in the [`ShaderModule`] that owns the AST, so symbols stay
//! resolvable for as long as the tree does, and name comparisons during
//! parsing and type lookup are integer comparisons.
//!
//! ```
//! use wgslc_base::{Interner, SymbolEq};
//!
//! let mut interner = Interner::new();
//! let a = interner.intern("vertex_index");
//! let b = interner.intern("vertex_index");
//! assert_eq!(a, b);
//! assert!(a.is(&interner, "vertex_index"));
//! ```
//!
//! [`ShaderModule`]: ../../wgslc_language/ast/struct.ShaderModule.html

use std::collections::HashMap;

/// A lightweight handle to an interned string.
///
/// Symbols are `Copy`, compare in O(1), and are only meaningful together
/// with the [`Interner`] that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    /// The empty string, always interned at index 0.
    pub const EMPTY: Symbol = Symbol(0);

    /// The internal index of this symbol, usable for dense side tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Stores each unique string once and hands out [`Symbol`] handles.
#[derive(Debug)]
pub struct Interner {
    map: HashMap<Box<str>, Symbol>,
    strings: Vec<Box<str>>,
}

impl Interner {
    /// Creates an interner with only the empty string pre-interned.
    pub fn new() -> Self {
        let mut interner = Interner { map: HashMap::new(), strings: Vec::new() };
        interner.strings.push(Box::from(""));
        interner
    }

    /// Interns a string, returning the existing symbol if it was seen
    /// before.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&symbol) = self.map.get(s) {
            return symbol;
        }
        let symbol = Symbol(self.strings.len() as u32);
        self.strings.push(Box::from(s));
        self.map.insert(Box::from(s), symbol);
        symbol
    }

    /// Returns the string for the given symbol.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` was not created by this interner.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.strings[symbol.0 as usize]
    }

    /// Looks up an already-interned string without inserting it.
    pub fn lookup(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    /// Number of interned strings, counting the pre-interned empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if nothing beyond the empty string has been interned.
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares a [`Symbol`] against a string literal without an explicit
/// `resolve` call at every site.
pub trait SymbolEq {
    /// Returns `true` if this symbol resolves to `s`.
    fn is(&self, interner: &Interner, s: &str) -> bool;
}

impl SymbolEq for Symbol {
    #[inline]
    fn is(&self, interner: &Interner, s: &str) -> bool {
        interner.resolve(*self) == s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut interner = Interner::new();
        let first = interner.intern("position");
        let second = interner.intern("position");
        assert_eq!(first, second);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        let mut interner = Interner::new();
        assert_ne!(interner.intern("vec2"), interner.intern("vec3"));
    }

    #[test]
    fn resolve_round_trips() {
        let mut interner = Interner::new();
        let symbol = interner.intern("vertex_index");
        assert_eq!(interner.resolve(symbol), "vertex_index");
    }

    #[test]
    fn empty_symbol_is_preinterned() {
        let interner = Interner::new();
        assert_eq!(interner.resolve(Symbol::EMPTY), "");
        assert!(interner.is_empty());
    }

    #[test]
    fn lookup_does_not_insert() {
        let mut interner = Interner::new();
        assert_eq!(interner.lookup("fragment"), None);
        let symbol = interner.intern("fragment");
        assert_eq!(interner.lookup("fragment"), Some(symbol));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn symbol_eq_matches_resolved_text() {
        let mut interner = Interner::new();
        let symbol = interner.intern("builtin");
        assert!(symbol.is(&interner, "builtin"));
        assert!(!symbol.is(&interner, "Builtin"));
    }
}
