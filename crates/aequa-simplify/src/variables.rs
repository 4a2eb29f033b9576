//! Collection of the unknowns of an expression.

use aequa_core::{ExprArena, ExprHandle, ExprNode, SymbolId, MAX_VARIABLES};
use smallvec::SmallVec;
use thiserror::Error;

/// More distinct symbols were found than a set may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expression has more than {capacity} variables")]
pub struct CapacityExceeded {
    /// Capacity of the set that overflowed.
    pub capacity: usize,
}

/// A bounded set of symbols kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSet {
    symbols: SmallVec<[SymbolId; MAX_VARIABLES]>,
    capacity: usize,
}

impl Default for VariableSet {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableSet {
    /// An empty set holding at most [`MAX_VARIABLES`] symbols.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_VARIABLES)
    }

    /// An empty set holding at most `capacity` symbols.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: SmallVec::new(),
            capacity,
        }
    }

    /// Inserts a symbol; returns true if it was not there yet.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityExceeded`] when a new symbol does not fit.
    pub fn insert(&mut self, symbol: SymbolId) -> Result<bool, CapacityExceeded> {
        if self.contains(symbol) {
            return Ok(false);
        }
        if self.symbols.len() >= self.capacity {
            return Err(CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.symbols.push(symbol);
        Ok(true)
    }

    /// Returns true if the symbol is in the set.
    #[must_use]
    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Position of the symbol in insertion order.
    #[must_use]
    pub fn position(&self, symbol: SymbolId) -> Option<usize> {
        self.symbols.iter().position(|s| *s == symbol)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[SymbolId] {
        &self.symbols
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols.iter().copied()
    }

    /// Removes every symbol.
    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}

/// Adds the symbols of `expr` accepted by `keep` to `set`, depth first.
///
/// # Errors
///
/// Returns [`CapacityExceeded`] if the set overflows; symbols found before
/// the overflow stay in the set.
pub fn collect_variables(
    arena: &ExprArena,
    expr: ExprHandle,
    set: &mut VariableSet,
    keep: &impl Fn(SymbolId) -> bool,
) -> Result<(), CapacityExceeded> {
    match arena.get(expr) {
        ExprNode::Symbol(id) => {
            if keep(*id) {
                set.insert(*id)?;
            }
            Ok(())
        }
        node => {
            for child in node.children() {
                collect_variables(arena, child, set, keep)?;
            }
            Ok(())
        }
    }
}
