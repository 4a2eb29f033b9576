//! The evaluation context: expression pool plus user definitions.

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::arena::ExprArena;
use crate::expr::SymbolId;
use crate::handle::{ExprHandle, PoolCursor};
use crate::parse::{parse_equation, parse_expression, Equation, ParseError};
use crate::MAX_NAME_LENGTH;

/// Owns the expression pool and the symbols the user has defined.
#[derive(Debug, Default, Clone)]
pub struct Context {
    arena: ExprArena,
    definitions: FxHashMap<SymbolId, ExprHandle>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The expression pool.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// The expression pool, mutably.
    pub fn arena_mut(&mut self) -> &mut ExprArena {
        &mut self.arena
    }

    /// Parses an expression into the pool.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input.
    pub fn parse(&mut self, text: &str) -> Result<ExprHandle, ParseError> {
        parse_expression(&mut self.arena, text)
    }

    /// Parses an equation into the pool.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input.
    pub fn parse_equation(&mut self, text: &str) -> Result<Equation, ParseError> {
        parse_equation(&mut self.arena, text)
    }

    /// Defines `name` as the expression written in `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the name is too long or the text does not
    /// parse.
    pub fn define(&mut self, name: &str, text: &str) -> Result<(), ParseError> {
        let value = self.parse(text)?;
        self.define_expr(name, value)
    }

    /// Defines `name` as an expression already in the pool.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NameTooLong`] for names over the limit.
    pub fn define_expr(&mut self, name: &str, value: ExprHandle) -> Result<(), ParseError> {
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ParseError::NameTooLong(name.to_string()));
        }
        let id = self.arena.intern_symbol(name);
        debug!("defining {name}");
        self.definitions.insert(id, value);
        Ok(())
    }

    /// Removes a definition; returns true if there was one.
    pub fn undefine(&mut self, name: &str) -> bool {
        self.arena
            .lookup_symbol(name)
            .is_some_and(|id| self.definitions.remove(&id).is_some())
    }

    /// The definition of a symbol, if any.
    #[must_use]
    pub fn definition(&self, symbol: SymbolId) -> Option<ExprHandle> {
        self.definitions.get(&symbol).copied()
    }

    /// Returns true if the symbol has a definition.
    #[must_use]
    pub fn is_defined(&self, symbol: SymbolId) -> bool {
        self.definitions.contains_key(&symbol)
    }

    /// Records the current end of the pool.
    #[must_use]
    pub fn checkpoint(&self) -> PoolCursor {
        self.arena.checkpoint()
    }

    /// Frees the pool back to `cursor`.
    ///
    /// Definitions whose value lives downstream of the cursor are dropped
    /// with it. Owners of other handles (solutions in particular) must be
    /// tidied first.
    pub fn reclaim(&mut self, cursor: PoolCursor) {
        let arena = &self.arena;
        self.definitions.retain(|id, value| {
            let keep = !value.is_downstream_of(cursor);
            if !keep {
                warn!(
                    "dropping definition of {} reclaimed with the pool",
                    arena.symbol_name(*id).unwrap_or("?")
                );
            }
            keep
        });
        self.arena.truncate(cursor);
    }
}
