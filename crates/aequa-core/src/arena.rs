//! Arena allocator for expression storage.
//!
//! This module provides a contiguous memory arena for storing expression
//! nodes. The arena only grows between checkpoints; truncating it to a
//! [`PoolCursor`] frees every node created since that checkpoint.

use aequa_integers::{Integer, Rational};
use hashbrown::HashMap;
use log::trace;
use smallvec::SmallVec;

use crate::expr::{Constant, ExprNode, Function, SymbolId};
use crate::handle::{ExprHandle, PoolCursor};

/// The main arena for storing expressions.
///
/// All expressions are stored contiguously in a `Vec`, with hash-consing
/// ensuring each unique expression is stored exactly once.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol table: maps symbol names to their IDs.
    symbols: HashMap<String, SymbolId>,
    /// Reverse symbol table for display.
    symbol_names: Vec<String>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            intern_map: HashMap::with_capacity(capacity),
            symbols: HashMap::new(),
            symbol_names: Vec::new(),
        }
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    /// Otherwise, allocates a new node and returns its handle.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        #[allow(clippy::cast_possible_truncation)]
        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// Interns a symbol, returning its unique ID.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.symbols.get(name) {
            return id;
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = self.symbol_names.len() as SymbolId;
        self.symbols.insert(name.to_string(), id);
        self.symbol_names.push(name.to_string());
        id
    }

    /// Looks up a symbol ID without interning.
    #[must_use]
    pub fn lookup_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    /// Gets the name of a symbol by its ID.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbol_names.get(id as usize).map(String::as_str)
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Records the current end of the pool.
    #[must_use]
    pub fn checkpoint(&self) -> PoolCursor {
        #[allow(clippy::cast_possible_truncation)]
        PoolCursor::new(self.nodes.len() as u32)
    }

    /// Frees every node allocated at or after `cursor`.
    ///
    /// Handles downstream of the cursor are dangling afterwards. Symbol
    /// names are kept, so symbol IDs stay stable.
    pub fn truncate(&mut self, cursor: PoolCursor) {
        let keep = cursor.position() as usize;
        if keep >= self.nodes.len() {
            return;
        }
        trace!("truncating expression pool from {} to {keep} nodes", self.nodes.len());
        for node in self.nodes.drain(keep..) {
            self.intern_map.remove(&node);
        }
    }

    // === Convenience constructors ===

    /// Creates an exact number.
    pub fn number(&mut self, value: Rational) -> ExprHandle {
        self.intern(ExprNode::Number(value))
    }

    /// Creates an integer expression.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.number(Rational::from_integer(Integer::new(value)))
    }

    /// Creates the rational `numerator / denominator`.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    pub fn rational(&mut self, numerator: i64, denominator: i64) -> ExprHandle {
        self.number(Rational::from_i64(numerator, denominator))
    }

    /// Creates an approximate number; non-finite values become undefined.
    pub fn decimal(&mut self, value: f64) -> ExprHandle {
        if !value.is_finite() {
            return self.undefined();
        }
        // Normalise negative zero so that 0.0 and -0.0 intern together.
        let value = if value == 0.0 { 0.0 } else { value };
        self.intern(ExprNode::Decimal(value.to_bits()))
    }

    /// Creates a constant.
    pub fn constant(&mut self, constant: Constant) -> ExprHandle {
        self.intern(ExprNode::Constant(constant))
    }

    /// Creates a symbol expression.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates the undefined value.
    pub fn undefined(&mut self) -> ExprHandle {
        self.intern(ExprNode::Undefined)
    }

    /// Creates the nonreal marker.
    pub fn nonreal(&mut self) -> ExprHandle {
        self.intern(ExprNode::Nonreal)
    }

    /// Creates an addition expression.
    pub fn add(&mut self, args: impl Into<SmallVec<[ExprHandle; 4]>>) -> ExprHandle {
        let args = args.into();
        match args.len() {
            0 => self.integer(0),
            1 => args[0],
            _ => self.intern(ExprNode::Add(args)),
        }
    }

    /// Creates a multiplication expression.
    pub fn mul(&mut self, args: impl Into<SmallVec<[ExprHandle; 4]>>) -> ExprHandle {
        let args = args.into();
        match args.len() {
            0 => self.integer(1),
            1 => args[0],
            _ => self.intern(ExprNode::Mul(args)),
        }
    }

    /// Creates a power expression.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Pow { base, exp })
    }

    /// Creates a negation expression.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Neg(arg))
    }

    /// Creates the difference `a - b`.
    pub fn sub(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let negated = self.neg(b);
        self.add(smallvec::smallvec![a, negated])
    }

    /// Creates a division expression.
    pub fn div(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Div { num, den })
    }

    /// Creates a function application.
    pub fn func(&mut self, func: Function, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Function { func, arg })
    }

    /// Creates a square root, represented as a power of one half.
    pub fn sqrt(&mut self, arg: ExprHandle) -> ExprHandle {
        let half = self.rational(1, 2);
        self.pow(arg, half)
    }

    /// Creates a matrix from row-major entries.
    ///
    /// # Panics
    ///
    /// Panics if the entry count does not match the dimensions.
    pub fn matrix(&mut self, rows: usize, cols: usize, entries: Vec<ExprHandle>) -> ExprHandle {
        assert_eq!(entries.len(), rows * cols, "matrix dimensions mismatch");
        self.intern(ExprNode::Matrix {
            rows,
            cols,
            entries,
        })
    }
}
