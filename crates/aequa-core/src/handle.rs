//! Type-safe expression handles and pool cursors.
//!
//! Handles are 32-bit indices into the arena. Because the arena only grows
//! between checkpoints, a handle's index also tells how recent it is: every
//! node created after a [`PoolCursor`] was taken has an index at or past it.

use std::fmt;

/// A handle to an expression in the arena.
///
/// This is a lightweight 32-bit index that can be copied freely.
/// Two handles are equal if and only if they point to the same
/// (structurally identical) expression, thanks to hash-consing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a new handle from an index.
    ///
    /// This is primarily for internal use by the arena.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns true if this node was allocated at or after `cursor`.
    ///
    /// Such a node does not survive [`crate::ExprArena::truncate`] to that
    /// cursor.
    #[must_use]
    pub const fn is_downstream_of(self, cursor: PoolCursor) -> bool {
        self.0 >= cursor.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

impl fmt::Display for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A checkpoint in the expression pool.
///
/// Obtained from [`crate::ExprArena::checkpoint`]; truncating the arena to a
/// cursor frees every node allocated since.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct PoolCursor(u32);

impl PoolCursor {
    /// Creates a cursor at the given pool length.
    #[must_use]
    pub const fn new(position: u32) -> Self {
        Self(position)
    }

    /// Returns the pool length recorded by this cursor.
    #[must_use]
    pub const fn position(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_equality() {
        let h1 = ExprHandle::new(42);
        let h2 = ExprHandle::new(42);
        let h3 = ExprHandle::new(43);

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_handle_size() {
        assert_eq!(std::mem::size_of::<ExprHandle>(), 4);
        assert_eq!(std::mem::size_of::<PoolCursor>(), 4);
    }

    #[test]
    fn test_downstream() {
        let cursor = PoolCursor::new(10);
        assert!(!ExprHandle::new(9).is_downstream_of(cursor));
        assert!(ExprHandle::new(10).is_downstream_of(cursor));
        assert!(ExprHandle::new(11).is_downstream_of(cursor));
    }
}
