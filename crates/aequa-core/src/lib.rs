//! # aequa-core
//!
//! Core expression engine for the Aequa equation solver.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Pool checkpoints, so that everything built during a solve can be freed
//!   at once
//! - A parser and a serializer for the infix equation syntax
//! - The canonical order used by reduced sums and products
//! - The evaluation [`Context`] and shared [`Preferences`]
//!
//! ## Design Principles
//!
//! - **Hash-Consing**: Every structurally unique expression stored exactly once
//! - **Zero-Cost Handles**: 32-bit indices instead of pointers
//! - **Monotonic Pool**: a handle's index tells whether it survives a truncation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod context;
pub mod expr;
pub mod handle;
pub mod order;
pub mod parse;
pub mod preferences;
pub mod serialize;

#[cfg(test)]
mod proptests;

pub use arena::ExprArena;
pub use context::Context;
pub use expr::{Constant, ExprNode, Function, SymbolId};
pub use handle::{ExprHandle, PoolCursor};
pub use parse::{parse_equation, parse_expression, Equation, ParseError};
pub use preferences::{AngleUnit, ComplexFormat, Preferences, SharedPreferences, UnitFormat};
pub use serialize::{format_decimal, serialize};

/// Maximal number of unknowns in a system.
pub const MAX_VARIABLES: usize = 6;

/// Maximal number of equations in a system.
pub const MAX_EQUATIONS: usize = 6;

/// Highest degree solved with a closed form.
pub const MAX_POLYNOMIAL_DEGREE: usize = 3;

/// Maximal number of roots reported by a numeric scan.
pub const MAX_APPROXIMATE_SOLUTIONS: usize = 10;

/// Capacity of a solution registry, one slot being reserved.
pub const MAX_SOLUTIONS: usize = max(
    max(MAX_VARIABLES, MAX_POLYNOMIAL_DEGREE + 1),
    MAX_APPROXIMATE_SOLUTIONS,
) + 1;

/// Maximal length of an identifier.
pub const MAX_NAME_LENGTH: usize = 7;

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}
