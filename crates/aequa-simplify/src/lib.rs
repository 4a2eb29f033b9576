//! # aequa-simplify
//!
//! Canonical simplification and numeric approximation of expressions.
//!
//! Reduction is a single bottom-up pass with memoization: every node is
//! rebuilt through canonical constructors that collect like terms, merge
//! powers of equal bases, extract perfect powers from radicals and, unless
//! asked not to, multiply out products of sums. The same reduced form serves
//! coefficient extraction, display and evaluation.
//!
//! ## Example
//!
//! ```
//! use aequa_core::{serialize, Context};
//! use aequa_simplify::{reduce, ReductionContext};
//!
//! let mut ctx = Context::new();
//! let expr = ctx.parse("(x+1)*(x-1)+1").unwrap();
//! let reduced = reduce(&mut ctx, expr, &ReductionContext::default());
//! assert_eq!(serialize(ctx.arena(), reduced, 10), "x^2");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod approximate;
mod functions;
pub mod operations;
pub mod reduce;
pub mod reduction;
pub mod variables;

#[cfg(test)]
mod proptests;

pub use analysis::{
    contains_decimal, contains_matrix, contains_symbol, is_null, updated_complex_format,
    TrinaryBoolean,
};
pub use approximate::{
    approximate, approximate_at, approximate_to_expression, evaluate_function, Approximation,
};
pub use operations::{exact_and_approximate_are_equal, simplify_and_approximate, standard_form};
pub use reduce::{reduce, Simplifier, SimplifierConfig};
pub use reduction::{ReductionContext, ReductionTarget, SymbolicComputation};
pub use variables::{collect_variables, CapacityExceeded, VariableSet};
