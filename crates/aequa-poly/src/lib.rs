//! # aequa-poly
//!
//! Polynomial views of reduced expressions and their closed-form roots.
//!
//! - **Coefficients**: affine coefficients over a set of variables, and
//!   dense coefficients of a polynomial in one variable
//! - **Roots**: quadratic formula, and for cubics the rational root theorem,
//!   multiple-root formulas, Cardano's formula and a numeric fallback
//!
//! ## Example
//!
//! ```
//! use aequa_core::{serialize, Context};
//! use aequa_poly::{polynomial_reduced_coefficients, quadratic_roots};
//! use aequa_simplify::{reduce, ReductionContext, ReductionTarget};
//!
//! let mut ctx = Context::new();
//! let reduction = ReductionContext::default().with_target(ReductionTarget::SystemForAnalysis);
//! let expr = ctx.parse("x^2-5*x+6").unwrap();
//! let expr = reduce(&mut ctx, expr, &reduction);
//! let x = ctx.arena().lookup_symbol("x").unwrap();
//! let c = polynomial_reduced_coefficients(&mut ctx, expr, x, &reduction).unwrap();
//! let roots = quadratic_roots(&mut ctx, c[2], c[1], c[0], &reduction);
//! assert_eq!(serialize(ctx.arena(), roots.roots[0], 10), "2");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]

pub mod coefficients;
pub mod roots;

#[cfg(test)]
mod proptests;

pub use coefficients::{linear_coefficients, polynomial_reduced_coefficients, MAX_EXTRACTED_DEGREE};
pub use roots::{cubic_roots, is_nonreal_root, quadratic_roots, PolynomialRoots};
