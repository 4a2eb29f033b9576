//! # aequa-linalg
//!
//! Linear algebra over symbolic expressions for the Aequa equation solver.
//!
//! Systems of linear equations are solved by bringing their augmented
//! matrix to reduced row echelon form. Entries may be any expression; the
//! elimination decides nullity through [`aequa_simplify::is_null`] and picks
//! undecidable pivots only when no known non-null one exists.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod symbolic_matrix;

pub use symbolic_matrix::SymbolicMatrix;
