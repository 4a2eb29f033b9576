//! # Aequa
//!
//! An equation solver over a small computer algebra core.
//!
//! Equations are parsed into a hash-consed expression pool, reduced to a
//! canonical form and classified:
//!
//! - **Linear systems** are solved exactly on their augmented matrix, with
//!   parametric solutions when underdetermined
//! - **Quadratic and cubic equations** are solved by closed formulas and
//!   report their discriminant
//! - **Other equations in one unknown** are solved numerically over a
//!   bounded interval
//!
//! ## Quick Start
//!
//! ```rust
//! use aequa::prelude::*;
//!
//! let mut ctx = Context::new();
//! let mut store = EquationStore::new();
//! store.add(&mut ctx, "x^2-5x+6=0").unwrap();
//!
//! let mut system = System::new(SharedPreferences::default());
//! system.exact_solve(&store, &mut ctx).unwrap();
//! let roots: Vec<f64> = system.solutions().iter().map(|s| s.value()).collect();
//! assert_eq!(roots, [2.0, 3.0, 1.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use aequa_core as core;
pub use aequa_integers as integers;
pub use aequa_linalg as linalg;
pub use aequa_numeric as numeric;
pub use aequa_poly as poly;
pub use aequa_simplify as simplify;
pub use aequa_solve as solve;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use aequa_core::{
        AngleUnit, ComplexFormat, Context, Equation, ExprArena, ExprHandle, ExprNode, Preferences,
        SharedPreferences,
    };
    pub use aequa_integers::{Integer, Rational};
    pub use aequa_simplify::{ReductionContext, ReductionTarget, Simplifier};
    pub use aequa_solve::{
        EquationStore, Outcome, Solution, SolutionType, SolverConfig, SolverError, System, SystemKind,
    };
}
