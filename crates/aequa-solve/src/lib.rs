//! # aequa-solve
//!
//! Classification and solving of systems of equations.
//!
//! A [`System`] reads the equations of an [`EquationStore`] and recognises
//! one of three kinds:
//!
//! - **Linear** systems of up to six equations in up to six unknowns,
//!   solved exactly; underdetermined systems get parametric solutions
//! - **Polynomial** equations of degree 2 or 3 in one unknown, solved by the
//!   closed formulas together with their discriminant
//! - **General** equations in one unknown, solved numerically over an
//!   interval by [`System::approximate_solve`]
//!
//! Symbols the user has defined are first replaced by their values. If that
//! leaves no solution, the system is solved again with those symbols as
//! unknowns.
//!
//! ## Example
//!
//! ```
//! use aequa_core::{Context, SharedPreferences};
//! use aequa_solve::{EquationStore, Outcome, System};
//!
//! let mut ctx = Context::new();
//! let mut store = EquationStore::new();
//! store.add(&mut ctx, "x+y=2").unwrap();
//! store.add(&mut ctx, "x-y=0").unwrap();
//!
//! let mut system = System::new(SharedPreferences::default());
//! assert_eq!(system.exact_solve(&store, &mut ctx), Ok(Outcome::Solved));
//! let values: Vec<f64> = system.solutions().iter().map(|s| s.value()).collect();
//! assert_eq!(values, [1.0, 1.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod approximate;
pub mod config;
pub mod error;
mod linear;
mod polynomial;
pub mod solution;
pub mod store;
pub mod system;

#[cfg(test)]
mod proptests;

pub use config::SolverConfig;
pub use error::{Outcome, SolveResult, SolverError};
pub use solution::{DisplayPolicy, Layout, Solution, SolutionRegistry, SolutionType};
pub use store::{EquationStore, StoreError, StoredEquation};
pub use system::{Interval, System, SystemKind};
