//! # aequa-numeric
//!
//! Numeric root search over a bounded interval.
//!
//! [`RootScanner`] walks an interval from left to right and returns the roots
//! of a real function one at a time:
//!
//! - **Sign changes** between two samples are refined with Brent's method;
//!   a refined point whose residual is larger than the bracketing samples
//!   is a pole and is skipped
//! - **Even-multiplicity roots** show up as local minima of `|f|` and are
//!   located by golden-section search
//!
//! ## Example
//!
//! ```
//! use aequa_numeric::RootScanner;
//!
//! let mut scanner = RootScanner::new(-10.0, 10.0);
//! let root = scanner.next_root(|x| x.cos() - x);
//! assert!((root.x - 0.739_085_133_215_160_6).abs() < 1e-10);
//! assert!(scanner.next_root(|x| x.cos() - x).x.is_nan());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod refine;
pub mod scanner;

#[cfg(test)]
mod proptests;

pub use refine::{brent, golden_section_minimum};
pub use scanner::{Coordinate2D, RootScanner, ScannerConfig};
