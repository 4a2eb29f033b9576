//! # aequa-integers
//!
//! Arbitrary precision integer and rational arithmetic for the Aequa
//! equation solver.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`) with radical extraction and
//!   divisor enumeration
//! - Arbitrary precision rationals (`Rational`) with exact decimal parsing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integer;
pub mod rational;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use rational::Rational;
