//! Solver errors and outcomes.

use thiserror::Error;

/// Why a system could not be solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolverError {
    /// An equation reduces to an undefined value or contains a matrix.
    #[error("an equation is undefined")]
    EquationUndefined,
    /// An equation has no real value in the real complex format.
    #[error("an equation is not real")]
    EquationNonreal,
    /// The equations mention more unknowns than the solver handles.
    #[error("too many variables")]
    TooManyVariables,
    /// Several equations or unknowns, and at least one equation is not
    /// linear.
    #[error("the system is not linear")]
    NonLinearSystem,
    /// Numeric solving was requested for a system that is not a single
    /// general equation in one unknown.
    #[error("the system cannot be solved numerically")]
    ApproximationUnavailable,
}

/// What a successful exact solve concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Solutions, possibly none, have been registered.
    Solved,
    /// No closed form exists; numeric solving should follow.
    RequireApproximateSolution,
}

/// Result of an exact solve.
pub type SolveResult = Result<Outcome, SolverError>;
