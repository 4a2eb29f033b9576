//! Linear systems, solved on the augmented matrix `(A|b)`.

use aequa_core::{Context, ExprHandle, SharedPreferences};
use aequa_linalg::SymbolicMatrix;
use aequa_poly::linear_coefficients;
use aequa_simplify::{is_null, ReductionTarget, SymbolicComputation, TrinaryBoolean};
use log::debug;

use crate::config::SolverConfig;
use crate::error::{Outcome, SolveResult, SolverError};
use crate::solution::SolutionType;
use crate::system::{Attempt, SystemKind};

/// Name of the `k`-th parameter (from 1) when `count` are needed.
fn parameter_name(k: usize, count: usize) -> String {
    if count == 1 {
        "t".to_string()
    } else {
        format!("t{k}")
    }
}

impl Attempt {
    /// Solves the simplified equations as a linear system.
    ///
    /// Underdetermined systems get their free unknowns pinned to parameters
    /// and yield formal solutions. An inconsistent system is solved with no
    /// solution.
    pub(crate) fn solve_linear_system(
        &mut self,
        ctx: &mut Context,
        equations: &[ExprHandle],
        preferences: &SharedPreferences,
        config: &SolverConfig,
    ) -> SolveResult {
        let snapshot = preferences.snapshot();
        let analysis = self.reduction(&snapshot, ReductionTarget::SystemForAnalysis);
        let variables = self.variables.as_slice().to_vec();
        let n = variables.len();

        let mut rows = Vec::with_capacity(equations.len());
        for equation in equations {
            let (mut row, constant) =
                linear_coefficients(ctx, *equation, &variables, &analysis).ok_or(SolverError::NonLinearSystem)?;
            row.push(ctx.arena_mut().neg(constant));
            rows.push(row);
        }
        self.kind = Some(SystemKind::Linear);
        self.has_more_solutions = false;

        let mut ab = SymbolicMatrix::from_rows(rows);
        let approximation = self.reduction(&snapshot, ReductionTarget::SystemForApproximation);
        let mut rank = ab.rank(ctx, &approximation).ok_or(SolverError::EquationUndefined)?;

        // A row reading `0 = b` with b not null.
        for row in (0..ab.num_rows()).rev() {
            let entries = ab.row(row);
            let arena = ctx.arena();
            let coefficients_null = entries[..n]
                .iter()
                .all(|e| is_null(arena, *e, &approximation) == TrinaryBoolean::True);
            if coefficients_null && is_null(arena, entries[n], &approximation) != TrinaryBoolean::True {
                debug!("inconsistent linear system");
                return Ok(Outcome::Solved);
            }
        }

        let snapshot = preferences.snapshot();
        let policy = Attempt::display_policy(&snapshot, config);
        if rank == n && n > 0 {
            let user = self.reduction(&snapshot, ReductionTarget::User);
            for i in 0..n {
                self.solutions
                    .register(ctx, ab[(i, n)], SolutionType::Exact, &user, policy)?;
            }
            return Ok(Outcome::Solved);
        }

        self.has_more_solutions = true;
        // Parameters are plain symbols, even if the user gave them a value.
        let parametric = self
            .reduction(&snapshot, ReductionTarget::SystemForAnalysis)
            .with_symbolic_computation(SymbolicComputation::KeepAllSymbols);
        let count = n - rank;
        let mut k = 0;
        while rank < n {
            let pivots = ab.pivot_columns(ctx.arena(), &parametric);
            let Some(free) = (0..n).rev().find(|col| !pivots.contains(col)) else {
                return Err(SolverError::EquationUndefined);
            };
            k += 1;
            let name = parameter_name(k, count);
            debug!("pinning unknown {free} to {name}");

            let arena = ctx.arena_mut();
            let zero = arena.integer(0);
            let one = arena.integer(1);
            let mut row = vec![zero; n + 1];
            row[free] = one;
            row[n] = arena.symbol(&name);
            ab.push_row(&row);

            let next = ab.rank(ctx, &parametric).ok_or(SolverError::EquationUndefined)?;
            if next <= rank {
                return Err(SolverError::EquationUndefined);
            }
            rank = next;
        }

        let formal = self
            .reduction(&snapshot, ReductionTarget::User)
            .with_symbolic_computation(SymbolicComputation::KeepAllSymbols);
        for i in 0..n {
            self.solutions
                .register(ctx, ab[(i, n)], SolutionType::Formal, &formal, policy)?;
        }
        Ok(Outcome::Solved)
    }
}
