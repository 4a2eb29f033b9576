//! Quadratic and cubic equations in one unknown.

use aequa_core::{Context, ExprHandle, SharedPreferences, MAX_POLYNOMIAL_DEGREE};
use aequa_poly::{cubic_roots, polynomial_reduced_coefficients, quadratic_roots};
use aequa_simplify::approximate::{approximate, approximate_to_expression};
use aequa_simplify::ReductionTarget;
use log::debug;

use crate::config::SolverConfig;
use crate::error::{Outcome, SolveResult, SolverError};
use crate::solution::SolutionType;
use crate::system::{Attempt, SystemKind};

impl Attempt {
    /// Solves a single equation in a single unknown by the closed formulas.
    ///
    /// Registers the roots followed by the discriminant. Anything that is
    /// not a polynomial of degree 2 or 3 asks for numeric solving.
    pub(crate) fn solve_polynomial(
        &mut self,
        ctx: &mut Context,
        equation: ExprHandle,
        preferences: &SharedPreferences,
        config: &SolverConfig,
    ) -> SolveResult {
        let Some(&variable) = self.variables.as_slice().first() else {
            return Err(SolverError::NonLinearSystem);
        };
        let snapshot = preferences.snapshot();
        let analysis = self.reduction(&snapshot, ReductionTarget::SystemForAnalysis);
        let coefficients = polynomial_reduced_coefficients(ctx, equation, variable, &analysis);
        let degree = coefficients.as_ref().map_or(0, |c| c.len() - 1);
        let Some(c) = coefficients.filter(|_| (2..=MAX_POLYNOMIAL_DEGREE).contains(&degree)) else {
            debug!("no closed form, degree {degree}");
            return Ok(Outcome::RequireApproximateSolution);
        };
        self.kind = Some(SystemKind::PolynomialMonovariable { degree });

        let roots = if degree == 2 {
            quadratic_roots(ctx, c[2], c[1], c[0], &analysis)
        } else {
            cubic_roots(ctx, c[3], c[2], c[1], c[0], &analysis)
        };
        debug!("{} roots of a degree {degree} polynomial", roots.roots.len());

        let snapshot = preferences.snapshot();
        let user = self.reduction(&snapshot, ReductionTarget::User);
        let policy = Attempt::display_policy(&snapshot, config);
        let solution_type = if roots.approximate {
            SolutionType::Approximate
        } else {
            SolutionType::Exact
        };
        for root in roots.roots {
            self.solutions.register(ctx, root, solution_type, &user, policy)?;
        }
        let delta = if roots.approximate {
            let value = approximate(ctx.arena(), roots.delta, &user, &[]);
            approximate_to_expression(ctx.arena_mut(), value, user.complex_format)
        } else {
            roots.delta
        };
        self.solutions.register(ctx, delta, solution_type, &user, policy)?;
        Ok(Outcome::Solved)
    }
}
