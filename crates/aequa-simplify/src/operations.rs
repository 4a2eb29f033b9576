//! Higher level operations used by the equation solver.

use aequa_core::preferences::DEFAULT_SIGNIFICANT_DIGITS;
use aequa_core::{serialize, Context, Equation, ExprHandle};
use log::{log_enabled, trace, Level};

use crate::approximate::{approximate, approximate_to_expression};
use crate::reduce::{reduce, Simplifier};
use crate::reduction::{ReductionContext, ReductionTarget};

/// Reduces `lhs - rhs` of an equation.
pub fn standard_form(ctx: &mut Context, equation: &Equation, reduction: &ReductionContext) -> ExprHandle {
    let difference = ctx.arena_mut().sub(equation.lhs, equation.rhs);
    let form = reduce(ctx, difference, reduction);
    if log_enabled!(Level::Trace) {
        trace!(
            "standard form {} for {:?}",
            serialize(ctx.arena(), form, DEFAULT_SIGNIFICANT_DIGITS),
            reduction.target
        );
    }
    form
}

/// Reduces `expr` for display and evaluates it.
///
/// Returns the exact form and the expression of its approximation.
pub fn simplify_and_approximate(
    ctx: &mut Context,
    expr: ExprHandle,
    reduction: &ReductionContext,
) -> (ExprHandle, ExprHandle) {
    let user = reduction.with_target(ReductionTarget::User);
    let exact = Simplifier::new(ctx, user).reduce(expr);
    let approximation = approximate(ctx.arena(), exact, &user, &[]);
    let approximate = approximate_to_expression(ctx.arena_mut(), approximation, user.complex_format);
    (exact, approximate)
}

/// Returns true if the displayed approximation equals the exact value.
///
/// The approximate text is parsed back, reading its decimals as exact
/// rationals, and compared with the exact form symbolically.
pub fn exact_and_approximate_are_equal(
    ctx: &mut Context,
    exact: ExprHandle,
    approximate_text: &str,
    reduction: &ReductionContext,
) -> bool {
    let Ok(parsed) = ctx.parse(approximate_text) else {
        return false;
    };
    let difference = ctx.arena_mut().sub(exact, parsed);
    let user = reduction.with_target(ReductionTarget::User);
    let reduced = reduce(ctx, difference, &user);
    ctx.arena().get(reduced).is_zero()
}
