//! Coefficient extraction from reduced standard forms.
//!
//! Both extractors expect an expression reduced for analysis, that is an
//! expanded sum of products in which every variable appears at most once
//! per term.

use aequa_core::{Context, ExprArena, ExprHandle, ExprNode, SymbolId};
use aequa_simplify::analysis::contains;
use aequa_simplify::{is_null, ReductionContext, Simplifier, TrinaryBoolean};
use smallvec::SmallVec;

type Operands = SmallVec<[ExprHandle; 4]>;

/// Highest degree an extracted polynomial may have.
pub const MAX_EXTRACTED_DEGREE: usize = 64;

fn terms_of(arena: &ExprArena, expr: ExprHandle) -> Operands {
    match arena.get(expr) {
        ExprNode::Add(terms) => terms.clone(),
        _ => smallvec::smallvec![expr],
    }
}

fn factors_of(arena: &ExprArena, term: ExprHandle) -> Operands {
    match arena.get(term) {
        ExprNode::Mul(factors) => factors.clone(),
        _ => smallvec::smallvec![term],
    }
}

fn depends_on(arena: &ExprArena, expr: ExprHandle, variables: &[SymbolId]) -> bool {
    contains(arena, expr, &|node| {
        matches!(node, ExprNode::Symbol(id) if variables.contains(id))
    })
}

/// Splits `expr` as `sum(coefficients[i] * variables[i]) + constant`.
///
/// Returns `None` when `expr` is not affine in the variables: a variable
/// appears under a power, a function, or multiplied by another variable.
pub fn linear_coefficients(
    ctx: &mut Context,
    expr: ExprHandle,
    variables: &[SymbolId],
    reduction: &ReductionContext,
) -> Option<(Vec<ExprHandle>, ExprHandle)> {
    let arena = ctx.arena();
    let mut split: Vec<(Option<usize>, Operands)> = Vec::new();
    for term in terms_of(arena, expr) {
        let mut slot = None;
        let mut rest = Operands::new();
        for factor in factors_of(arena, term) {
            if !depends_on(arena, factor, variables) {
                rest.push(factor);
                continue;
            }
            match (slot, arena.get(factor)) {
                (None, ExprNode::Symbol(id)) => slot = variables.iter().position(|v| v == id),
                _ => return None,
            }
        }
        split.push((slot, rest));
    }

    let mut simplifier = Simplifier::new(ctx, *reduction);
    let mut coefficient_terms = vec![Operands::new(); variables.len()];
    let mut constant_terms = Operands::new();
    for (slot, rest) in split {
        let product = simplifier.mul(&rest);
        match slot {
            Some(i) => coefficient_terms[i].push(product),
            None => constant_terms.push(product),
        }
    }
    let coefficients = coefficient_terms.iter().map(|terms| simplifier.add(terms)).collect();
    let constant = simplifier.add(&constant_terms);
    Some((coefficients, constant))
}

/// Power of `variable` carried by a factor, if the factor is one.
fn variable_power(arena: &ExprArena, factor: ExprHandle, variable: SymbolId) -> Option<usize> {
    match arena.get(factor) {
        ExprNode::Symbol(id) if *id == variable => Some(1),
        ExprNode::Pow { base, exp } if matches!(arena.get(*base), ExprNode::Symbol(id) if *id == variable) => {
            let exponent = arena.get(*exp).as_rational()?.to_i64()?;
            usize::try_from(exponent).ok().filter(|e| *e > 0)
        }
        _ => None,
    }
}

/// Coefficients of `expr` as a polynomial in `variable`, constant first.
///
/// Trailing null coefficients are dropped, so the last one is the leading
/// coefficient (the null polynomial yields `[0]`). Returns `None` when
/// `expr` is not a polynomial in `variable` of degree at most
/// [`MAX_EXTRACTED_DEGREE`].
pub fn polynomial_reduced_coefficients(
    ctx: &mut Context,
    expr: ExprHandle,
    variable: SymbolId,
    reduction: &ReductionContext,
) -> Option<Vec<ExprHandle>> {
    let arena = ctx.arena();
    let variables = [variable];
    let mut split: Vec<(usize, Operands)> = Vec::new();
    for term in terms_of(arena, expr) {
        let mut degree = 0;
        let mut rest = Operands::new();
        for factor in factors_of(arena, term) {
            if !depends_on(arena, factor, &variables) {
                rest.push(factor);
                continue;
            }
            degree += variable_power(arena, factor, variable)?;
        }
        if degree > MAX_EXTRACTED_DEGREE {
            return None;
        }
        split.push((degree, rest));
    }

    let top = split.iter().map(|(degree, _)| *degree).max().unwrap_or(0);
    let mut simplifier = Simplifier::new(ctx, *reduction);
    let mut grouped = vec![Operands::new(); top + 1];
    for (degree, rest) in split {
        let product = simplifier.mul(&rest);
        grouped[degree].push(product);
    }
    let mut coefficients: Vec<ExprHandle> = grouped.iter().map(|terms| simplifier.add(terms)).collect();
    while coefficients.len() > 1
        && coefficients
            .last()
            .is_some_and(|c| is_null(simplifier.arena(), *c, reduction) == TrinaryBoolean::True)
    {
        coefficients.pop();
    }
    Some(coefficients)
}
