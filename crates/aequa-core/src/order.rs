//! Canonical ordering of expressions.
//!
//! Reduced products list their factors by [`compare`]: numbers first, then
//! every other factor keyed by `(base, exponent)` so that `x` and `x^2` sit
//! next to each other. Reduced sums list their terms by [`compare_terms`]:
//! descending degree, then structure, with the constant term last.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

fn kind_rank(node: &ExprNode) -> u8 {
    match node {
        ExprNode::Number(_) => 0,
        ExprNode::Decimal(_) => 1,
        ExprNode::Constant(_) => 2,
        ExprNode::Symbol(_) => 3,
        ExprNode::Function { .. } => 4,
        ExprNode::Pow { .. } => 5,
        ExprNode::Mul(_) => 6,
        ExprNode::Add(_) => 7,
        ExprNode::Matrix { .. } => 8,
        ExprNode::Neg(_) => 9,
        ExprNode::Div { .. } => 10,
        ExprNode::Undefined => 11,
        ExprNode::Nonreal => 12,
    }
}

/// Splits a non-numeric node into `(base, exponent)`; `None` stands for 1.
fn as_power(node: &ExprNode, handle: ExprHandle) -> (ExprHandle, Option<ExprHandle>) {
    match node {
        ExprNode::Pow { base, exp } => (*base, Some(*exp)),
        _ => (handle, None),
    }
}

fn compare_exponents(arena: &ExprArena, a: Option<ExprHandle>, b: Option<ExprHandle>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(a), Some(b)) => compare(arena, a, b),
        (None, Some(exp)) => compare_with_one(arena, exp).reverse(),
        (Some(exp), None) => compare_with_one(arena, exp),
    }
}

fn compare_with_one(arena: &ExprArena, exp: ExprHandle) -> Ordering {
    match arena.get(exp) {
        ExprNode::Number(n) => n.cmp(&aequa_integers::Rational::from(1)),
        ExprNode::Decimal(bits) => f64::from_bits(*bits)
            .partial_cmp(&1.0)
            .unwrap_or(Ordering::Equal),
        // Numbers sort before everything else.
        _ => Ordering::Greater,
    }
}

fn compare_lists(arena: &ExprArena, a: &[ExprHandle], b: &[ExprHandle]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = compare(arena, *x, *y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Total canonical order on expressions.
#[must_use]
pub fn compare(arena: &ExprArena, a: ExprHandle, b: ExprHandle) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (na, nb) = (arena.get(a), arena.get(b));

    if !na.is_number() && !nb.is_number() {
        let (base_a, exp_a) = as_power(na, a);
        let (base_b, exp_b) = as_power(nb, b);
        if exp_a.is_some() || exp_b.is_some() {
            return compare(arena, base_a, base_b)
                .then_with(|| compare_exponents(arena, exp_a, exp_b))
                .then_with(|| a.index().cmp(&b.index()));
        }
    }

    let by_kind = kind_rank(na).cmp(&kind_rank(nb));
    if by_kind != Ordering::Equal {
        return by_kind;
    }

    let structural = match (na, nb) {
        (ExprNode::Number(x), ExprNode::Number(y)) => x.cmp(y),
        (ExprNode::Decimal(x), ExprNode::Decimal(y)) => f64::from_bits(*x)
            .partial_cmp(&f64::from_bits(*y))
            .unwrap_or(Ordering::Equal),
        (ExprNode::Constant(x), ExprNode::Constant(y)) => x.cmp(y),
        (ExprNode::Symbol(x), ExprNode::Symbol(y)) => arena
            .symbol_name(*x)
            .cmp(&arena.symbol_name(*y))
            .then_with(|| x.cmp(y)),
        (
            ExprNode::Function { func: f, arg: x },
            ExprNode::Function { func: g, arg: y },
        ) => f.cmp(g).then_with(|| compare(arena, *x, *y)),
        (ExprNode::Add(x), ExprNode::Add(y)) | (ExprNode::Mul(x), ExprNode::Mul(y)) => {
            compare_lists(arena, x, y)
        }
        (
            ExprNode::Matrix {
                rows: ra,
                cols: ca,
                entries: ea,
            },
            ExprNode::Matrix {
                rows: rb,
                cols: cb,
                entries: eb,
            },
        ) => ra
            .cmp(rb)
            .then_with(|| ca.cmp(cb))
            .then_with(|| compare_lists(arena, ea, eb)),
        _ => compare_lists(arena, &na.children(), &nb.children()),
    };
    structural.then_with(|| a.index().cmp(&b.index()))
}

/// Polynomial degree of a term in its symbols.
///
/// Only integer exponents contribute; anything else counts as degree zero.
#[must_use]
pub fn degree(arena: &ExprArena, handle: ExprHandle) -> i64 {
    match arena.get(handle) {
        ExprNode::Symbol(_) => 1,
        ExprNode::Pow { base, exp } => match arena.get(*exp).as_rational().and_then(|e| e.to_i64()) {
            Some(e) => degree(arena, *base).saturating_mul(e),
            None => 0,
        },
        ExprNode::Mul(factors) => factors.iter().map(|f| degree(arena, *f)).sum(),
        ExprNode::Add(terms) => terms.iter().map(|t| degree(arena, *t)).max().unwrap_or(0),
        _ => 0,
    }
}

/// The non-numeric factors of a term.
#[must_use]
pub fn term_body(arena: &ExprArena, handle: ExprHandle) -> SmallVec<[ExprHandle; 4]> {
    match arena.get(handle) {
        ExprNode::Mul(factors) => factors
            .iter()
            .copied()
            .filter(|f| !arena.get(*f).is_number())
            .collect(),
        node if node.is_number() => SmallVec::new(),
        _ => smallvec::smallvec![handle],
    }
}

/// Display order of the terms of a sum.
#[must_use]
pub fn compare_terms(arena: &ExprArena, a: ExprHandle, b: ExprHandle) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let a_is_number = arena.get(a).is_number();
    let b_is_number = arena.get(b).is_number();
    a_is_number
        .cmp(&b_is_number)
        .then_with(|| degree(arena, b).cmp(&degree(arena, a)))
        .then_with(|| compare_lists(arena, &term_body(arena, a), &term_body(arena, b)))
        .then_with(|| compare(arena, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_first() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let half = arena.rational(1, 2);
        assert_eq!(compare(&arena, two, x), Ordering::Less);
        assert_eq!(compare(&arena, half, two), Ordering::Less);
    }

    #[test]
    fn test_powers_sit_with_their_base() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let two = arena.integer(2);
        let x2 = arena.pow(x, two);
        assert_eq!(compare(&arena, x, x2), Ordering::Less);
        assert_eq!(compare(&arena, x2, y), Ordering::Less);
    }

    #[test]
    fn test_terms_by_degree() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let six = arena.integer(6);
        let x2 = arena.pow(x, two);
        let minus_five = arena.integer(-5);
        let linear = arena.mul(smallvec::smallvec![minus_five, x]);

        let mut terms = vec![six, linear, x2];
        terms.sort_by(|a, b| compare_terms(&arena, *a, *b));
        assert_eq!(terms, vec![x2, linear, six]);
    }

    #[test]
    fn test_symbols_by_name() {
        let mut arena = ExprArena::new();
        let y = arena.symbol("y");
        let x = arena.symbol("x");
        assert_eq!(compare_terms(&arena, x, y), Ordering::Less);
        assert_eq!(degree(&arena, x), 1);
    }
}
