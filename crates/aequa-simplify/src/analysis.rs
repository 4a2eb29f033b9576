//! Structural queries on reduced expressions.

use aequa_core::{ComplexFormat, Constant, ExprArena, ExprHandle, ExprNode};

use crate::approximate::{approximate, Approximation};
use crate::reduction::ReductionContext;

/// Absolute size under which a symbol-free value is considered null.
pub const NULL_TOLERANCE: f64 = 1e-12;

/// A boolean that may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrinaryBoolean {
    /// Known to hold.
    True,
    /// Known not to hold.
    False,
    /// Cannot be decided.
    Unknown,
}

impl From<bool> for TrinaryBoolean {
    fn from(value: bool) -> Self {
        if value {
            TrinaryBoolean::True
        } else {
            TrinaryBoolean::False
        }
    }
}

/// Returns true if some node of `expr` satisfies `predicate`.
pub fn contains(arena: &ExprArena, expr: ExprHandle, predicate: &impl Fn(&ExprNode) -> bool) -> bool {
    let node = arena.get(expr);
    predicate(node) || node.children().iter().any(|c| contains(arena, *c, predicate))
}

/// Returns true if `expr` contains a matrix.
#[must_use]
pub fn contains_matrix(arena: &ExprArena, expr: ExprHandle) -> bool {
    contains(arena, expr, &|node| matches!(node, ExprNode::Matrix { .. }))
}

/// Returns true if `expr` contains an approximate number.
#[must_use]
pub fn contains_decimal(arena: &ExprArena, expr: ExprHandle) -> bool {
    contains(arena, expr, &|node| matches!(node, ExprNode::Decimal(_)))
}

/// Returns true if `expr` contains a symbol.
#[must_use]
pub fn contains_symbol(arena: &ExprArena, expr: ExprHandle) -> bool {
    contains(arena, expr, &|node| matches!(node, ExprNode::Symbol(_)))
}

/// Switches the real format to cartesian when `expr` mentions `i`.
#[must_use]
pub fn updated_complex_format(format: ComplexFormat, arena: &ExprArena, expr: ExprHandle) -> ComplexFormat {
    if format == ComplexFormat::Real
        && contains(arena, expr, &|node| matches!(node, ExprNode::Constant(Constant::I)))
    {
        ComplexFormat::Cartesian
    } else {
        format
    }
}

/// Decides whether a reduced expression is zero.
///
/// Literals are decided exactly. Other symbol-free expressions are decided
/// numerically when they are clearly away from zero; everything else is
/// unknown.
#[must_use]
pub fn is_null(arena: &ExprArena, expr: ExprHandle, reduction: &ReductionContext) -> TrinaryBoolean {
    match arena.get(expr) {
        ExprNode::Number(value) => TrinaryBoolean::from(num_traits::Zero::is_zero(value)),
        ExprNode::Decimal(bits) => TrinaryBoolean::from(f64::from_bits(*bits) == 0.0),
        ExprNode::Constant(_) => TrinaryBoolean::False,
        ExprNode::Undefined | ExprNode::Nonreal | ExprNode::Matrix { .. } => TrinaryBoolean::Unknown,
        _ if contains_symbol(arena, expr) => TrinaryBoolean::Unknown,
        _ => match approximate(arena, expr, reduction, &[]) {
            Approximation::Value(z) if z.norm() > NULL_TOLERANCE => TrinaryBoolean::False,
            _ => TrinaryBoolean::Unknown,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aequa_core::Context;

    #[test]
    fn test_is_null() {
        let mut ctx = Context::new();
        let reduction = ReductionContext::default();
        let zero = ctx.arena_mut().integer(0);
        let two = ctx.arena_mut().integer(2);
        let root = ctx.parse("√(2)-1").unwrap();
        let x = ctx.parse("x").unwrap();
        let arena = ctx.arena();
        assert_eq!(is_null(arena, zero, &reduction), TrinaryBoolean::True);
        assert_eq!(is_null(arena, two, &reduction), TrinaryBoolean::False);
        assert_eq!(is_null(arena, root, &reduction), TrinaryBoolean::False);
        assert_eq!(is_null(arena, x, &reduction), TrinaryBoolean::Unknown);
    }

    #[test]
    fn test_containment() {
        let mut ctx = Context::new();
        let expr = ctx.parse("[[1,x],[0,2]]+y").unwrap();
        let arena = ctx.arena();
        assert!(contains_matrix(arena, expr));
        assert!(contains_symbol(arena, expr));
        assert!(!contains_decimal(arena, expr));
    }

    #[test]
    fn test_updated_complex_format() {
        let mut ctx = Context::new();
        let complex = ctx.parse("x^2+i").unwrap();
        let real = ctx.parse("x^2+1").unwrap();
        let arena = ctx.arena();
        assert_eq!(updated_complex_format(ComplexFormat::Real, arena, complex), ComplexFormat::Cartesian);
        assert_eq!(updated_complex_format(ComplexFormat::Real, arena, real), ComplexFormat::Real);
        assert_eq!(updated_complex_format(ComplexFormat::Polar, arena, complex), ComplexFormat::Polar);
    }
}
