//! Property-based tests for root finding.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use aequa_core::{Context, ExprHandle};
    use aequa_simplify::{reduce, ReductionContext, ReductionTarget};

    use crate::coefficients::polynomial_reduced_coefficients;
    use crate::roots::{cubic_roots, quadratic_roots};

    fn small_root() -> impl Strategy<Value = i64> {
        -9i64..=9
    }

    fn analysis() -> ReductionContext {
        ReductionContext::default().with_target(ReductionTarget::SystemForAnalysis)
    }

    // Expands prod(x - r) and extracts its coefficients.
    fn coefficients_of(ctx: &mut Context, roots: &[i64]) -> Vec<ExprHandle> {
        let text = roots
            .iter()
            .map(|r| format!("(x-({r}))"))
            .collect::<Vec<_>>()
            .join("*");
        let expr = ctx.parse(&text).unwrap();
        let expr = reduce(ctx, expr, &analysis());
        let x = ctx.arena().lookup_symbol("x").unwrap();
        polynomial_reduced_coefficients(ctx, expr, x, &analysis()).unwrap()
    }

    fn recovered(ctx: &Context, roots: &[ExprHandle]) -> Vec<i64> {
        roots
            .iter()
            .map(|r| ctx.arena().get(*r).as_rational().unwrap().to_i64().unwrap())
            .collect()
    }

    fn expected(mut roots: Vec<i64>) -> Vec<i64> {
        roots.sort_unstable();
        roots.dedup();
        roots
    }

    proptest! {
        #[test]
        fn quadratic_recovers_integer_roots(r1 in small_root(), r2 in small_root()) {
            let mut ctx = Context::new();
            let c = coefficients_of(&mut ctx, &[r1, r2]);
            prop_assert_eq!(c.len(), 3);
            let roots = quadratic_roots(&mut ctx, c[2], c[1], c[0], &analysis());
            prop_assert_eq!(recovered(&ctx, &roots.roots), expected(vec![r1, r2]));
        }

        #[test]
        fn cubic_recovers_integer_roots(r1 in small_root(), r2 in small_root(), r3 in small_root()) {
            let mut ctx = Context::new();
            let c = coefficients_of(&mut ctx, &[r1, r2, r3]);
            prop_assert_eq!(c.len(), 4);
            let roots = cubic_roots(&mut ctx, c[3], c[2], c[1], c[0], &analysis());
            prop_assert!(!roots.approximate);
            prop_assert_eq!(recovered(&ctx, &roots.roots), expected(vec![r1, r2, r3]));
        }
    }
}
