//! Property-based tests for reduction.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use aequa_core::Context;

    use crate::{approximate, reduce, Approximation, ReductionContext};

    fn atom() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..10).prop_map(|n| n.to_string()),
            prop::sample::select(vec!["x", "y"]).prop_map(str::to_string),
        ]
    }

    fn polynomial() -> impl Strategy<Value = String> {
        atom().prop_recursive(3, 16, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a}+{b}")),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a})-({b})")),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a})*({b})")),
                (inner, 0u32..4).prop_map(|(a, n)| format!("({a})^{n}")),
            ]
        })
    }

    fn rational_function() -> impl Strategy<Value = String> {
        (polynomial(), polynomial()).prop_map(|(a, b)| format!("({a})/({b})"))
    }

    fn value_at(ctx: &Context, expr: aequa_core::ExprHandle) -> Option<f64> {
        let arena = ctx.arena();
        let mut bindings = Vec::new();
        if let Some(x) = arena.lookup_symbol("x") {
            bindings.push((x, 0.7));
        }
        if let Some(y) = arena.lookup_symbol("y") {
            bindings.push((y, -1.3));
        }
        match approximate(arena, expr, &ReductionContext::default(), &bindings) {
            Approximation::Value(z) if z.re.abs() < 1e6 => Some(z.re),
            _ => None,
        }
    }

    proptest! {
        #[test]
        fn reduce_is_idempotent(text in polynomial()) {
            let mut ctx = Context::new();
            let expr = ctx.parse(&text).unwrap();
            let reduction = ReductionContext::default();
            let once = reduce(&mut ctx, expr, &reduction);
            let twice = reduce(&mut ctx, once, &reduction);
            prop_assert_eq!(once, twice, "{}", text);
        }

        #[test]
        fn reduce_preserves_values(text in prop_oneof![polynomial(), rational_function()]) {
            let mut ctx = Context::new();
            let expr = ctx.parse(&text).unwrap();
            let reduced = reduce(&mut ctx, expr, &ReductionContext::default());
            if let (Some(before), Some(after)) = (value_at(&ctx, expr), value_at(&ctx, reduced)) {
                let tolerance = 1e-6 * before.abs().max(1.0);
                prop_assert!((before - after).abs() <= tolerance, "{}: {} vs {}", text, before, after);
            }
        }
    }
}
