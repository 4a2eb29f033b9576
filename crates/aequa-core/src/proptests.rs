//! Property-based tests for parsing and serialization.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{format_decimal, parse_expression, serialize, ExprArena};

    fn atom() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..100).prop_map(|n| n.to_string()),
            prop::sample::select(vec!["x", "y", "t1", "pi", "e"]).prop_map(str::to_string),
        ]
    }

    fn expression() -> impl Strategy<Value = String> {
        atom().prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a}+{b}")),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a})-({b})")),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a})*({b})")),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a})/({b})")),
                (inner.clone(), 0u32..4).prop_map(|(a, n)| format!("({a})^{n}")),
                inner.clone().prop_map(|a| format!("sin({a})")),
                inner.prop_map(|a| format!("sqrt({a})")),
            ]
        })
    }

    proptest! {
        #[test]
        fn serialized_text_parses(text in expression()) {
            let mut arena = ExprArena::new();
            let parsed = parse_expression(&mut arena, &text).unwrap();
            let printed = serialize(&arena, parsed, 10);
            prop_assert!(parse_expression(&mut arena, &printed).is_ok(), "{} printed as {}", text, printed);
        }

        #[test]
        fn decimal_text_keeps_requested_precision(value in -1.0e6f64..1.0e6, digits in 3usize..15) {
            let text = format_decimal(value, digits);
            let read: f64 = text.replace('E', "e").parse().unwrap();
            let tolerance = value.abs() * 10f64.powi(1 - i32::try_from(digits).unwrap()) + 1e-300;
            prop_assert!((read - value).abs() <= tolerance, "{} printed as {}", value, text);
        }
    }
}
