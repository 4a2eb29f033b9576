//! Property-based tests for the root scanner.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::scanner::RootScanner;

    proptest! {
        #[test]
        fn finds_root_of_affine_function(root in -9.5f64..9.5, slope in prop_oneof![-50.0f64..-0.1, 0.1f64..50.0]) {
            let f = |x: f64| slope * (x - root);
            let mut scanner = RootScanner::new(-10.0, 10.0);
            let found = scanner.next_root(f);
            prop_assert!((found.x - root).abs() < 1e-9, "{} vs {}", found.x, root);
            prop_assert!(scanner.next_root(f).is_undefined());
        }

        #[test]
        fn roots_are_increasing(a in -9.0f64..-1.0, b in 1.0f64..9.0) {
            let f = |x: f64| (x - a) * (x - b) * (x * x + 1.0);
            let mut scanner = RootScanner::new(-10.0, 10.0);
            let first = scanner.next_root(f).x;
            let second = scanner.next_root(f).x;
            prop_assert!(first < second);
            prop_assert!((first - a).abs() < 1e-9);
            prop_assert!((second - b).abs() < 1e-9);
        }
    }
}
