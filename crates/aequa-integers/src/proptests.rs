//! Property-based tests for arbitrary precision arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::{Integer, Rational};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn integer_distributive(a in small_int(), b in small_int(), c in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let c = Integer::new(c);
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn integer_gcd_divides(a in non_zero_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let g = a.gcd(&b);
            prop_assert!((a % g.clone()).is_zero());
            prop_assert!((b % g).is_zero());
        }

        #[test]
        fn nth_root_floor_brackets(a in 0i64..1_000_000, n in 2u32..5) {
            let a = Integer::new(a);
            let r = a.nth_root_floor(n);
            prop_assert!(r.pow(n) <= a);
            prop_assert!((r + Integer::one()).pow(n) > a);
        }

        #[test]
        fn split_perfect_power_recombines(a in 1i64..100_000, n in 2u32..4) {
            let a = Integer::new(a);
            let (outside, inside) = a.split_perfect_power(n);
            prop_assert_eq!(outside.pow(n) * inside.clone(), a);
            // Nothing left inside is itself a perfect power.
            prop_assert!(inside.is_one() || inside.exact_nth_root(n).is_none());
        }

        #[test]
        fn divisors_divide(a in non_zero_int()) {
            let a = Integer::new(a);
            let divisors = a.divisors().unwrap();
            prop_assert_eq!(divisors.first().copied(), Some(1));
            prop_assert_eq!(divisors.last().copied(), a.abs().to_u64());
            for d in divisors {
                prop_assert!((a.clone() % Integer::from(d)).is_zero());
            }
        }

        #[test]
        fn rational_add_inverse(a in small_int(), b in non_zero_int()) {
            let q = Rational::from_i64(a, b);
            prop_assert!((q.clone() + (-q)).is_zero());
        }

        #[test]
        fn rational_mul_inverse(a in non_zero_int(), b in non_zero_int()) {
            let q = Rational::from_i64(a, b);
            prop_assert!((q.clone() * q.recip()).is_one());
        }

        #[test]
        fn rational_powi_matches_repeated_product(a in non_zero_int(), b in non_zero_int(), e in -4i64..5) {
            let q = Rational::from_i64(a, b);
            let mut expected = Rational::one();
            for _ in 0..e.unsigned_abs() {
                expected = expected * q.clone();
            }
            if e < 0 {
                expected = expected.recip();
            }
            prop_assert_eq!(q.powi(e), Some(expected));
        }

        #[test]
        fn decimal_text_round_trips(whole in 0i64..100_000, cents in 0i64..100) {
            let text = format!("{whole}.{cents:02}");
            let parsed = Rational::from_decimal_str(&text).unwrap();
            prop_assert_eq!(parsed, Rational::from_i64(whole * 100 + cents, 100));
        }
    }
}
