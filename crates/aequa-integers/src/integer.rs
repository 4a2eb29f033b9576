//! Arbitrary precision integers.
//!
//! This module wraps `dashu::IBig` with the handful of number-theoretic
//! helpers the simplifier needs: radical extraction, integer roots and
//! divisor enumeration for rational root search.

use dashu::base::{Abs, BitTest, Gcd, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Trial division bound used when splitting off perfect powers.
const TRIAL_DIVISION_LIMIT: u64 = 10_000;

/// Largest magnitude for which divisors are enumerated.
const DIVISOR_ENUMERATION_LIMIT: u64 = 1_000_000_000_000;

/// An arbitrary precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Parses an integer written in the given base.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid integer.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, dashu::base::error::ParseError> {
        IBig::from_str_radix(s, radix).map(Self)
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(&self.0)
    }

    /// Returns true if this integer is odd.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        !(self.clone() % Self::new(2)).is_zero()
    }

    /// Computes the greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Computes the least common multiple.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        Self(&self.0 / &g.0 * &other.0).abs()
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Attempts to convert to an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Attempts to convert to a u64.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.0.clone().try_into().ok()
    }

    /// Nearest double precision value (infinite when out of range).
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    /// Computes self^exp for non-negative exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }

    /// Floor of the n-th root of a non-negative integer.
    ///
    /// # Panics
    ///
    /// Panics if `self` is negative or `n` is zero.
    #[must_use]
    pub fn nth_root_floor(&self, n: u32) -> Self {
        assert!(!self.is_negative(), "root of a negative integer");
        assert!(n > 0, "zeroth root");
        if self.is_zero() || n == 1 {
            return self.clone();
        }
        // The root has at most ceil(bits / n) bits.
        let bits = self.0.bit_len();
        let mut low = Self::zero();
        let mut high = Self(IBig::ONE << (bits / n as usize + 1));
        while &high - &low > Self::one() {
            let mid = Self((&low.0 + &high.0) >> 1);
            if mid.pow(n) <= *self {
                low = mid;
            } else {
                high = mid;
            }
        }
        low
    }

    /// Returns `Some(r)` when `self == r^n` for a non-negative integer `r`.
    #[must_use]
    pub fn exact_nth_root(&self, n: u32) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        let root = self.nth_root_floor(n);
        (root.pow(n) == *self).then_some(root)
    }

    /// Splits a positive integer into `(a, b)` with `self = a^n * b`.
    ///
    /// Small prime powers are removed by trial division; the cofactor is
    /// absorbed entirely when it is itself a perfect n-th power.
    #[must_use]
    pub fn split_perfect_power(&self, n: u32) -> (Self, Self) {
        let mut outside = Self::one();
        let mut inside = self.abs();
        if inside.is_zero() || n < 2 {
            return (outside, inside);
        }
        let mut p: u64 = 2;
        while p <= TRIAL_DIVISION_LIMIT {
            let prime = Self::from(p);
            if prime.pow(n) > inside {
                break;
            }
            let prime_power = prime.pow(n);
            while (inside.clone() % prime_power.clone()).is_zero() {
                inside = inside / prime_power.clone();
                outside = outside * prime.clone();
            }
            p += if p == 2 { 1 } else { 2 };
        }
        if let Some(root) = inside.exact_nth_root(n) {
            outside = outside * root;
            inside = Self::one();
        }
        (outside, inside)
    }

    /// Positive divisors of `|self|` in increasing order.
    ///
    /// Returns `None` when the magnitude is too large to enumerate.
    #[must_use]
    pub fn divisors(&self) -> Option<Vec<u64>> {
        let n = self.abs().to_u64()?;
        if n == 0 || n > DIVISOR_ENUMERATION_LIMIT {
            return None;
        }
        let mut small = Vec::new();
        let mut large = Vec::new();
        let mut d = 1u64;
        while d * d <= n {
            if n % d == 0 {
                small.push(d);
                if d != n / d {
                    large.push(n / d);
                }
            }
            d += 1;
        }
        small.extend(large.into_iter().rev());
        Some(small)
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Integer {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add for &Integer {
    type Output = Integer;

    fn add(self, rhs: Self) -> Self::Output {
        Integer(&self.0 + &rhs.0)
    }
}

impl Sub for Integer {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub for &Integer {
    type Output = Integer;

    fn sub(self, rhs: Self) -> Self::Output {
        Integer(&self.0 - &rhs.0)
    }
}

impl Mul for Integer {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul for &Integer {
    type Output = Integer;

    fn mul(self, rhs: Self) -> Self::Output {
        Integer(&self.0 * &rhs.0)
    }
}

impl Div for Integer {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self(self.0 / rhs.0)
    }
}

impl Rem for Integer {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self::Output {
        Self(self.0 % rhs.0)
    }
}

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        Integer(-&self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}
