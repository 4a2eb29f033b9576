//! Closed-form roots of quadratic and cubic polynomials.
//!
//! Roots are built as expressions through a [`Simplifier`], so that they come
//! out reduced. Cubics try, in order: a null constant term, a rational root
//! found by the rational root theorem, the multiple-root formulas when the
//! discriminant is null, Cardano's formula, and finally a numeric method when
//! the exact route would only produce unreadable nested radicals.

use std::cmp::Ordering;
use std::f64::consts::PI;

use aequa_core::{ComplexFormat, Context, ExprHandle, ExprNode, Function};
use aequa_integers::{Integer, Rational};
use aequa_simplify::approximate::{approximate, approximate_to_expression, is_negligible, Approximation};
use aequa_simplify::{is_null, ReductionContext, Simplifier, TrinaryBoolean};
use log::debug;
use num_complex::Complex64;
use num_traits::{One, Zero};
use smallvec::SmallVec;

/// Roots of a polynomial together with its discriminant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialRoots {
    /// Distinct roots, in ascending order when they are all real.
    pub roots: SmallVec<[ExprHandle; 3]>,
    /// The discriminant.
    pub delta: ExprHandle,
    /// True when the roots are numeric approximations.
    pub approximate: bool,
}

/// Thin arithmetic layer over a simplifier.
struct Algebra<'a> {
    s: Simplifier<'a>,
}

impl<'a> Algebra<'a> {
    fn new(ctx: &'a mut Context, reduction: &ReductionContext) -> Self {
        Self {
            s: Simplifier::new(ctx, *reduction),
        }
    }

    fn int(&mut self, n: i64) -> ExprHandle {
        self.s.arena_mut().integer(n)
    }

    fn number(&mut self, value: Rational) -> ExprHandle {
        self.s.arena_mut().number(value)
    }

    fn add(&mut self, terms: &[ExprHandle]) -> ExprHandle {
        self.s.add(terms)
    }

    fn mul(&mut self, factors: &[ExprHandle]) -> ExprHandle {
        self.s.mul(factors)
    }

    fn neg(&mut self, x: ExprHandle) -> ExprHandle {
        let minus_one = self.int(-1);
        self.s.mul(&[minus_one, x])
    }

    fn sub(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let minus_b = self.neg(b);
        self.s.add(&[a, minus_b])
    }

    fn div(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let minus_one = self.int(-1);
        let inverse = self.s.pow(b, minus_one);
        self.s.mul(&[a, inverse])
    }

    fn sqrt(&mut self, x: ExprHandle) -> ExprHandle {
        let half = self.s.arena_mut().rational(1, 2);
        self.s.pow(x, half)
    }

    fn cbrt(&mut self, x: ExprHandle) -> ExprHandle {
        self.s.apply(Function::Cbrt, x)
    }

    /// `k * prod(h^e)`.
    fn monomial(&mut self, k: i64, factors: &[(ExprHandle, i64)]) -> ExprHandle {
        let mut operands: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        operands.push(self.int(k));
        for &(h, e) in factors {
            let exp = self.int(e);
            operands.push(self.s.pow(h, exp));
        }
        self.s.mul(&operands)
    }

    fn null(&self, x: ExprHandle) -> TrinaryBoolean {
        is_null(self.s.arena(), x, self.s.reduction())
    }

    /// Complex value of a symbol-free expression.
    fn value(&self, x: ExprHandle) -> Option<Complex64> {
        let cartesian = self.s.reduction().with_complex_format(ComplexFormat::Cartesian);
        match approximate(self.s.arena(), x, &cartesian, &[]) {
            Approximation::Value(z) => Some(z),
            _ => None,
        }
    }

    fn rational(&self, x: ExprHandle) -> Option<Rational> {
        self.s.arena().get(x).as_rational().cloned()
    }

    fn is_real_format(&self) -> bool {
        self.s.reduction().complex_format == ComplexFormat::Real
    }

    fn nonreal(&mut self) -> ExprHandle {
        self.s.arena_mut().nonreal()
    }

    /// Expression for a numeric root.
    fn numeric(&mut self, z: Complex64) -> ExprHandle {
        let re = if is_negligible(z.re, z.im) { 0.0 } else { z.re };
        if is_negligible(z.im, z.re) {
            return self.s.arena_mut().decimal(re);
        }
        if self.is_real_format() {
            return self.nonreal();
        }
        let format = self.s.reduction().complex_format;
        approximate_to_expression(self.s.arena_mut(), Approximation::Value(Complex64::new(re, z.im)), format)
    }

    fn quadratic(&mut self, a: ExprHandle, b: ExprHandle, c: ExprHandle) -> (ExprHandle, SmallVec<[ExprHandle; 3]>) {
        let b2 = self.monomial(1, &[(b, 2)]);
        let ac4 = self.monomial(-4, &[(a, 1), (c, 1)]);
        let delta = self.add(&[b2, ac4]);
        let minus_b = self.neg(b);
        let two_a = self.monomial(2, &[(a, 1)]);
        let mut roots = SmallVec::new();
        if self.null(delta) == TrinaryBoolean::True {
            roots.push(self.div(minus_b, two_a));
        } else {
            let root = self.sqrt(delta);
            let low = self.sub(minus_b, root);
            let high = self.add(&[minus_b, root]);
            roots.push(self.div(low, two_a));
            roots.push(self.div(high, two_a));
        }
        (delta, roots)
    }

    fn cubic_discriminant(&mut self, a: ExprHandle, b: ExprHandle, c: ExprHandle, d: ExprHandle) -> ExprHandle {
        let terms = [
            self.monomial(1, &[(b, 2), (c, 2)]),
            self.monomial(-4, &[(a, 1), (c, 3)]),
            self.monomial(-4, &[(b, 3), (d, 1)]),
            self.monomial(-27, &[(a, 2), (d, 2)]),
            self.monomial(18, &[(a, 1), (b, 1), (c, 1), (d, 1)]),
        ];
        self.add(&terms)
    }

    /// Roots when the discriminant is null: a triple root, or a double
    /// root and a simple one.
    fn multiple_roots(&mut self, a: ExprHandle, b: ExprHandle, c: ExprHandle, d: ExprHandle) -> SmallVec<[ExprHandle; 3]> {
        let b2 = self.monomial(1, &[(b, 2)]);
        let ac3 = self.monomial(-3, &[(a, 1), (c, 1)]);
        let delta0 = self.add(&[b2, ac3]);
        let mut roots = SmallVec::new();
        if self.null(delta0) == TrinaryBoolean::True {
            let minus_b = self.neg(b);
            let three_a = self.monomial(3, &[(a, 1)]);
            roots.push(self.div(minus_b, three_a));
            return roots;
        }
        let ad9 = self.monomial(9, &[(a, 1), (d, 1)]);
        let bc = self.monomial(-1, &[(b, 1), (c, 1)]);
        let double_num = self.add(&[ad9, bc]);
        let double_den = self.monomial(2, &[(delta0, 1)]);
        roots.push(self.div(double_num, double_den));

        let simple_terms = [
            self.monomial(4, &[(a, 1), (b, 1), (c, 1)]),
            self.monomial(-9, &[(a, 2), (d, 1)]),
            self.monomial(-1, &[(b, 3)]),
        ];
        let simple_num = self.add(&simple_terms);
        let simple_den = self.mul(&[a, delta0]);
        roots.push(self.div(simple_num, simple_den));
        roots
    }

    /// Cardano's formula with exact arithmetic: one root built from real
    /// cube roots and the conjugate pair around it.
    fn cardano(&mut self, a: ExprHandle, b: ExprHandle, c: ExprHandle, d: ExprHandle) -> SmallVec<[ExprHandle; 3]> {
        let b2 = self.monomial(1, &[(b, 2)]);
        let ac3 = self.monomial(-3, &[(a, 1), (c, 1)]);
        let delta0 = self.add(&[b2, ac3]);
        let delta1_terms = [
            self.monomial(2, &[(b, 3)]),
            self.monomial(-9, &[(a, 1), (b, 1), (c, 1)]),
            self.monomial(27, &[(a, 2), (d, 1)]),
        ];
        let delta1 = self.add(&delta1_terms);

        let d1_squared = self.monomial(1, &[(delta1, 2)]);
        let d0_cubed = self.monomial(-4, &[(delta0, 3)]);
        let inner = self.add(&[d1_squared, d0_cubed]);
        let root = self.sqrt(inner);
        let half = self.s.arena_mut().rational(1, 2);
        let plus = self.add(&[delta1, root]);
        let plus = self.mul(&[half, plus]);
        let mut big_c = self.cbrt(plus);
        if self.null(big_c) == TrinaryBoolean::True {
            let minus = self.sub(delta1, root);
            let minus = self.mul(&[half, minus]);
            big_c = self.cbrt(minus);
        }

        let ratio = self.div(delta0, big_c);
        let sum = self.add(&[b, big_c, ratio]);
        let minus_sum = self.neg(sum);
        let three_a = self.monomial(3, &[(a, 1)]);
        let mut roots = SmallVec::new();
        roots.push(self.div(minus_sum, three_a));

        if self.is_real_format() {
            let nonreal = self.nonreal();
            roots.push(nonreal);
            return roots;
        }
        // -b/(3a) + (C + Δ0/C)/(6a) ∓ (√3/2)(C - Δ0/C)/(3a) i
        let minus_b = self.neg(b);
        let center = self.div(minus_b, three_a);
        let six_a = self.monomial(6, &[(a, 1)]);
        let spread = self.add(&[big_c, ratio]);
        let spread = self.div(spread, six_a);
        let real_part = self.add(&[center, spread]);
        let three = self.int(3);
        let sqrt3 = self.sqrt(three);
        let half = self.s.arena_mut().rational(1, 2);
        let gap = self.sub(big_c, ratio);
        let gap = self.div(gap, three_a);
        let i = self.s.arena_mut().constant(aequa_core::Constant::I);
        let imaginary = self.mul(&[half, sqrt3, gap, i]);
        let low = self.sub(real_part, imaginary);
        let high = self.add(&[real_part, imaginary]);
        roots.push(low);
        roots.push(high);
        roots
    }

    /// Three real roots of a real cubic with positive discriminant.
    fn trigonometric(&mut self, [a, b, c, d]: [f64; 4]) -> SmallVec<[ExprHandle; 3]> {
        let p = (3.0 * a * c - b * b) / (3.0 * a * a);
        let q = (2.0 * b * b * b - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a * a * a);
        let shift = b / (3.0 * a);
        let amplitude = 2.0 * (-p / 3.0).sqrt();
        let phase = ((3.0 * q / (2.0 * p)) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0).acos() / 3.0;
        (0..3)
            .map(|k| {
                let t = amplitude * (phase - 2.0 * PI * f64::from(k) / 3.0).cos();
                self.s.arena_mut().decimal(t - shift)
            })
            .collect()
    }

    /// Cardano's formula in complex floating point.
    fn numeric_cardano(&mut self, [a, b, c, d]: [Complex64; 4]) -> SmallVec<[ExprHandle; 3]> {
        let delta0 = b * b - 3.0 * a * c;
        let delta1 = 2.0 * b * b * b - 9.0 * a * b * c + 27.0 * a * a * d;
        let root = (delta1 * delta1 - 4.0 * delta0 * delta0 * delta0).sqrt();
        let mut big_c = ((delta1 + root) / 2.0).powf(1.0 / 3.0);
        if big_c.norm() < f64::EPSILON {
            big_c = ((delta1 - root) / 2.0).powf(1.0 / 3.0);
        }
        if big_c.norm() < f64::EPSILON {
            let triple = -b / (3.0 * a);
            return SmallVec::from_elem(self.numeric(triple), 1);
        }
        let zeta = Complex64::new(-0.5, 3f64.sqrt() / 2.0);
        let mut rotation = Complex64::new(1.0, 0.0);
        let mut roots = SmallVec::new();
        for _ in 0..3 {
            let ck = rotation * big_c;
            let z = -(b + ck + delta0 / ck) / (3.0 * a);
            roots.push(self.numeric(z));
            rotation *= zeta;
        }
        roots
    }

    /// Drops repeated roots and sorts real ones.
    fn finish(&self, roots: SmallVec<[ExprHandle; 3]>, delta: ExprHandle, is_approximate: bool) -> PolynomialRoots {
        let mut distinct: SmallVec<[ExprHandle; 3]> = SmallVec::new();
        for root in roots {
            if !distinct.contains(&root) {
                distinct.push(root);
            }
        }
        let values: Option<Vec<f64>> = distinct
            .iter()
            .map(|r| approximate(self.s.arena(), *r, self.s.reduction(), &[]).real())
            .collect();
        if let Some(values) = values {
            let mut keyed: Vec<(f64, ExprHandle)> = values.into_iter().zip(distinct.iter().copied()).collect();
            keyed.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(Ordering::Equal));
            distinct = keyed.into_iter().map(|(_, r)| r).collect();
        }
        PolynomialRoots {
            roots: distinct,
            delta,
            approximate: is_approximate,
        }
    }
}

/// Roots of `a x^2 + b x + c` for a non-null `a`.
///
/// A null discriminant yields the double root once.
pub fn quadratic_roots(
    ctx: &mut Context,
    a: ExprHandle,
    b: ExprHandle,
    c: ExprHandle,
    reduction: &ReductionContext,
) -> PolynomialRoots {
    let mut algebra = Algebra::new(ctx, reduction);
    let (delta, roots) = algebra.quadratic(a, b, c);
    algebra.finish(roots, delta, false)
}

/// Roots of `a x^3 + b x^2 + c x + d` for a non-null `a`.
///
/// In the real format the complex pair of a cubic with a single real root
/// is reported as a nonreal expression.
pub fn cubic_roots(
    ctx: &mut Context,
    a: ExprHandle,
    b: ExprHandle,
    c: ExprHandle,
    d: ExprHandle,
    reduction: &ReductionContext,
) -> PolynomialRoots {
    let mut algebra = Algebra::new(ctx, reduction);
    let delta = algebra.cubic_discriminant(a, b, c, d);

    if algebra.null(d) == TrinaryBoolean::True {
        let zero = algebra.int(0);
        let (_, quadratic) = algebra.quadratic(a, b, c);
        let mut roots: SmallVec<[ExprHandle; 3]> = SmallVec::from_elem(zero, 1);
        roots.extend(quadratic);
        return algebra.finish(roots, delta, false);
    }

    let exact = [a, b, c, d].map(|h| algebra.rational(h));
    if let [Some(ra), Some(rb), Some(rc), Some(rd)] = exact {
        if let Some(r) = rational_root([&ra, &rb, &rc, &rd]) {
            debug!("cubic has rational root {r}");
            // Synthetic division by (x - r).
            let b1 = &rb + &(&r * &ra);
            let c1 = &rc + &(&r * &b1);
            let root = algebra.number(r);
            let b1 = algebra.number(b1);
            let c1 = algebra.number(c1);
            let (_, quadratic) = algebra.quadratic(a, b1, c1);
            let mut roots: SmallVec<[ExprHandle; 3]> = SmallVec::from_elem(root, 1);
            roots.extend(quadratic);
            return algebra.finish(roots, delta, false);
        }
    }

    if algebra.null(delta) == TrinaryBoolean::True {
        let roots = algebra.multiple_roots(a, b, c, d);
        return algebra.finish(roots, delta, false);
    }

    let values = [a, b, c, d].map(|h| algebra.value(h));
    let [Some(va), Some(vb), Some(vc), Some(vd)] = values else {
        let roots = algebra.cardano(a, b, c, d);
        return algebra.finish(roots, delta, false);
    };
    let coefficients = [va, vb, vc, vd];
    if coefficients.iter().all(|z| z.im == 0.0) {
        let discriminant = algebra.value(delta).map_or(f64::NAN, |z| z.re);
        if discriminant < 0.0 {
            let roots = algebra.cardano(a, b, c, d);
            return algebra.finish(roots, delta, false);
        }
        if discriminant > 0.0 {
            let roots = algebra.trigonometric(coefficients.map(|z| z.re));
            return algebra.finish(roots, delta, true);
        }
    }
    let roots = algebra.numeric_cardano(coefficients);
    algebra.finish(roots, delta, true)
}

/// A rational root of the cubic, by the rational root theorem.
fn rational_root([a, b, c, d]: [&Rational; 4]) -> Option<Rational> {
    let scale = [a, b, c, d]
        .iter()
        .fold(Integer::one(), |acc, r| acc.lcm(&r.denominator()));
    let scaled = [a, b, c, d].map(|r| r * &Rational::from_integer(scale.clone()));
    let leading = scaled[0].to_integer()?;
    let constant = scaled[3].to_integer()?;
    let numerators = constant.divisors()?;
    let denominators = leading.divisors()?;
    for p in &numerators {
        for q in &denominators {
            for sign in [1i64, -1] {
                let candidate = Rational::new(Integer::from(*p) * Integer::new(sign), Integer::from(*q));
                let value = scaled
                    .iter()
                    .fold(Rational::zero(), |acc, k| &(&acc * &candidate) + k);
                if value.is_zero() {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// Returns true if `expr` stands for a root that is not real in the real
/// format.
#[must_use]
pub fn is_nonreal_root(ctx: &Context, expr: ExprHandle) -> bool {
    matches!(ctx.arena().get(expr), ExprNode::Nonreal)
}
