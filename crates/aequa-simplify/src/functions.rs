//! Reduction of function applications.
//!
//! Exact values are produced for the classic angles (multiples of 30 and 45
//! degrees in any angle unit), for the small inverse-trigonometric table
//! and for logarithms of powers of ten. Decimal arguments are evaluated.

use aequa_core::{AngleUnit, ComplexFormat, Constant, ExprHandle, ExprNode, Function};
use aequa_integers::{Integer, Rational};
use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::approximate::{evaluate_function, is_negligible};
use crate::reduce::Simplifier;

/// Largest power of ten recognised by `log`.
const MAX_DECIMAL_EXPONENT: u32 = 400;

impl Simplifier<'_> {
    /// Canonical application of `func` to a reduced argument.
    pub fn apply(&mut self, func: Function, arg: ExprHandle) -> ExprHandle {
        if let Some(poison) = self.poisoned(&[arg]) {
            return poison;
        }
        let node = self.ctx.arena().get(arg).clone();
        if matches!(node, ExprNode::Matrix { .. }) {
            return self.ctx.arena_mut().func(func, arg);
        }
        if let Some(value) = node.as_decimal() {
            return self.evaluate(func, value, arg);
        }
        let exact = match func {
            Function::Sin | Function::Cos | Function::Tan => self.trigonometric(func, &node),
            Function::Asin | Function::Acos | Function::Atan => self.inverse_trigonometric(func, &node),
            Function::Ln | Function::Log => self.logarithm(func, &node),
            Function::Abs => self.absolute_value(&node, arg),
            Function::Cbrt => self.cube_root(&node),
        };
        exact.unwrap_or_else(|| self.ctx.arena_mut().func(func, arg))
    }

    fn evaluate(&mut self, func: Function, value: f64, arg: ExprHandle) -> ExprHandle {
        let z = evaluate_function(func, Complex64::new(value, 0.0), self.reduction.angle_unit);
        let arena = self.ctx.arena_mut();
        if !z.re.is_finite() || !z.im.is_finite() {
            return arena.undefined();
        }
        if is_negligible(z.im, z.re) {
            return arena.decimal(z.re);
        }
        if self.reduction.complex_format == ComplexFormat::Real {
            arena.nonreal()
        } else {
            arena.func(func, arg)
        }
    }

    /// The argument as a rational number of half turns, when it is one.
    fn half_turns(&self, node: &ExprNode) -> Option<Rational> {
        match self.reduction.angle_unit {
            AngleUnit::Radian => match node {
                ExprNode::Number(value) if value.is_zero() => Some(Rational::zero()),
                ExprNode::Constant(Constant::Pi) => Some(Rational::one()),
                ExprNode::Mul(factors) if factors.len() == 2 => {
                    let arena = self.ctx.arena();
                    match (arena.get(factors[0]), arena.get(factors[1])) {
                        (ExprNode::Number(value), ExprNode::Constant(Constant::Pi)) => Some(value.clone()),
                        _ => None,
                    }
                }
                _ => None,
            },
            AngleUnit::Degree => node.as_rational().map(|v| v / &Rational::from(180)),
            AngleUnit::Gradian => node.as_rational().map(|v| v / &Rational::from(200)),
        }
    }

    fn trigonometric(&mut self, func: Function, node: &ExprNode) -> Option<ExprHandle> {
        let turns = self.half_turns(node)?;
        // Position on the circle in steps of 15 degrees.
        let step = (turns * Rational::from(12)).to_integer()?;
        let step = (step % Integer::new(24)).to_i64()?.rem_euclid(24);
        match func {
            Function::Sin => self.exact_sine(step),
            Function::Cos => self.exact_sine((step + 6) % 24),
            _ => {
                let sine = self.exact_sine(step)?;
                let cosine = self.exact_sine((step + 6) % 24)?;
                if self.ctx.arena().get(cosine).is_zero() {
                    return Some(self.ctx.arena_mut().undefined());
                }
                let minus_one = self.ctx.arena_mut().integer(-1);
                let inverse = self.pow(cosine, minus_one);
                Some(self.mul(&[sine, inverse]))
            }
        }
    }

    /// `sin(step * 15°)` when it has a short closed form.
    fn exact_sine(&mut self, step: i64) -> Option<ExprHandle> {
        let (negative, step) = if step >= 12 { (true, step - 12) } else { (false, step) };
        let step = if step > 6 { 12 - step } else { step };
        let arena = self.ctx.arena_mut();
        let value = match step {
            0 => arena.integer(0),
            2 => arena.rational(1, 2),
            6 => arena.integer(1),
            3 | 4 => {
                let radicand = arena.integer(if step == 3 { 2 } else { 3 });
                let half = arena.rational(1, 2);
                let root = self.pow(radicand, half);
                let half = self.ctx.arena_mut().rational(1, 2);
                self.mul(&[half, root])
            }
            _ => return None,
        };
        if negative {
            let minus_one = self.ctx.arena_mut().integer(-1);
            Some(self.mul(&[minus_one, value]))
        } else {
            Some(value)
        }
    }

    fn angle(&mut self, half_turns: Rational) -> ExprHandle {
        let arena = self.ctx.arena_mut();
        match self.reduction.angle_unit {
            AngleUnit::Radian => {
                let coefficient = arena.number(half_turns);
                let pi = arena.constant(Constant::Pi);
                self.mul(&[coefficient, pi])
            }
            AngleUnit::Degree => arena.number(half_turns * Rational::from(180)),
            AngleUnit::Gradian => arena.number(half_turns * Rational::from(200)),
        }
    }

    fn inverse_trigonometric(&mut self, func: Function, node: &ExprNode) -> Option<ExprHandle> {
        let x = node.as_rational()?;
        if func != Function::Atan && x.abs() > Rational::one() {
            return (self.reduction.complex_format == ComplexFormat::Real)
                .then(|| self.ctx.arena_mut().nonreal());
        }
        let half = Rational::from_i64(1, 2);
        let arcsine = |x: &Rational| -> Option<Rational> {
            let magnitude = match x.abs() {
                m if m.is_zero() => Rational::zero(),
                m if m == half => Rational::from_i64(1, 6),
                m if m.is_one() => half.clone(),
                _ => return None,
            };
            Some(if x.is_negative() { -magnitude } else { magnitude })
        };
        let turns = match func {
            Function::Asin => arcsine(x)?,
            Function::Acos => &half - &arcsine(x)?,
            _ => match x.signum() {
                0 => Rational::zero(),
                s if x.abs().is_one() => Rational::from_i64(i64::from(s), 4),
                _ => return None,
            },
        };
        Some(self.angle(turns))
    }

    fn logarithm(&mut self, func: Function, node: &ExprNode) -> Option<ExprHandle> {
        let arena = self.ctx.arena_mut();
        match node {
            ExprNode::Constant(Constant::E) if func == Function::Ln => Some(arena.integer(1)),
            ExprNode::Number(value) => {
                if value.is_zero() {
                    return Some(arena.undefined());
                }
                if value.is_negative() {
                    return (self.reduction.complex_format == ComplexFormat::Real)
                        .then(|| arena.nonreal());
                }
                if value.is_one() {
                    return Some(arena.integer(0));
                }
                if func != Function::Log {
                    return None;
                }
                let exponent = if value.denominator().is_one() {
                    decimal_exponent(value.numerator())?
                } else if value.numerator().is_one() {
                    -decimal_exponent(value.denominator())?
                } else {
                    return None;
                };
                Some(arena.integer(exponent))
            }
            _ => None,
        }
    }

    fn absolute_value(&mut self, node: &ExprNode, arg: ExprHandle) -> Option<ExprHandle> {
        let arena = self.ctx.arena_mut();
        match node {
            ExprNode::Number(value) => Some(arena.number(value.abs())),
            ExprNode::Constant(Constant::I) => Some(arena.integer(1)),
            ExprNode::Constant(_) => Some(arg),
            _ => None,
        }
    }

    fn cube_root(&mut self, node: &ExprNode) -> Option<ExprHandle> {
        let value = node.as_rational()?;
        let arena = self.ctx.arena_mut();
        let magnitude = arena.number(value.abs());
        let third = arena.rational(1, 3);
        let root = self.pow(magnitude, third);
        if value.is_negative() {
            let minus_one = self.ctx.arena_mut().integer(-1);
            Some(self.mul(&[minus_one, root]))
        } else {
            Some(root)
        }
    }
}

/// `k` when `n = 10^k` for some positive `k`.
fn decimal_exponent(mut n: Integer) -> Option<i64> {
    let ten = Integer::new(10);
    let mut exponent = 0;
    while exponent < MAX_DECIMAL_EXPONENT && !n.is_one() {
        if !(n.clone() % ten.clone()).is_zero() {
            return None;
        }
        n = n / ten.clone();
        exponent += 1;
    }
    n.is_one().then_some(i64::from(exponent))
}
