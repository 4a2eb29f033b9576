//! Floating-point evaluation of expressions.

use std::f64::consts::{E, LN_10, PI};

use aequa_core::{AngleUnit, ComplexFormat, Constant, ExprArena, ExprHandle, ExprNode, Function, SymbolId};
use num_complex::Complex64;

use crate::reduction::ReductionContext;

/// Relative size under which an imaginary part counts as rounding noise.
pub const IMAGINARY_TOLERANCE: f64 = 1e-10;

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Approximation {
    /// A finite value; its imaginary part is zero in the real format.
    Value(Complex64),
    /// The value is not real and the real format is in force.
    Nonreal,
    /// The value does not exist.
    Undefined,
}

impl Approximation {
    /// The value when it is a finite real number.
    #[must_use]
    pub fn real(self) -> Option<f64> {
        match self {
            Approximation::Value(z) if z.im == 0.0 => Some(z.re),
            _ => None,
        }
    }

    /// The real value, or NaN.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.real().unwrap_or(f64::NAN)
    }

    /// Returns true for [`Approximation::Undefined`].
    #[must_use]
    pub fn is_undefined(self) -> bool {
        matches!(self, Approximation::Undefined)
    }
}

/// Returns true if `part` is negligible next to `reference`.
#[must_use]
pub fn is_negligible(part: f64, reference: f64) -> bool {
    part.abs() <= IMAGINARY_TOLERANCE * reference.abs().max(1.0)
}

/// Clears the sign of a zero imaginary part, so that branch cuts are taken
/// from above as for the real number it stands for.
fn principal(z: Complex64) -> Complex64 {
    if z.im == 0.0 {
        Complex64::new(z.re, 0.0)
    } else {
        z
    }
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Undefined,
    Nonreal,
}

struct Evaluator<'a> {
    arena: &'a ExprArena,
    angle_unit: AngleUnit,
    real: bool,
    bindings: &'a [(SymbolId, f64)],
}

impl Evaluator<'_> {
    fn eval(&self, expr: ExprHandle) -> Result<Complex64, Failure> {
        let value = match self.arena.get(expr) {
            ExprNode::Number(value) => Complex64::new(value.to_f64(), 0.0),
            ExprNode::Decimal(bits) => Complex64::new(f64::from_bits(*bits), 0.0),
            ExprNode::Constant(Constant::Pi) => Complex64::new(PI, 0.0),
            ExprNode::Constant(Constant::E) => Complex64::new(E, 0.0),
            ExprNode::Constant(Constant::I) => Complex64::i(),
            ExprNode::Symbol(id) => {
                let (_, value) = self
                    .bindings
                    .iter()
                    .find(|(symbol, _)| symbol == id)
                    .ok_or(Failure::Undefined)?;
                Complex64::new(*value, 0.0)
            }
            ExprNode::Undefined | ExprNode::Matrix { .. } => return Err(Failure::Undefined),
            ExprNode::Nonreal => return Err(Failure::Nonreal),
            ExprNode::Add(terms) => {
                let mut sum = Complex64::new(0.0, 0.0);
                for term in terms {
                    sum += self.eval(*term)?;
                }
                sum
            }
            ExprNode::Mul(factors) => {
                let mut product = Complex64::new(1.0, 0.0);
                for factor in factors {
                    product *= self.eval(*factor)?;
                }
                product
            }
            ExprNode::Neg(arg) => -self.eval(*arg)?,
            ExprNode::Div { num, den } => {
                let den = self.eval(*den)?;
                if den.norm() == 0.0 {
                    return Err(Failure::Undefined);
                }
                self.eval(*num)? / den
            }
            ExprNode::Pow { base, exp } => self.power(*base, *exp)?,
            ExprNode::Function { func, arg } => {
                let arg = self.eval(*arg)?;
                let value = evaluate_function(*func, arg, self.angle_unit);
                self.check_real(arg, value)?
            }
        };
        if value.re.is_finite() && value.im.is_finite() {
            Ok(value)
        } else {
            Err(Failure::Undefined)
        }
    }

    fn power(&self, base: ExprHandle, exp: ExprHandle) -> Result<Complex64, Failure> {
        let b = principal(self.eval(base)?);
        // Odd roots of negative reals stay real in the real format.
        if self.real && b.im == 0.0 && b.re < 0.0 {
            if let ExprNode::Number(e) = self.arena.get(exp) {
                if e.denominator().is_odd() {
                    let magnitude = (-b.re).powf(e.to_f64());
                    let odd = e.numerator().is_odd();
                    return Ok(Complex64::new(if odd { -magnitude } else { magnitude }, 0.0));
                }
            }
        }
        let e = principal(self.eval(exp)?);
        if b.norm() == 0.0 {
            return if e.re > 0.0 {
                Ok(Complex64::new(0.0, 0.0))
            } else {
                Err(Failure::Undefined)
            };
        }
        if b.im == 0.0 && e.im == 0.0 && (b.re > 0.0 || e.re.fract() == 0.0) {
            return Ok(Complex64::new(b.re.powf(e.re), 0.0));
        }
        self.check_real(b, b.powc(e))
    }

    /// Rejects a non-real result computed from a real argument.
    fn check_real(&self, arg: Complex64, value: Complex64) -> Result<Complex64, Failure> {
        if self.real && arg.im == 0.0 && !is_negligible(value.im, value.re) {
            Err(Failure::Nonreal)
        } else {
            Ok(value)
        }
    }
}

/// Evaluates a function at a complex point, honouring the angle unit.
#[must_use]
pub fn evaluate_function(func: Function, z: Complex64, angle_unit: AngleUnit) -> Complex64 {
    let to_radians = PI / angle_unit.half_turn();
    let z = principal(z);
    let real = z.im == 0.0;
    match func {
        Function::Sin => (z * to_radians).sin(),
        Function::Cos => (z * to_radians).cos(),
        Function::Tan => (z * to_radians).tan(),
        Function::Asin if real && z.re.abs() <= 1.0 => Complex64::new(z.re.asin() / to_radians, 0.0),
        Function::Asin => z.asin() / to_radians,
        Function::Acos if real && z.re.abs() <= 1.0 => Complex64::new(z.re.acos() / to_radians, 0.0),
        Function::Acos => z.acos() / to_radians,
        Function::Atan if real => Complex64::new(z.re.atan() / to_radians, 0.0),
        Function::Atan => z.atan() / to_radians,
        Function::Ln | Function::Log => {
            let ln = if z.norm() == 0.0 {
                Complex64::new(f64::NAN, 0.0)
            } else if real && z.re > 0.0 {
                Complex64::new(z.re.ln(), 0.0)
            } else {
                z.ln()
            };
            if func == Function::Log {
                ln / LN_10
            } else {
                ln
            }
        }
        Function::Abs => Complex64::new(z.norm(), 0.0),
        Function::Cbrt if real => Complex64::new(z.re.cbrt(), 0.0),
        Function::Cbrt => z.powf(1.0 / 3.0),
    }
}

/// Evaluates `expr` with the given symbol values.
///
/// Unbound symbols make the result undefined.
#[must_use]
pub fn approximate(
    arena: &ExprArena,
    expr: ExprHandle,
    reduction: &ReductionContext,
    bindings: &[(SymbolId, f64)],
) -> Approximation {
    let real = reduction.complex_format == ComplexFormat::Real;
    let evaluator = Evaluator {
        arena,
        angle_unit: reduction.angle_unit,
        real,
        bindings,
    };
    match evaluator.eval(expr) {
        Ok(z) if is_negligible(z.im, z.re) => Approximation::Value(Complex64::new(z.re, 0.0)),
        Ok(_) if real => Approximation::Nonreal,
        Ok(z) => {
            let re = if is_negligible(z.re, z.im) { 0.0 } else { z.re };
            Approximation::Value(Complex64::new(re, z.im))
        }
        Err(Failure::Nonreal) => Approximation::Nonreal,
        Err(Failure::Undefined) => Approximation::Undefined,
    }
}

/// Real value of `expr` at `variable = x`, or NaN.
#[must_use]
pub fn approximate_at(
    arena: &ExprArena,
    expr: ExprHandle,
    reduction: &ReductionContext,
    variable: SymbolId,
    x: f64,
) -> f64 {
    approximate(arena, expr, reduction, &[(variable, x)]).to_f64()
}

/// Builds the expression displaying an approximation in `format`.
pub fn approximate_to_expression(
    arena: &mut ExprArena,
    approximation: Approximation,
    format: ComplexFormat,
) -> ExprHandle {
    let z = match approximation {
        Approximation::Value(z) => z,
        Approximation::Nonreal => return arena.nonreal(),
        Approximation::Undefined => return arena.undefined(),
    };
    if z.im == 0.0 || format == ComplexFormat::Real {
        return arena.decimal(z.re);
    }
    let i = arena.constant(Constant::I);
    match format {
        ComplexFormat::Polar => {
            let (modulus, argument) = z.to_polar();
            let argument = arena.decimal(argument);
            let exponent = arena.mul(smallvec::smallvec![argument, i]);
            let e = arena.constant(Constant::E);
            let rotation = arena.pow(e, exponent);
            if modulus == 1.0 {
                return rotation;
            }
            let modulus = arena.decimal(modulus);
            arena.mul(smallvec::smallvec![modulus, rotation])
        }
        _ => {
            let imaginary = match z.im {
                im if im == 1.0 => i,
                im if im == -1.0 => {
                    let minus_one = arena.integer(-1);
                    arena.mul(smallvec::smallvec![minus_one, i])
                }
                im => {
                    let coefficient = arena.decimal(im);
                    arena.mul(smallvec::smallvec![coefficient, i])
                }
            };
            if z.re == 0.0 {
                return imaginary;
            }
            let real = arena.decimal(z.re);
            arena.add(smallvec::smallvec![real, imaginary])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aequa_core::{serialize, Context};

    fn approximate_text(text: &str, reduction: &ReductionContext) -> Approximation {
        let mut ctx = Context::new();
        let expr = ctx.parse(text).unwrap();
        approximate(ctx.arena(), expr, reduction, &[])
    }

    #[test]
    fn test_real_values() {
        let reduction = ReductionContext::default();
        let value = approximate_text("√(2)/2", &reduction).to_f64();
        assert!((value - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-15);
        assert_eq!(approximate_text("cbrt(-8)", &reduction).to_f64(), -2.0);
    }

    #[test]
    fn test_nonreal_and_undefined() {
        let reduction = ReductionContext::default();
        assert_eq!(approximate_text("√(-1)", &reduction), Approximation::Nonreal);
        assert_eq!(approximate_text("1/0", &reduction), Approximation::Undefined);
        assert_eq!(approximate_text("ln(0)", &reduction), Approximation::Undefined);
        assert_eq!(approximate_text("x+1", &reduction), Approximation::Undefined);
    }

    #[test]
    fn test_complex_values() {
        let cartesian = ReductionContext::default().with_complex_format(ComplexFormat::Cartesian);
        match approximate_text("√(-4)+1", &cartesian) {
            Approximation::Value(z) => {
                assert!((z.re - 1.0).abs() < 1e-12);
                assert!((z.im - 2.0).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_negated_reals_on_branch_cuts() {
        let cartesian = ReductionContext::default().with_complex_format(ComplexFormat::Cartesian);
        let Approximation::Value(ln) = approximate_text("ln(-1)", &cartesian) else {
            panic!("ln(-1) should have a value");
        };
        assert!((ln.im - std::f64::consts::PI).abs() < 1e-12);
        let Approximation::Value(root) = approximate_text("(-9)^(1/2)", &cartesian) else {
            panic!("(-9)^(1/2) should have a value");
        };
        assert!(root.re.abs() < 1e-12);
        assert!((root.im - 3.0).abs() < 1e-12);
        let Approximation::Value(z) = approximate_text("asin(-2)", &cartesian) else {
            panic!("asin(-2) should have a value");
        };
        assert!((z.re + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_bindings() {
        let mut ctx = Context::new();
        let expr = ctx.parse("x^2-2").unwrap();
        let x = ctx.arena().lookup_symbol("x").unwrap();
        let value = approximate_at(ctx.arena(), expr, &ReductionContext::default(), x, 3.0);
        assert_eq!(value, 7.0);
    }

    #[test]
    fn test_degrees() {
        let degrees = ReductionContext::default().with_angle_unit(AngleUnit::Degree);
        let value = approximate_text("sin(90)", &degrees).to_f64();
        assert!((value - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_expression_of_approximation() {
        let mut ctx = Context::new();
        let arena = ctx.arena_mut();
        let value = Approximation::Value(Complex64::new(1.5, -2.0));
        let cartesian = approximate_to_expression(arena, value, ComplexFormat::Cartesian);
        assert_eq!(serialize(arena, cartesian, 10), "1.5-2*i");
        let quarter = Approximation::Value(Complex64::new(0.25, 0.0));
        let real = approximate_to_expression(arena, quarter, ComplexFormat::Real);
        assert_eq!(serialize(arena, real, 10), "0.25");
        let undefined = approximate_to_expression(arena, Approximation::Undefined, ComplexFormat::Real);
        assert_eq!(serialize(arena, undefined, 10), "undef");
    }
}
