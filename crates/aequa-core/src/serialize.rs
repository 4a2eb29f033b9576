//! Serialization of expressions to parseable text.
//!
//! The output reads back through [`crate::parse_expression`] to the same
//! value: `x^2-5*x+6`, `√(2)/2`, `2^(1/3)`, `[[1,2],[3,4]]`. Approximate
//! numbers are printed with a given number of significant digits and switch
//! to `E` notation outside of a readable exponent range.

use aequa_integers::Rational;
use num_traits::{One, Zero};

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

/// Largest number of significant digits an `f64` can carry.
const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// Smallest decimal exponent printed without `E` notation.
const MIN_POSITIONAL_EXPONENT: i32 = -4;

/// Formats an approximate number with `significant_digits` digits.
#[must_use]
pub fn format_decimal(value: f64, significant_digits: usize) -> String {
    let digits = significant_digits.clamp(1, MAX_SIGNIFICANT_DIGITS);
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return "undef".to_string();
    }
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let digits_i32 = digits as i32;
    if exponent < MIN_POSITIONAL_EXPONENT || exponent >= digits_i32 {
        return format!("{}E{exponent}", trim_fraction(mantissa));
    }
    #[allow(clippy::cast_sign_loss)]
    let decimals = (digits_i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Serializes an expression.
#[must_use]
pub fn serialize(arena: &ExprArena, expr: ExprHandle, significant_digits: usize) -> String {
    let mut out = String::new();
    Serializer {
        arena,
        digits: significant_digits,
    }
    .write(expr, &mut out);
    out
}

struct Serializer<'a> {
    arena: &'a ExprArena,
    digits: usize,
}

impl Serializer<'_> {
    fn write(&self, expr: ExprHandle, out: &mut String) {
        match self.arena.get(expr) {
            ExprNode::Number(n) => out.push_str(&n.to_string()),
            ExprNode::Decimal(bits) => out.push_str(&format_decimal(f64::from_bits(*bits), self.digits)),
            ExprNode::Constant(c) => out.push_str(c.name()),
            ExprNode::Symbol(id) => out.push_str(self.arena.symbol_name(*id).unwrap_or("?")),
            ExprNode::Undefined => out.push_str("undef"),
            ExprNode::Nonreal => out.push_str("nonreal"),
            ExprNode::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    let mut text = String::new();
                    self.write_operand(*term, &mut text, |node| matches!(node, ExprNode::Add(_)));
                    if i > 0 && !text.starts_with('-') {
                        out.push('+');
                    }
                    out.push_str(&text);
                }
            }
            ExprNode::Mul(factors) => self.write_product(factors, out),
            ExprNode::Pow { base, exp } => {
                if self.is_negative_number(*exp) {
                    self.write_product(&[expr], out);
                } else {
                    self.write_power(*base, *exp, out);
                }
            }
            ExprNode::Neg(arg) => {
                out.push('-');
                self.write_operand(*arg, out, |node| {
                    matches!(node, ExprNode::Add(_) | ExprNode::Neg(_))
                });
            }
            ExprNode::Div { num, den } => {
                self.write_operand(*num, out, |node| matches!(node, ExprNode::Add(_) | ExprNode::Neg(_)));
                out.push('/');
                self.write_operand(*den, out, |node| !Self::is_atomic(node));
            }
            ExprNode::Function { func, arg } => {
                out.push_str(func.name());
                out.push('(');
                self.write(*arg, out);
                out.push(')');
            }
            ExprNode::Matrix { rows, cols, entries } => {
                out.push('[');
                for row in 0..*rows {
                    if row > 0 {
                        out.push(',');
                    }
                    out.push('[');
                    for col in 0..*cols {
                        if col > 0 {
                            out.push(',');
                        }
                        self.write(entries[row * cols + col], out);
                    }
                    out.push(']');
                }
                out.push(']');
            }
        }
    }

    fn write_operand(&self, expr: ExprHandle, out: &mut String, needs_parens: impl Fn(&ExprNode) -> bool) {
        if needs_parens(self.arena.get(expr)) {
            out.push('(');
            self.write(expr, out);
            out.push(')');
        } else {
            self.write(expr, out);
        }
    }

    fn is_atomic(node: &ExprNode) -> bool {
        match node {
            ExprNode::Number(n) => n.is_integer() && !n.is_negative(),
            ExprNode::Decimal(bits) => f64::from_bits(*bits) >= 0.0,
            ExprNode::Constant(_)
            | ExprNode::Symbol(_)
            | ExprNode::Function { .. }
            | ExprNode::Matrix { .. }
            | ExprNode::Undefined
            | ExprNode::Nonreal => true,
            _ => false,
        }
    }

    fn is_negative_number(&self, expr: ExprHandle) -> bool {
        self.arena.get(expr).as_rational().is_some_and(Rational::is_negative)
    }

    fn write_power(&self, base: ExprHandle, exp: ExprHandle, out: &mut String) {
        if self.arena.get(exp).as_rational() == Some(&Rational::from_i64(1, 2)) {
            out.push_str("√(");
            self.write(base, out);
            out.push(')');
            return;
        }
        self.write_operand(base, out, |node| !Self::is_atomic(node));
        out.push('^');
        self.write_operand(exp, out, |node| {
            !matches!(node, ExprNode::Symbol(_) | ExprNode::Constant(_))
                && !matches!(node, ExprNode::Number(n) if n.is_integer() && !n.is_negative())
        });
    }

    fn write_product(&self, factors: &[ExprHandle], out: &mut String) {
        let mut coefficient = Rational::one();
        let mut negative = false;
        let mut numerator: Vec<String> = Vec::new();
        let mut denominator: Vec<String> = Vec::new();

        for &factor in factors {
            match self.arena.get(factor) {
                ExprNode::Number(n) => coefficient = coefficient * n.clone(),
                ExprNode::Decimal(bits) => {
                    let value = f64::from_bits(*bits);
                    negative ^= value < 0.0;
                    numerator.push(format_decimal(value.abs(), self.digits));
                }
                ExprNode::Pow { base, exp } if self.is_negative_number(*exp) => {
                    if let Some(e) = self.arena.get(*exp).as_rational() {
                        denominator.push(self.power_text(*base, &-e));
                    }
                }
                _ => {
                    let mut text = String::new();
                    self.write_operand(factor, &mut text, |node| {
                        matches!(node, ExprNode::Add(_) | ExprNode::Neg(_) | ExprNode::Div { .. })
                    });
                    numerator.push(text);
                }
            }
        }

        if coefficient.is_zero() {
            out.push('0');
            return;
        }
        if coefficient.is_negative() != negative {
            out.push('-');
        }
        let magnitude = coefficient.abs();
        if !magnitude.numerator().is_one() || numerator.is_empty() {
            numerator.insert(0, magnitude.numerator().to_string());
        }
        out.push_str(&numerator.join("*"));

        if !magnitude.denominator().is_one() {
            denominator.insert(0, magnitude.denominator().to_string());
        }
        match denominator.len() {
            0 => {}
            1 => {
                out.push('/');
                out.push_str(&denominator[0]);
            }
            _ => {
                out.push_str("/(");
                out.push_str(&denominator.join("*"));
                out.push(')');
            }
        }
    }

    /// Text of `base^exp` for a positive rational exponent.
    fn power_text(&self, base: ExprHandle, exp: &Rational) -> String {
        let mut text = String::new();
        if *exp == Rational::from_i64(1, 2) {
            text.push_str("√(");
            self.write(base, &mut text);
            text.push(')');
            return text;
        }
        self.write_operand(base, &mut text, |node| !Self::is_atomic(node));
        if !exp.is_one() {
            text.push('^');
            if exp.is_integer() {
                text.push_str(&exp.to_string());
            } else {
                text.push_str(&format!("({exp})"));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_expression;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.739_085_133_215_160_6, 10), "0.7390851332");
        assert_eq!(format_decimal(1.0, 10), "1");
        assert_eq!(format_decimal(-2.5, 10), "-2.5");
        assert_eq!(format_decimal(1.0 / 3.0, 4), "0.3333");
        assert_eq!(format_decimal(12_345_678_901.0, 10), "1.23456789E10");
        assert_eq!(format_decimal(0.000_012_5, 10), "1.25E-5");
        assert_eq!(format_decimal(0.0, 10), "0");
    }

    #[test]
    fn test_sums_and_products() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let minus_five = arena.integer(-5);
        let linear = arena.mul(smallvec::smallvec![minus_five, x]);
        let six = arena.integer(6);
        let sum = arena.add(smallvec::smallvec![square, linear, six]);
        assert_eq!(serialize(&arena, sum, 10), "x^2-5*x+6");

        let t = arena.symbol("t");
        let minus_one = arena.integer(-1);
        let negated = arena.mul(smallvec::smallvec![minus_one, t]);
        let one = arena.integer(1);
        let formal = arena.add(smallvec::smallvec![negated, one]);
        assert_eq!(serialize(&arena, formal, 10), "-t+1");
    }

    #[test]
    fn test_radicals_and_fractions() {
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let root = arena.sqrt(two);
        let half = arena.rational(1, 2);
        let product = arena.mul(smallvec::smallvec![half, root]);
        assert_eq!(serialize(&arena, product, 10), "√(2)/2");

        let third = arena.rational(1, 3);
        let cube_root = arena.pow(two, third);
        assert_eq!(serialize(&arena, cube_root, 10), "2^(1/3)");

        let x = arena.symbol("x");
        let minus_one = arena.integer(-1);
        let inverse = arena.pow(x, minus_one);
        assert_eq!(serialize(&arena, inverse, 10), "1/x");

        let minus_two = arena.integer(-2);
        let inverse_square = arena.pow(x, minus_two);
        let y = arena.symbol("y");
        let quotient = arena.mul(smallvec::smallvec![y, inverse_square]);
        assert_eq!(serialize(&arena, quotient, 10), "y/x^2");
    }

    #[test]
    fn test_round_trip_through_parser() {
        let mut arena = ExprArena::new();
        for text in ["x^2-5*x+6", "√(2)/2", "2^(1/3)", "sin(x)", "[[1,2],[3,4]]", "undef"] {
            let parsed = parse_expression(&mut arena, text).unwrap();
            let printed = serialize(&arena, parsed, 10);
            let reparsed = parse_expression(&mut arena, &printed).unwrap();
            assert_eq!(parsed, reparsed, "{text} printed as {printed}");
        }
    }
}
