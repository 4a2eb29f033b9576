//! Expression node types.
//!
//! This module defines the expression types stored in the arena. Parsed
//! input may contain any node; reduced expressions never contain `Neg` or
//! `Div`, which the simplifier rewrites into products and powers.

use aequa_integers::Rational;
use num_traits::{One, Zero};
use smallvec::SmallVec;

use crate::handle::ExprHandle;

/// Unique identifier for a symbol.
pub type SymbolId = u32;

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    /// π.
    Pi,
    /// Euler's number.
    E,
    /// The imaginary unit.
    I,
}

impl Constant {
    /// Display name of the constant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
            Constant::I => "i",
        }
    }
}

/// A built-in function of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Arc sine.
    Asin,
    /// Arc cosine.
    Acos,
    /// Arc tangent.
    Atan,
    /// Natural logarithm.
    Ln,
    /// Logarithm base 10.
    Log,
    /// Absolute value.
    Abs,
    /// Real cube root.
    Cbrt,
}

impl Function {
    /// Every function, in canonical order.
    pub const ALL: [Function; 10] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Ln,
        Function::Log,
        Function::Abs,
        Function::Cbrt,
    ];

    /// Name used by the parser and the serializer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Abs => "abs",
            Function::Cbrt => "cbrt",
        }
    }

    /// Looks a function up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Returns true for sin, cos and tan, which read the angle unit.
    #[must_use]
    pub const fn is_trigonometric(self) -> bool {
        matches!(self, Function::Sin | Function::Cos | Function::Tan)
    }

    /// Returns true for the inverse trigonometric functions.
    #[must_use]
    pub const fn is_inverse_trigonometric(self) -> bool {
        matches!(self, Function::Asin | Function::Acos | Function::Atan)
    }
}

/// An expression node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Atoms ===
    /// An exact rational number.
    Number(Rational),

    /// An approximate real number, stored as the bits of an `f64`.
    ///
    /// Invariant: finite, and never negative zero.
    Decimal(u64),

    /// A named constant.
    Constant(Constant),

    /// A symbolic variable.
    Symbol(SymbolId),

    /// The undefined value.
    Undefined,

    /// The marker for a value that is not real in the real complex format.
    Nonreal,

    // === Compound Expressions ===
    /// Sum of expressions: a + b + c + ...
    Add(SmallVec<[ExprHandle; 4]>),

    /// Product of expressions: a * b * c * ...
    Mul(SmallVec<[ExprHandle; 4]>),

    /// Power expression: base^exp.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// Negation: -expr.
    Neg(ExprHandle),

    /// Division: numerator / denominator.
    Div {
        /// The numerator.
        num: ExprHandle,
        /// The denominator.
        den: ExprHandle,
    },

    /// A function application.
    Function {
        /// The function.
        func: Function,
        /// The argument.
        arg: ExprHandle,
    },

    /// A matrix in row-major order.
    Matrix {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
        /// Entries in row-major order.
        entries: Vec<ExprHandle>,
    },
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Number(_)
                | ExprNode::Decimal(_)
                | ExprNode::Constant(_)
                | ExprNode::Symbol(_)
                | ExprNode::Undefined
                | ExprNode::Nonreal
        )
    }

    /// Returns true if this node is a numeric literal, exact or approximate.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, ExprNode::Number(_) | ExprNode::Decimal(_))
    }

    /// Returns true if this is the exact zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, ExprNode::Number(n) if n.is_zero())
    }

    /// Returns true if this is the exact one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, ExprNode::Number(n) if n.is_one())
    }

    /// Returns the rational value of an exact number.
    #[must_use]
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            ExprNode::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value of an approximate number.
    #[must_use]
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            ExprNode::Decimal(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Number(_)
            | ExprNode::Decimal(_)
            | ExprNode::Constant(_)
            | ExprNode::Symbol(_)
            | ExprNode::Undefined
            | ExprNode::Nonreal => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Neg(arg) | ExprNode::Function { arg, .. } => smallvec::smallvec![*arg],
            ExprNode::Div { num, den } => smallvec::smallvec![*num, *den],
            ExprNode::Matrix { entries, .. } => entries.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_atom() {
        assert!(ExprNode::Number(Rational::from(42)).is_atom());
        assert!(ExprNode::Symbol(0).is_atom());
        assert!(ExprNode::Undefined.is_atom());
        assert!(!ExprNode::Neg(ExprHandle::new(0)).is_atom());
    }

    #[test]
    fn test_is_zero_one() {
        assert!(ExprNode::Number(Rational::zero()).is_zero());
        assert!(!ExprNode::Number(Rational::one()).is_zero());
        assert!(ExprNode::Number(Rational::one()).is_one());
        assert!(!ExprNode::Decimal(0f64.to_bits()).is_zero());
    }

    #[test]
    fn test_function_names() {
        for func in Function::ALL {
            assert_eq!(Function::from_name(func.name()), Some(func));
        }
        assert_eq!(Function::from_name("sqrt"), None);
    }
}
