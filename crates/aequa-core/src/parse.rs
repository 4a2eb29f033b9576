//! Recursive-descent parser for equations and expressions.
//!
//! The grammar, loosest binding first:
//!
//! ```text
//! equation := expr '=' expr
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/') unary | power)*      implicit product
//! unary    := ('-' | '+') unary | power
//! power    := primary ('^' unary)?                    right associative
//! primary  := number | name | name '(' expr ')' | '(' expr ')' | '√' primary
//!           | matrix
//! matrix   := '[' row (',' row)* ']'
//! row      := '[' expr (',' expr)* ']'
//! ```
//!
//! Decimal literals are read as exact rationals. `sqrt(x)` and `exp(x)` are
//! parsed straight into the powers `x^(1/2)` and `e^x`.

use aequa_integers::Rational;
use smallvec::SmallVec;
use thiserror::Error;

use crate::arena::ExprArena;
use crate::expr::{Constant, Function};
use crate::handle::ExprHandle;
use crate::MAX_NAME_LENGTH;

/// Errors raised while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is empty.
    #[error("empty input")]
    Empty,

    /// A character that starts no token.
    #[error("unexpected character '{found}' at {position}")]
    UnexpectedCharacter {
        /// Byte offset in the input.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// A token that does not fit the grammar.
    #[error("unexpected '{found}' at {position}")]
    UnexpectedToken {
        /// Byte offset in the input.
        position: usize,
        /// The offending token.
        found: String,
    },

    /// The input ended in the middle of an expression.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A malformed number literal.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// An identifier longer than the name limit.
    #[error("name '{0}' is longer than {MAX_NAME_LENGTH} characters")]
    NameTooLong(String),

    /// Matrix rows of different lengths.
    #[error("matrix rows have different lengths")]
    RaggedMatrix,

    /// An equation needs exactly one '='.
    #[error("expected exactly one '=' in an equation")]
    NotAnEquation,
}

/// A parsed equation `lhs = rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Equation {
    /// Left-hand side.
    pub lhs: ExprHandle,
    /// Right-hand side.
    pub rhs: ExprHandle,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Name(String),
    Pi,
    Root,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Equals,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(text) | Token::Name(text) => text.clone(),
            Token::Pi => "π".to_string(),
            Token::Root => "√".to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Caret => "^".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),
            Token::Comma => ",".to_string(),
            Token::Equals => "=".to_string(),
        }
    }

    fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::Name(_)
                | Token::Pi
                | Token::Root
                | Token::LParen
                | Token::LBracket
        )
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let mut literal = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            // Scientific notation uses an upper-case E; a lower-case e is
            // the constant.
            if let Some(&(_, 'E')) = chars.peek() {
                literal.push('E');
                chars.next();
                if let Some(&(_, sign)) = chars.peek() {
                    if sign == '-' || sign == '+' {
                        literal.push(sign);
                        chars.next();
                    }
                }
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            tokens.push((position, Token::Number(literal)));
            continue;
        }
        if c.is_alphabetic() && c != 'π' {
            let mut name = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if (d.is_alphanumeric() || d == '_') && d != 'π' {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push((position, Token::Name(name)));
            continue;
        }
        let token = match c {
            'π' => Token::Pi,
            '√' => Token::Root,
            '+' => Token::Plus,
            '-' | '−' => Token::Minus,
            '*' | '×' | '·' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '=' => Token::Equals,
            found => return Err(ParseError::UnexpectedCharacter { position, found }),
        };
        chars.next();
        tokens.push((position, token));
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    arena: &'a mut ExprArena,
}

impl<'a> Parser<'a> {
    fn new(arena: &'a mut ExprArena, text: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self {
            tokens,
            pos: 0,
            arena,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn unexpected(&self) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((position, token)) => ParseError::UnexpectedToken {
                position: *position,
                found: token.describe(),
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn finish(&self) -> Result<(), ParseError> {
        if self.pos < self.tokens.len() {
            Err(self.unexpected())
        } else {
            Ok(())
        }
    }

    fn expr(&mut self) -> Result<ExprHandle, ParseError> {
        let mut terms: SmallVec<[ExprHandle; 4]> = smallvec::smallvec![self.term()?];
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    terms.push(self.term()?);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let term = self.term()?;
                    terms.push(self.arena.neg(term));
                }
                _ => break,
            }
        }
        Ok(self.arena.add(terms))
    }

    fn term(&mut self) -> Result<ExprHandle, ParseError> {
        let mut result = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    result = self.arena.mul(smallvec::smallvec![result, rhs]);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    result = self.arena.div(result, rhs);
                }
                Some(token) if token.starts_operand() => {
                    let rhs = self.power()?;
                    result = self.arena.mul(smallvec::smallvec![result, rhs]);
                }
                _ => break,
            }
        }
        Ok(result)
    }

    fn unary(&mut self) -> Result<ExprHandle, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let operand = self.unary()?;
                Ok(self.arena.neg(operand))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<ExprHandle, ParseError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exp = self.unary()?;
            return Ok(self.arena.pow(base, exp));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<ExprHandle, ParseError> {
        let position = self.pos;
        match self.advance() {
            Some(Token::Number(literal)) => {
                let value = Rational::from_decimal_str(&literal)
                    .ok_or(ParseError::InvalidNumber(literal))?;
                Ok(self.arena.number(value))
            }
            Some(Token::Pi) => Ok(self.arena.constant(Constant::Pi)),
            Some(Token::Root) => {
                let arg = self.primary()?;
                Ok(self.arena.sqrt(arg))
            }
            Some(Token::Name(name)) => self.name(name),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::LBracket) => self.matrix(),
            Some(_) => {
                self.pos = position;
                Err(self.unexpected())
            }
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn argument(&mut self) -> Result<ExprHandle, ParseError> {
        self.expect(&Token::LParen)?;
        let arg = self.expr()?;
        self.expect(&Token::RParen)?;
        Ok(arg)
    }

    fn name(&mut self, name: String) -> Result<ExprHandle, ParseError> {
        match name.as_str() {
            "pi" => return Ok(self.arena.constant(Constant::Pi)),
            "e" => return Ok(self.arena.constant(Constant::E)),
            "i" => return Ok(self.arena.constant(Constant::I)),
            "undef" => return Ok(self.arena.undefined()),
            "sqrt" => {
                let arg = self.argument()?;
                return Ok(self.arena.sqrt(arg));
            }
            "exp" => {
                let arg = self.argument()?;
                let e = self.arena.constant(Constant::E);
                return Ok(self.arena.pow(e, arg));
            }
            _ => {}
        }
        if let Some(func) = Function::from_name(&name) {
            let arg = self.argument()?;
            return Ok(self.arena.func(func, arg));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ParseError::NameTooLong(name));
        }
        Ok(self.arena.symbol(&name))
    }

    fn matrix(&mut self) -> Result<ExprHandle, ParseError> {
        let mut entries = Vec::new();
        let mut rows = 0;
        let mut cols = None;
        loop {
            self.expect(&Token::LBracket)?;
            let mut row_len = 0;
            loop {
                entries.push(self.expr()?);
                row_len += 1;
                if self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            self.expect(&Token::RBracket)?;
            if *cols.get_or_insert(row_len) != row_len {
                return Err(ParseError::RaggedMatrix);
            }
            rows += 1;
            if self.peek() == Some(&Token::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(&Token::RBracket)?;
        Ok(self.arena.matrix(rows, cols.unwrap_or(0), entries))
    }
}

/// Parses a single expression.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a well-formed expression.
pub fn parse_expression(arena: &mut ExprArena, text: &str) -> Result<ExprHandle, ParseError> {
    let mut parser = Parser::new(arena, text)?;
    let expr = parser.expr()?;
    parser.finish()?;
    Ok(expr)
}

/// Parses an equation `lhs = rhs`.
///
/// # Errors
///
/// Returns [`ParseError::NotAnEquation`] unless the text holds exactly one
/// `=`, or another [`ParseError`] for malformed sides.
pub fn parse_equation(arena: &mut ExprArena, text: &str) -> Result<Equation, ParseError> {
    if text.matches('=').count() != 1 {
        return Err(ParseError::NotAnEquation);
    }
    let mut parser = Parser::new(arena, text)?;
    let lhs = parser.expr()?;
    parser.expect(&Token::Equals)?;
    let rhs = parser.expr()?;
    parser.finish()?;
    Ok(Equation { lhs, rhs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprNode;

    #[test]
    fn test_precedence() {
        let mut arena = ExprArena::new();
        let parsed = parse_expression(&mut arena, "1+2*x^2").unwrap();

        let x = arena.symbol("x");
        let one = arena.integer(1);
        let two = arena.integer(2);
        let square = arena.pow(x, two);
        let product = arena.mul(smallvec::smallvec![two, square]);
        let expected = arena.add(smallvec::smallvec![one, product]);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_implicit_multiplication() {
        let mut arena = ExprArena::new();
        let implicit = parse_expression(&mut arena, "5x").unwrap();
        let explicit = parse_expression(&mut arena, "5*x").unwrap();
        assert_eq!(implicit, explicit);

        // Implicit products bind tighter than unary minus but not than '^'.
        let implicit = parse_expression(&mut arena, "2x^2").unwrap();
        let explicit = parse_expression(&mut arena, "2*(x^2)").unwrap();
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn test_power_is_right_associative() {
        let mut arena = ExprArena::new();
        let parsed = parse_expression(&mut arena, "2^3^2").unwrap();
        let explicit = parse_expression(&mut arena, "2^(3^2)").unwrap();
        assert_eq!(parsed, explicit);
    }

    #[test]
    fn test_decimals_are_exact() {
        let mut arena = ExprArena::new();
        let parsed = parse_expression(&mut arena, "1.25").unwrap();
        assert_eq!(arena.get(parsed), &ExprNode::Number(Rational::from_i64(5, 4)));
        let parsed = parse_expression(&mut arena, "2E-3").unwrap();
        assert_eq!(arena.get(parsed), &ExprNode::Number(Rational::from_i64(1, 500)));
    }

    #[test]
    fn test_functions_and_constants() {
        let mut arena = ExprArena::new();
        let parsed = parse_expression(&mut arena, "sqrt(x)").unwrap();
        let x = arena.symbol("x");
        assert_eq!(parsed, arena.sqrt(x));

        let parsed = parse_expression(&mut arena, "cos(pi)").unwrap();
        let pi = arena.constant(Constant::Pi);
        assert_eq!(parsed, arena.func(Function::Cos, pi));
        assert_eq!(parse_expression(&mut arena, "π").unwrap(), pi);
    }

    #[test]
    fn test_matrix() {
        let mut arena = ExprArena::new();
        let parsed = parse_expression(&mut arena, "[[1,2],[3,4]]").unwrap();
        match arena.get(parsed) {
            ExprNode::Matrix { rows, cols, entries } => {
                assert_eq!((*rows, *cols, entries.len()), (2, 2, 4));
            }
            other => panic!("expected a matrix, got {other:?}"),
        }
        assert_eq!(
            parse_expression(&mut arena, "[[1,2],[3]]"),
            Err(ParseError::RaggedMatrix)
        );
    }

    #[test]
    fn test_equation() {
        let mut arena = ExprArena::new();
        let equation = parse_equation(&mut arena, "x+y=2").unwrap();
        assert_eq!(arena.get(equation.rhs), &ExprNode::Number(Rational::from(2)));
        assert_eq!(parse_equation(&mut arena, "x+y"), Err(ParseError::NotAnEquation));
        assert_eq!(parse_equation(&mut arena, "x=y=1"), Err(ParseError::NotAnEquation));
    }

    #[test]
    fn test_errors() {
        let mut arena = ExprArena::new();
        assert_eq!(parse_expression(&mut arena, ""), Err(ParseError::Empty));
        assert_eq!(parse_expression(&mut arena, "1+"), Err(ParseError::UnexpectedEnd));
        assert_eq!(
            parse_expression(&mut arena, "abcdefgh"),
            Err(ParseError::NameTooLong("abcdefgh".to_string()))
        );
        assert!(matches!(
            parse_expression(&mut arena, "2$"),
            Err(ParseError::UnexpectedCharacter { found: '$', .. })
        ));
        assert!(matches!(
            parse_expression(&mut arena, "(1"),
            Err(ParseError::UnexpectedEnd)
        ));
    }
}
