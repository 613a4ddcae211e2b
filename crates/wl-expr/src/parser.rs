//! Recursive-descent parser.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | NAME | '(' expr ')'
//! ```
//!
//! `**` binds tighter than a unary minus on its left and is right-associative,
//! so `-2**2` is `-(2**2)` and `2**-1` is `0.5`.

use crate::error::ExprError;
use crate::lexer::{Spanned, Token};

/// Nesting bound for parentheses and unary operators.
pub(crate) const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Number(f64),
    Name(String),
    Neg(Box<Node>),
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}

pub(crate) fn parse(tokens: &[Spanned]) -> Result<Node, ExprError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let node = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(ExprError::Syntax {
            position: extra.position,
            message: format!("unexpected {}", extra.token.describe()),
        });
    }
    Ok(node)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<&Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Node::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Node::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Node, ExprError> {
        match self.peek_token() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.descend()?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(Node::Neg(Box::new(operand)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.descend()?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(operand)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, ExprError> {
        let base = self.primary()?;
        if matches!(self.peek_token(), Some(Token::Power)) {
            self.pos += 1;
            self.descend()?;
            let exponent = self.unary()?;
            self.depth -= 1;
            return Ok(Node::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Node, ExprError> {
        let Some(spanned) = self.advance().cloned() else {
            return Err(ExprError::UnexpectedEnd);
        };
        match spanned.token {
            Token::Number(value) => Ok(Node::Number(value)),
            Token::Ident(name) => {
                if matches!(self.peek_token(), Some(Token::LParen)) {
                    return Err(ExprError::Forbidden {
                        construct: format!("function call '{name}(...)'"),
                        position: spanned.position,
                    });
                }
                Ok(Node::Name(name))
            }
            Token::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(ExprError::Syntax {
                        position: other.position,
                        message: format!("expected ')' but found {}", other.token.describe()),
                    }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            other => Err(ExprError::Syntax {
                position: spanned.position,
                message: format!("unexpected {}", other.describe()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(source: &str) -> Result<Node, ExprError> {
        parse(&tokenize(source)?)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let node = parse_str("1 + 2 * 3").unwrap();
        let Node::Binary { op, rhs, .. } = node else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*rhs, Node::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn unary_minus_applies_after_power() {
        let node = parse_str("-2**2").unwrap();
        let Node::Neg(inner) = node else {
            panic!("expected negation at the root");
        };
        assert!(matches!(*inner, Node::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn call_syntax_is_forbidden() {
        let err = parse_str("sqrt(s)").unwrap_err();
        assert!(matches!(err, ExprError::Forbidden { position: 0, .. }));
    }

    #[test]
    fn unbalanced_parentheses() {
        assert_eq!(parse_str("(s + 1").unwrap_err(), ExprError::UnexpectedEnd);
        assert!(matches!(
            parse_str("s + 1)").unwrap_err(),
            ExprError::Syntax { position: 5, .. }
        ));
    }

    #[test]
    fn empty_input_is_unexpected_end() {
        assert_eq!(parse_str("").unwrap_err(), ExprError::UnexpectedEnd);
        assert_eq!(parse_str("2 *").unwrap_err(), ExprError::UnexpectedEnd);
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = format!("{}s{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(parse_str(&deep).unwrap_err(), ExprError::TooDeep(MAX_DEPTH));
        let minus = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert_eq!(parse_str(&minus).unwrap_err(), ExprError::TooDeep(MAX_DEPTH));
    }
}
