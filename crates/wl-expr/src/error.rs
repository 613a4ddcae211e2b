//! Expression errors.
//!
//! Every variant means the expression is not acceptable. The `Display` text is
//! shown to users verbatim, so it names the offending token and position.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Malformed input.
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Input ended where an operand or `)` was expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Identifier not bound in the supplied variables.
    #[error("unknown name '{0}'")]
    UnknownName(String),

    /// A construct outside the permitted language.
    #[error("{construct} is not permitted (position {position})")]
    Forbidden { construct: String, position: usize },

    #[error("division by zero")]
    DivisionByZero,

    /// Exponentiation whose result would exceed the configured bit-width.
    #[error("exponentiation result exceeds {max_bits} bits")]
    PowerTooLarge { max_bits: u32 },

    /// Result is infinite, NaN or complex.
    #[error("expression does not produce a finite real number")]
    NonFinite,

    /// Parentheses or unary operators nested too deeply.
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    /// More tokens than one expression may hold.
    #[error("expression longer than {0} tokens")]
    TooLong(usize),
}
