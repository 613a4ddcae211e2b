//! # wl-expr
//!
//! A restricted arithmetic language for per-student load functions such as
//! `5 + 2*s` or `0.5 * s**0.8`.
//!
//! The language has real-number literals, names bound by the caller, the binary
//! operators `+ - * / **`, unary `-`/`+`, and parentheses. Calls, attribute
//! access, subscripts, comparisons, assignment, strings and keywords are all
//! rejected. Exponentiation is bounded by a configurable result bit-width and
//! division by zero is an error rather than infinity.
//!
//! Conventional names are [`STUDENTS`] (`s`), [`LECTURES`] (`l`) and
//! [`EXAMS`] (`e`).

mod error;
mod eval;
mod lexer;
mod parser;

pub use error::ExprError;
pub use eval::{Bindings, EXAMS, LECTURES, Limits, STUDENTS};

/// A parsed expression, reusable across evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: parser::Node,
}

impl Expression {
    /// Parse an expression.
    ///
    /// # Errors
    ///
    /// Returns `ExprError` for anything outside the permitted grammar.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let tokens = lexer::tokenize(source)?;
        let root = parser::parse(&tokens)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against the given bindings.
    ///
    /// An empty set of bindings evaluates to `0.0`.
    ///
    /// # Errors
    ///
    /// Returns `ExprError` for unbound names, division by zero, oversized
    /// powers, and non-finite results.
    pub fn eval(&self, vars: &Bindings, limits: Limits) -> Result<f64, ExprError> {
        if vars.is_empty() {
            return Ok(0.0);
        }
        eval::eval(&self.root, vars, limits)
    }
}

/// Parse and evaluate in one step.
///
/// # Errors
///
/// Returns `ExprError` if parsing or evaluation fails.
pub fn evaluate(source: &str, vars: &Bindings, limits: Limits) -> Result<f64, ExprError> {
    Expression::parse(source)?.eval(vars, limits)
}

/// Check an expression by trial evaluation with `s = 1`.
///
/// `l` and `e` are bound to 1 as well, so functions that scale by lecture or
/// exam count validate too. Returns `(true, "OK")` or `(false, message)` where the message is the
/// error text.
#[must_use]
pub fn is_valid(source: &str, limits: Limits) -> (bool, String) {
    let trial = Bindings::new()
        .with(STUDENTS, 1)
        .with(LECTURES, 1)
        .with(EXAMS, 1);
    match evaluate(source, &trial, limits) {
        Ok(_) => (true, "OK".to_string()),
        Err(error) => (false, error.to_string()),
    }
}
