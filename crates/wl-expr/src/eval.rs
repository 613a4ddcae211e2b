//! Tree-walking evaluator.

use std::collections::BTreeMap;

use crate::error::ExprError;
use crate::parser::{BinaryOp, Node};

/// Student count.
pub const STUDENTS: &str = "s";
/// Lecture count.
pub const LECTURES: &str = "l";
/// Exam count.
pub const EXAMS: &str = "e";

/// Name to integer bindings supplied to an expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, i64>);

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Evaluation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest permitted bit-width of an exponentiation result.
    pub max_power_bits: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_power_bits: 64 }
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn eval(node: &Node, vars: &Bindings, limits: Limits) -> Result<f64, ExprError> {
    let value = match node {
        Node::Number(value) => *value,
        Node::Name(name) => vars
            .get(name)
            .map(|v| v as f64)
            .ok_or_else(|| ExprError::UnknownName(name.clone()))?,
        Node::Neg(inner) => -eval(inner, vars, limits)?,
        Node::Binary { op, lhs, rhs } => {
            let a = eval(lhs, vars, limits)?;
            let b = eval(rhs, vars, limits)?;
            match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => {
                    if b == 0.0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    a / b
                }
                BinaryOp::Pow => power(a, b, limits)?,
            }
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExprError::NonFinite)
    }
}

fn power(base: f64, exponent: f64, limits: Limits) -> Result<f64, ExprError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(ExprError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(ExprError::NonFinite);
    }
    let magnitude = base.abs();
    if magnitude > 1.0 && exponent > 0.0 {
        let bits = exponent * magnitude.log2();
        if bits > f64::from(limits.max_power_bits) {
            return Err(ExprError::PowerTooLarge {
                max_bits: limits.max_power_bits,
            });
        }
    }
    Ok(base.powf(exponent))
}
