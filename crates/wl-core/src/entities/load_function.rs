use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named per-student scaling expression, e.g. `2*s`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LoadFunction {
    pub name: String,
    pub expression: String,
    pub plot_minimum: Option<f64>,
    pub plot_maximum: Option<f64>,
}

impl LoadFunction {
    #[must_use]
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            plot_minimum: None,
            plot_maximum: None,
        }
    }
}
