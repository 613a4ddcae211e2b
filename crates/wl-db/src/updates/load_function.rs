//! Load function update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadFunctionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_minimum: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_maximum: Option<Option<f64>>,
}

#[derive(Debug, Default)]
pub struct LoadFunctionUpdateBuilder(LoadFunctionUpdate);

impl LoadFunctionUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.0.expression = Some(expression.into());
        self
    }

    #[must_use]
    pub const fn plot_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.0.plot_minimum = Some(minimum);
        self.0.plot_maximum = Some(maximum);
        self
    }

    #[must_use]
    pub fn build(self) -> LoadFunctionUpdate {
        self.0
    }
}
