use wl_config::WorkloadConfig;
use wl_core::responses::ExpressionCheckResponse;
use wl_engine::Engine;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CheckExpressionArgs;
use crate::output::output;

/// Handle `workload check-expression`; fails when the expression is rejected.
pub fn handle(
    args: &CheckExpressionArgs,
    config: &WorkloadConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = check(&args.expression, config);
    output(&response, flags.format)?;
    if !response.valid {
        anyhow::bail!("invalid expression: {}", response.message);
    }
    Ok(())
}

fn check(expression: &str, config: &WorkloadConfig) -> ExpressionCheckResponse {
    let (valid, message) = Engine::new(config.engine).check_expression(expression);
    ExpressionCheckResponse {
        expression: expression.to_string(),
        valid,
        message,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn valid_expression_reports_ok() {
        let response = check("2*s + 5", &WorkloadConfig::default());
        assert!(response.valid);
        assert_eq!(response.message, "OK");
    }

    #[test]
    fn rejected_expression_carries_parser_message() {
        let response = check("__import__('os')", &WorkloadConfig::default());
        assert!(!response.valid);
        assert!(!response.message.is_empty());
        assert_ne!(response.message, "OK");
    }
}
