use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wl_core::responses::RecalculateResponse;

    use super::render;
    use crate::cli::OutputFormat;

    fn response() -> RecalculateResponse {
        RecalculateResponse {
            success: true,
            cycles: 2,
            target_load_per_fte: 900,
        }
    }

    #[test]
    fn raw_is_single_line() {
        let rendered = render(&response(), OutputFormat::Raw).expect("render should succeed");
        assert_eq!(
            rendered,
            r#"{"success":true,"cycles":2,"target_load_per_fte":900}"#
        );
    }

    #[test]
    fn json_is_pretty() {
        let rendered = render(&response(), OutputFormat::Json).expect("render should succeed");
        assert!(rendered.contains("\n  \"cycles\": 2"), "{rendered}");
    }
}
