//! Utility functions for hieraldap CLI

use crate::OutputFormat;
use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;

/// Render a serializable value in the requested format
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
        OutputFormat::Text => Ok(render_text(&serde_json::to_value(value)?)),
    }
}

/// Plain text: scalars as-is, lists one item per line, anything else as JSON
fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => items
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

/// Parse a `name=value` scope variable
pub fn parse_var(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => bail!("Invalid variable '{}': expected name=value", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_text() {
        assert_eq!(
            render(&json!(["web01", "web02"]), OutputFormat::Text).unwrap(),
            "web01\nweb02"
        );
        assert_eq!(render(&json!("x"), OutputFormat::Text).unwrap(), "x");
        assert!(render(&json!([{"dn": "cn=a"}]), OutputFormat::Text)
            .unwrap()
            .contains("\"dn\""));
    }

    #[test]
    fn test_render_yaml() {
        let out = render(&json!({"dn": "cn=a", "cn": ["a"]}), OutputFormat::Yaml).unwrap();
        assert!(out.starts_with("dn: cn=a"));
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("environment=production").unwrap(),
            ("environment".to_string(), "production".to_string())
        );
        assert_eq!(parse_var("empty=").unwrap().1, "");
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }
}
