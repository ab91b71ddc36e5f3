//! Interpolation of `%{...}` references in table values

use hieraldap_core::{Error, LookupOptions, Result, Value};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Map;
use std::collections::HashMap;

/// Resolves embedded references inside a table value
pub trait Interpolator: Send + Sync {
    fn interpolate(&self, value: &Value, options: &LookupOptions) -> Result<Value>;
}

static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\{([^}]*)\}").expect("interpolation pattern is valid"));

static FUNCTION_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\w+)\(\s*(?:'([^']*)'|"([^"]*)")\s*\)$"#).expect("function pattern is valid")
});

/// Substitutes scope variables.
///
/// Supported forms:
/// - `%{name}` and `%{::name}`: variable from the options' `variables`,
///   then from the interpolator's own scope; unknown names expand to ""
/// - `%{scope('name')}`: same as `%{name}`
/// - `%{literal('text')}`: the text itself
/// - `%{}`: empty string
///
/// Strings nested in lists and mappings are interpolated too, mapping keys
/// included.
#[derive(Debug, Clone, Default)]
pub struct ScopeInterpolator {
    scope: HashMap<String, String>,
}

impl ScopeInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(scope: HashMap<String, String>) -> Self {
        Self { scope }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.scope.insert(name.into(), value.into());
    }

    fn variable<'a>(&'a self, name: &str, options: &'a LookupOptions) -> &'a str {
        let name = name.trim().trim_start_matches("::");
        options
            .variables
            .get(name)
            .or_else(|| self.scope.get(name))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn expand(&self, expr: &str, options: &LookupOptions) -> Result<String> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Ok(String::new());
        }

        if let Some(call) = FUNCTION_CALL.captures(expr) {
            let arg = call
                .get(2)
                .or_else(|| call.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();

            return match &call[1] {
                "literal" => Ok(arg.to_string()),
                "scope" => Ok(self.variable(arg, options).to_string()),
                other => Err(Error::InterpolationFailed(format!(
                    "unsupported interpolation function '{}' in '%{{{}}}'",
                    other, expr
                ))),
            };
        }

        if expr.contains('(') {
            return Err(Error::InterpolationFailed(format!(
                "malformed interpolation '%{{{}}}'",
                expr
            )));
        }

        Ok(self.variable(expr, options).to_string())
    }

    fn interpolate_str(&self, s: &str, options: &LookupOptions) -> Result<String> {
        if !s.contains("%{") {
            return Ok(s.to_string());
        }

        let mut failure = None;
        let out = REFERENCE.replace_all(s, |caps: &Captures| match self.expand(&caps[1], options) {
            Ok(text) => text,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(out.into_owned()),
        }
    }
}

impl Interpolator for ScopeInterpolator {
    fn interpolate(&self, value: &Value, options: &LookupOptions) -> Result<Value> {
        match value {
            Value::String(s) => Ok(Value::String(self.interpolate_str(s, options)?)),
            Value::Array(items) => items
                .iter()
                .map(|v| self.interpolate(v, options))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(self.interpolate_str(k, options)?, self.interpolate(v, options)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }
}
