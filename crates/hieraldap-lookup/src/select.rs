//! Projection of search results onto one attribute

use hieraldap_core::{Error, Result, Value};

/// Values of `attr` across a list of result mappings, flattened.
///
/// Mappings without `attr`, and values that are neither strings nor lists
/// of strings, contribute nothing.
pub fn select(list: &[Value], attr: &str) -> Vec<String> {
    let mut out = Vec::new();
    for item in list {
        if let Some(value) = item.as_object().and_then(|m| m.get(attr)) {
            flatten_into(value, &mut out);
        }
    }
    out
}

/// [`select`] over a lookup result, which must be a list
pub fn select_value(value: &Value, attr: &str) -> Result<Vec<String>> {
    match value {
        Value::Array(list) => Ok(select(list, attr)),
        other => Err(Error::InvalidOptions(format!(
            "select expects a list of mappings, got {}",
            type_name(other)
        ))),
    }
}

fn flatten_into(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| flatten_into(v, out)),
        _ => {}
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
