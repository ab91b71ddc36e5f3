//! Indirection table loading

use hieraldap_core::{Error, Result, Value};
use serde_json::{Map, Number};
use serde_yaml::Value as Yaml;
use std::path::Path;

/// Raw indirection table: key -> uninterpolated value, in file order
pub type RawTable = Map<String, Value>;

/// Decodes configuration content into a mapping
pub trait ConfigLoader: Send + Sync {
    /// Parse `content` read from `path`.
    ///
    /// Returns `Ok(None)` when the content is well formed but is not a
    /// mapping; syntax errors fail with [`Error::ConfigParseFailed`].
    fn load_mapping(&self, path: &Path, content: &str) -> Result<Option<RawTable>>;
}

/// YAML loader backed by serde_yaml
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConfigLoader;

impl ConfigLoader for YamlConfigLoader {
    fn load_mapping(&self, path: &Path, content: &str) -> Result<Option<RawTable>> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: Yaml = serde_yaml::from_str(content).map_err(|e| Error::ConfigParseFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        match untag(data) {
            Yaml::Mapping(mapping) => Ok(Some(
                mapping
                    .into_iter()
                    .map(|(k, v)| (key_to_string(k), yaml_to_value(v)))
                    .collect(),
            )),
            _ => Ok(None),
        }
    }
}

fn untag(value: Yaml) -> Yaml {
    match value {
        Yaml::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

/// Convert a YAML value to a data value, turning mapping keys into strings
pub(crate) fn yaml_to_value(value: Yaml) -> Value {
    match untag(value) {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_value).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (key_to_string(k), yaml_to_value(v)))
                .collect(),
        ),
        Yaml::Tagged(_) => Value::Null,
    }
}

/// Mapping keys become strings; a leading `:` (symbol-style key) is dropped
fn key_to_string(key: Yaml) -> String {
    match untag(key) {
        Yaml::String(s) => match s.strip_prefix(':') {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => s,
        },
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
