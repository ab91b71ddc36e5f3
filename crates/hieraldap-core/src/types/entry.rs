//! Directory search results

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Name of the synthetic member holding the distinguished name
pub const DN_ATTRIBUTE: &str = "dn";

/// One search result entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// Distinguished name
    pub dn: String,

    /// Attribute values in presentation order
    pub attributes: Vec<(String, Vec<String>)>,
}

impl Entry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.push((name.into(), values));
        self
    }

    /// Build an entry from unordered attributes.
    ///
    /// Attributes named in `requested` come first, in that order (names
    /// compare case-insensitively). Everything else follows sorted by name.
    pub fn from_unordered<I>(dn: impl Into<String>, attrs: I, requested: &[String]) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut rest: Vec<(String, Vec<String>)> = attrs.into_iter().collect();
        rest.sort_by(|a, b| a.0.cmp(&b.0));

        let mut attributes = Vec::with_capacity(rest.len());
        for wanted in requested {
            if let Some(pos) = rest.iter().position(|(n, _)| n.eq_ignore_ascii_case(wanted)) {
                attributes.push(rest.remove(pos));
            }
        }
        attributes.extend(rest);

        Self {
            dn: dn.into(),
            attributes,
        }
    }

    /// Values of an attribute (case-insensitive name)
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// First value of an attribute
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(|s| s.as_str())
    }

    /// Convert into a data value: `{"dn": ..., "<attr>": [...], ...}`
    pub fn into_value(self) -> Value {
        let mut map = Map::with_capacity(self.attributes.len() + 1);
        map.insert(DN_ATTRIBUTE.to_string(), Value::String(self.dn));
        for (name, values) in self.attributes {
            map.insert(name, Value::Array(values.into_iter().map(Value::String).collect()));
        }
        Value::Object(map)
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + 1))?;
        map.serialize_entry(DN_ATTRIBUTE, &self.dn)?;
        for (name, values) in &self.attributes {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Convert an ordered result set into a data value
pub fn entries_to_value(entries: Vec<Entry>) -> Value {
    Value::Array(entries.into_iter().map(Entry::into_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs() -> Vec<(String, Vec<String>)> {
        vec![
            ("objectClass".to_string(), vec!["device".to_string()]),
            ("ipHostNumber".to_string(), vec!["10.0.0.1".to_string()]),
            ("cn".to_string(), vec!["web01".to_string()]),
        ]
    }

    #[test]
    fn test_requested_order_first() {
        let requested = vec!["CN".to_string(), "ipHostNumber".to_string()];
        let entry = Entry::from_unordered("cn=web01,ou=hosts", attrs(), &requested);

        let names: Vec<&str> = entry.attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["cn", "ipHostNumber", "objectClass"]);
    }

    #[test]
    fn test_unrequested_sorted() {
        let entry = Entry::from_unordered("cn=web01,ou=hosts", attrs(), &[]);
        let names: Vec<&str> = entry.attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["cn", "ipHostNumber", "objectClass"]);
        assert_eq!(entry.first("IPHOSTNUMBER"), Some("10.0.0.1"));
        assert!(entry.get("mail").is_none());
    }

    #[test]
    fn test_into_value_dn_first() {
        let entry = Entry::new("cn=web01,ou=hosts")
            .with_attribute("hostname", vec!["web01.example.com".to_string()]);

        let value = entry.clone().into_value();
        assert_eq!(
            value,
            json!({"dn": "cn=web01,ou=hosts", "hostname": ["web01.example.com"]})
        );
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["dn", "hostname"]);

        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }
}
