//! Direct-key grammar
//!
//! A direct key looks like `ldap:///<base>?<attrs>?<scope>?<filter>`.
//! The field order is base, attributes, scope, filter. This differs from
//! the RFC 4516 URL order and is kept as-is so existing hierarchies keep
//! resolving the same way.

use crate::{Error, Result, DEFAULT_FILTER, PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Search breadth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The base entry itself
    Base,
    /// Immediate children of the base
    OneLevel,
    /// The base and all descendants
    #[default]
    Subtree,
}

impl Scope {
    /// Translate a scope token from a direct key
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "" | "sub" => Ok(Scope::Subtree),
            "one" => Ok(Scope::OneLevel),
            "base" => Ok(Scope::Base),
            other => Err(Error::InvalidScope(other.to_string())),
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Scope::Base => "base",
            Scope::OneLevel => "one",
            Scope::Subtree => "sub",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A parsed direct key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryExpression {
    pub base: String,
    pub scope: Scope,
    pub filter: String,
    /// Requested attributes; empty means all attributes
    pub attributes: Vec<String>,
}

impl QueryExpression {
    /// Parse a direct key (with or without the `ldap:///` prefix)
    pub fn parse(key: &str) -> Result<Self> {
        let rest = key.strip_prefix(PREFIX).unwrap_or(key);
        // A repeated prefix keeps the last non-empty segment between prefixes.
        let rest = rest.rsplit(PREFIX).find(|s| !s.is_empty()).unwrap_or_default();

        let mut fields = rest.split('?');
        let base = fields.next().unwrap_or_default();
        let attributes = fields.next().unwrap_or_default();
        let scope = fields.next().unwrap_or_default();
        let filter = fields.next().unwrap_or_default();

        Ok(Self {
            base: base.to_string(),
            scope: Scope::from_token(scope)?,
            filter: parse_filter(filter),
            attributes: parse_attributes(attributes),
        })
    }

    /// Whether every attribute of matching entries is requested
    pub fn all_attributes(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}?{}?{}?{}",
            PREFIX,
            self.base,
            self.attributes.join(","),
            self.scope,
            self.filter
        )
    }
}

fn parse_filter(field: &str) -> String {
    if field.is_empty() {
        DEFAULT_FILTER.to_string()
    } else {
        field.to_string()
    }
}

fn parse_attributes(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// A lookup key classified by shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// The key encodes a full directory query
    Direct(QueryExpression),
    /// The key names an entry of the indirection table
    Indirect(String),
}

impl LookupKey {
    /// Whether a raw key is a direct query
    pub fn is_direct(key: &str) -> bool {
        key.starts_with(PREFIX)
    }

    /// Classify and, for direct keys, parse a raw key
    pub fn classify(key: &str) -> Result<Self> {
        if Self::is_direct(key) {
            QueryExpression::parse(key).map(LookupKey::Direct)
        } else {
            Ok(LookupKey::Indirect(key.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_fields() {
        let q = QueryExpression::parse("ldap:///dc=example,dc=com?cn,mail?one?(objectClass=person)")
            .unwrap();

        assert_eq!(q.base, "dc=example,dc=com");
        assert_eq!(q.attributes, vec!["cn", "mail"]);
        assert_eq!(q.scope, Scope::OneLevel);
        assert_eq!(q.filter, "(objectClass=person)");
    }

    #[test]
    fn test_parse_base_only() {
        let q = QueryExpression::parse("ldap:///dc=example,dc=com").unwrap();

        assert_eq!(q.base, "dc=example,dc=com");
        assert_eq!(q.scope, Scope::Subtree);
        assert_eq!(q.filter, "objectClass=*");
        assert!(q.attributes.is_empty());
        assert!(q.all_attributes());
    }

    #[test]
    fn test_parse_empty_fields_take_defaults() {
        let q = QueryExpression::parse("ldap:///ou=hosts???").unwrap();
        assert!(q.attributes.is_empty());
        assert_eq!(q.scope, Scope::Subtree);
        assert_eq!(q.filter, "objectClass=*");
    }

    #[test]
    fn test_attributes_are_trimmed() {
        let q = QueryExpression::parse("ldap:///ou=hosts? hostname , ipHostNumber ,?base").unwrap();
        assert_eq!(q.attributes, vec!["hostname", "ipHostNumber"]);
        assert_eq!(q.scope, Scope::Base);
    }

    #[test]
    fn test_repeated_prefix_keeps_last_segment() {
        let q = QueryExpression::parse("ldap:///ignored?x?base?y=z ldap:///ou=people?uid").unwrap();
        assert_eq!(q.base, "ou=people");
        assert_eq!(q.attributes, vec!["uid"]);
    }

    #[test]
    fn test_trailing_prefix_is_skipped() {
        let q = QueryExpression::parse("ldap:///ou=sites?labeledURI?one?labeledURI=ldap:///").unwrap();
        assert_eq!(q.base, "ou=sites");
        assert_eq!(q.attributes, vec!["labeledURI"]);
        assert_eq!(q.scope, Scope::OneLevel);
        assert_eq!(q.filter, "labeledURI=");

        let q = QueryExpression::parse("ldap:///").unwrap();
        assert_eq!(q.base, "");
        assert_eq!(q.scope, Scope::Subtree);
    }

    #[test]
    fn test_invalid_scope() {
        let err = QueryExpression::parse("ldap:///dc=example,dc=com?cn?wide").unwrap_err();
        assert!(matches!(err, Error::InvalidScope(ref s) if s == "wide"));
        assert!(err.to_string().contains("wide"));
    }

    #[test]
    fn test_scope_tokens() {
        assert_eq!(Scope::from_token("").unwrap(), Scope::Subtree);
        assert_eq!(Scope::from_token("sub").unwrap(), Scope::Subtree);
        assert_eq!(Scope::from_token("one").unwrap(), Scope::OneLevel);
        assert_eq!(Scope::from_token("base").unwrap(), Scope::Base);
        assert!(Scope::from_token("SUB").is_err());
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            LookupKey::classify("ldap:///ou=hosts?hostname").unwrap(),
            LookupKey::Direct(_)
        ));
        assert_eq!(
            LookupKey::classify("webserver").unwrap(),
            LookupKey::Indirect("webserver".to_string())
        );
        // Only the exact prefix counts
        assert!(!LookupKey::is_direct("ldap://host/ou=hosts"));
    }

    #[test]
    fn test_display() {
        let q = QueryExpression::parse("ldap:///ou=hosts?cn, mail?one").unwrap();
        assert_eq!(q.to_string(), "ldap:///ou=hosts?cn,mail?one?objectClass=*");
    }
}
