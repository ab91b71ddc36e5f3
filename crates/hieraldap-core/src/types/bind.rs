//! Bind credentials and directory endpoints

use crate::{Error, Result, DEFAULT_LDAPS_PORT, DEFAULT_LDAP_PORT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Authentication method used when binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BindMethod {
    /// Anonymous session, no bind request
    None,
    /// Simple bind with DN and password
    #[default]
    Simple,
    /// SASL bind
    Sasl,
}

impl BindMethod {
    /// Translate a `bind_method` option token
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "" | "simple" => Ok(BindMethod::Simple),
            "none" => Ok(BindMethod::None),
            "sasl" => Ok(BindMethod::Sasl),
            other => Err(Error::InvalidBindMethod(other.to_string())),
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            BindMethod::None => "none",
            BindMethod::Simple => "simple",
            BindMethod::Sasl => "sasl",
        }
    }
}

impl fmt::Display for BindMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Credentials for one bind
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub bind_dn: String,
    pub bind_password: String,
    pub method: BindMethod,
}

impl Credentials {
    pub fn anonymous() -> Self {
        Self {
            bind_dn: String::new(),
            bind_password: String::new(),
            method: BindMethod::None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &crate::utils::redact(&self.bind_password))
            .field("method", &self.method)
            .finish()
    }
}

/// Where and how to reach the directory server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Connect with LDAPS
    pub use_ssl: bool,
    /// Upgrade a plain connection with STARTTLS
    pub start_tls: bool,
    /// Skip TLS certificate verification (not recommended for production)
    pub skip_tls_verify: bool,
    pub timeout: Duration,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: Option<u16>, use_ssl: bool) -> Self {
        let port = port.unwrap_or(if use_ssl {
            DEFAULT_LDAPS_PORT
        } else {
            DEFAULT_LDAP_PORT
        });

        Self {
            host: host.into(),
            port,
            use_ssl,
            start_tls: false,
            skip_tls_verify: false,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "ldaps"
        } else {
            "ldap"
        }
    }

    /// Server URL, e.g. `ldaps://ldap.example.com:636`
    pub fn url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // IPv6 literal
            format!("{}://[{}]:{}", self.scheme(), self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme(), self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_method_tokens() {
        assert_eq!(BindMethod::from_token("").unwrap(), BindMethod::Simple);
        assert_eq!(BindMethod::from_token("simple").unwrap(), BindMethod::Simple);
        assert_eq!(BindMethod::from_token("none").unwrap(), BindMethod::None);
        assert_eq!(BindMethod::from_token("sasl").unwrap(), BindMethod::Sasl);

        let err = BindMethod::from_token("kerberos").unwrap_err();
        assert!(matches!(err, Error::InvalidBindMethod(ref m) if m == "kerberos"));
        assert!(err.to_string().contains("invalid bind_method 'kerberos'"));
    }

    #[test]
    fn test_endpoint_default_ports() {
        assert_eq!(Endpoint::new("ldap.example.com", None, false).port, 389);
        assert_eq!(Endpoint::new("ldap.example.com", None, true).port, 636);
        assert_eq!(Endpoint::new("ldap.example.com", Some(1389), true).port, 1389);
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            Endpoint::new("ldap.example.com", None, true).url(),
            "ldaps://ldap.example.com:636"
        );
        assert_eq!(Endpoint::new("::1", Some(389), false).url(), "ldap://[::1]:389");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            bind_dn: "cn=admin,dc=example,dc=com".to_string(),
            bind_password: "hunter2".to_string(),
            method: BindMethod::Simple,
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("cn=admin"));
    }
}
