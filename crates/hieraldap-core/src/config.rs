//! Configuration for hieraldap
//!
//! [`LookupOptions`] is the options hash of one hierarchy level, e.g.:
//!
//! ```yaml
//! host: ldap.example.com
//! port: 636
//! use_ssl: true
//! bind_dn: cn=puppet,ou=services,dc=example,dc=com
//! bind_password: secret
//! bind_method: simple
//! path: /etc/puppetlabs/code/data/ldap.yaml
//! ```

use crate::types::{BindMethod, Credentials, Endpoint};
use crate::utils::{parse_bool, redact};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options of one lookup backend level
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LookupOptions {
    /// Directory server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Directory server port (389, or 636 with `use_ssl`)
    #[serde(default)]
    pub port: Option<u16>,

    /// Connect with LDAPS
    #[serde(default)]
    pub use_ssl: bool,

    /// Upgrade a plain connection with STARTTLS
    #[serde(default)]
    pub start_tls: bool,

    /// Skip TLS certificate verification (not recommended for production)
    #[serde(default)]
    pub skip_tls_verify: bool,

    /// Bind DN
    #[serde(default)]
    pub bind_dn: String,

    /// Bind password
    #[serde(default)]
    pub bind_password: String,

    /// Bind method token: "simple", "none" or "sasl"
    #[serde(default)]
    pub bind_method: String,

    /// Indirection table used for keys that are not direct queries
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Scope variables available to `%{name}` interpolation
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            use_ssl: false,
            start_tls: false,
            skip_tls_verify: false,
            bind_dn: String::new(),
            bind_password: String::new(),
            bind_method: String::new(),
            path: None,
            timeout_seconds: default_timeout(),
            variables: HashMap::new(),
        }
    }
}

impl fmt::Debug for LookupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_ssl", &self.use_ssl)
            .field("start_tls", &self.start_tls)
            .field("skip_tls_verify", &self.skip_tls_verify)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &redact(&self.bind_password))
            .field("bind_method", &self.bind_method)
            .field("path", &self.path)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("variables", &self.variables)
            .finish()
    }
}

impl LookupOptions {
    /// Load options from a YAML or TOML file (chosen by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigReadFailed {
            path: display.clone(),
            source: e,
        })?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                path: display,
                message: e.to_string(),
            })
        } else {
            serde_yaml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                path: display,
                message: e.to_string(),
            })
        }
    }

    /// Defaults overridden by `HIERALDAP_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        options.apply_env()?;
        Ok(options)
    }

    /// Override fields from `HIERALDAP_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Override fields from an environment lookup function
    pub fn apply_env_with<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("HIERALDAP_HOST") {
            self.host = host;
        }
        if let Some(port) = var("HIERALDAP_PORT") {
            let port = port
                .parse()
                .map_err(|_| Error::InvalidOptions(format!("invalid HIERALDAP_PORT '{}'", port)))?;
            self.port = Some(port);
        }
        if let Some(use_ssl) = var("HIERALDAP_USE_SSL") {
            self.use_ssl = parse_bool(&use_ssl).ok_or_else(|| {
                Error::InvalidOptions(format!("invalid HIERALDAP_USE_SSL '{}'", use_ssl))
            })?;
        }
        if let Some(bind_dn) = var("HIERALDAP_BIND_DN") {
            self.bind_dn = bind_dn;
        }
        if let Some(password) = var("HIERALDAP_BIND_PASSWORD") {
            self.bind_password = password;
        }
        if let Some(method) = var("HIERALDAP_BIND_METHOD") {
            self.bind_method = method;
        }
        if let Some(path) = var("HIERALDAP_PATH") {
            self.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Validate the options needed to reach the directory
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidOptions("host is required".to_string()));
        }
        if self.port == Some(0) {
            return Err(Error::InvalidOptions("port must not be 0".to_string()));
        }
        if self.use_ssl && self.start_tls {
            return Err(Error::InvalidOptions(
                "use_ssl and start_tls are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory endpoint described by these options
    pub fn endpoint(&self) -> Endpoint {
        let mut endpoint = Endpoint::new(self.host.clone(), self.port, self.use_ssl);
        endpoint.start_tls = self.start_tls;
        endpoint.skip_tls_verify = self.skip_tls_verify;
        endpoint.timeout = Duration::from_secs(self.timeout_seconds);
        endpoint
    }

    /// Bind credentials; fails on an unknown `bind_method` token
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            bind_dn: self.bind_dn.clone(),
            bind_password: self.bind_password.clone(),
            method: BindMethod::from_token(&self.bind_method)?,
        })
    }
}

/// Log output settings for the command-line tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = LookupOptions::default();
        assert_eq!(options.host, "localhost");
        assert_eq!(options.endpoint().port, 389);
        assert_eq!(options.credentials().unwrap().method, BindMethod::Simple);
        assert!(options.path.is_none());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "host: ldap.example.com\nuse_ssl: true\nbind_dn: cn=admin\nbind_method: none\npath: /tmp/ldap.yaml"
        )
        .unwrap();

        let options = LookupOptions::from_file(file.path()).unwrap();
        assert_eq!(options.host, "ldap.example.com");
        assert_eq!(options.endpoint().port, 636);
        assert_eq!(options.endpoint().url(), "ldaps://ldap.example.com:636");
        assert_eq!(options.credentials().unwrap().method, BindMethod::None);
        assert_eq!(options.path, Some(PathBuf::from("/tmp/ldap.yaml")));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "host = \"ldap.internal\"\nport = 1389").unwrap();

        let options = LookupOptions::from_file(file.path()).unwrap();
        assert_eq!(options.host, "ldap.internal");
        assert_eq!(options.port, Some(1389));
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "host: [unclosed").unwrap();

        let err = LookupOptions::from_file(file.path()).unwrap_err();
        assert_eq!(err.code(), "ConfigParseFailed");
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [
            ("HIERALDAP_HOST", "dir.example.org"),
            ("HIERALDAP_PORT", "10389"),
            ("HIERALDAP_USE_SSL", "yes"),
            ("HIERALDAP_BIND_METHOD", "sasl"),
            ("HIERALDAP_PATH", "/srv/ldap.yaml"),
        ]
        .into_iter()
        .collect();

        let mut options = LookupOptions::default();
        options
            .apply_env_with(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(options.host, "dir.example.org");
        assert_eq!(options.port, Some(10389));
        assert!(options.use_ssl);
        assert_eq!(options.bind_method, "sasl");
        assert_eq!(options.path, Some(PathBuf::from("/srv/ldap.yaml")));
    }

    #[test]
    fn test_apply_env_rejects_bad_port() {
        let mut options = LookupOptions::default();
        let err = options
            .apply_env_with(|k| (k == "HIERALDAP_PORT").then(|| "ldap".to_string()))
            .unwrap_err();
        assert_eq!(err.code(), "InvalidOptions");
    }

    #[test]
    fn test_validate() {
        let mut options = LookupOptions::default();
        assert!(options.validate().is_ok());

        options.use_ssl = true;
        options.start_tls = true;
        assert!(options.validate().is_err());

        options.start_tls = false;
        options.host = String::new();
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_bind_method() {
        let options = LookupOptions {
            bind_method: "digest".to_string(),
            ..Default::default()
        };
        assert_eq!(options.credentials().unwrap_err().code(), "InvalidBindMethod");
    }

    #[test]
    fn test_debug_hides_password() {
        let options = LookupOptions {
            bind_password: "s3cret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", options).contains("s3cret"));
    }
}
