//! Option loading for the hieraldap CLI
//!
//! Default options file: ~/.hieraldap/options.yaml
//!
//! Example:
//! ```yaml
//! host: ldap.example.com
//! use_ssl: true
//! bind_dn: cn=puppet,ou=services,dc=example,dc=com
//! bind_method: simple
//! path: /etc/puppetlabs/code/data/ldap.yaml
//! variables:
//!   environment: production
//! ```
//!
//! Precedence, lowest first: defaults, options file, `HIERALDAP_*`
//! environment variables, command-line flags.

use anyhow::{Context, Result};
use clap::Args;
use hieraldap_core::LookupOptions;
use std::path::{Path, PathBuf};

/// Connection and table flags shared by all commands
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Directory server host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Directory server port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Connect with LDAPS
    #[arg(long, global = true)]
    pub use_ssl: bool,

    /// Upgrade the connection with STARTTLS
    #[arg(long, global = true)]
    pub start_tls: bool,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub skip_tls_verify: bool,

    /// Bind DN
    #[arg(long, global = true)]
    pub bind_dn: Option<String>,

    /// Bind password (prefer HIERALDAP_BIND_PASSWORD)
    #[arg(long, global = true)]
    pub bind_password: Option<String>,

    /// Bind method: simple, none or sasl
    #[arg(long, global = true)]
    pub bind_method: Option<String>,

    /// Indirection table (YAML)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Connection timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl ConnectionArgs {
    /// Override options with the flags that were given
    pub fn apply(&self, options: &mut LookupOptions) {
        if let Some(host) = &self.host {
            options.host = host.clone();
        }
        if let Some(port) = self.port {
            options.port = Some(port);
        }
        if self.use_ssl {
            options.use_ssl = true;
        }
        if self.start_tls {
            options.start_tls = true;
        }
        if self.skip_tls_verify {
            options.skip_tls_verify = true;
        }
        if let Some(bind_dn) = &self.bind_dn {
            options.bind_dn = bind_dn.clone();
        }
        if let Some(password) = &self.bind_password {
            options.bind_password = password.clone();
        }
        if let Some(method) = &self.bind_method {
            options.bind_method = method.clone();
        }
        if let Some(path) = &self.path {
            options.path = Some(path.clone());
        }
        if let Some(timeout) = self.timeout {
            options.timeout_seconds = timeout;
        }
    }
}

/// Get config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .context("Could not determine home directory")?
        .home_dir()
        .to_path_buf();

    Ok(home.join(".hieraldap"))
}

/// Get default options file path
pub fn default_options_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("options.yaml"))
}

/// Load options from file, environment and flags
pub fn load_options(file: Option<&Path>, args: &ConnectionArgs) -> Result<LookupOptions> {
    let file = match file {
        Some(path) => Some(path.to_path_buf()),
        None => default_options_path().ok().filter(|p| p.exists()),
    };

    load_options_with(file.as_deref(), args, |name| std::env::var(name).ok())
}

fn load_options_with<F>(file: Option<&Path>, args: &ConnectionArgs, env: F) -> Result<LookupOptions>
where
    F: Fn(&str) -> Option<String>,
{
    let mut options = match file {
        Some(path) => LookupOptions::from_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => LookupOptions::default(),
    };

    options.apply_env_with(env)?;
    args.apply(&mut options);

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let options = load_options_with(None, &ConnectionArgs::default(), no_env).unwrap();
        assert_eq!(options.host, "localhost");
        assert!(options.path.is_none());
    }

    #[test]
    fn test_precedence() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "host: from-file\nbind_dn: cn=file\nport: 1389").unwrap();

        let args = ConnectionArgs {
            bind_dn: Some("cn=flag".to_string()),
            ..Default::default()
        };
        let env = |name: &str| match name {
            "HIERALDAP_HOST" => Some("from-env".to_string()),
            "HIERALDAP_BIND_DN" => Some("cn=env".to_string()),
            _ => None,
        };

        let options = load_options_with(Some(file.path()), &args, env).unwrap();
        assert_eq!(options.host, "from-env");
        assert_eq!(options.bind_dn, "cn=flag");
        assert_eq!(options.port, Some(1389));
    }

    #[test]
    fn test_bad_file() {
        let err = load_options_with(
            Some(Path::new("/nonexistent/options.yaml")),
            &ConnectionArgs::default(),
            no_env,
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/options.yaml"));
    }

    #[test]
    fn test_flags_enable_tls() {
        let args = ConnectionArgs {
            use_ssl: true,
            timeout: Some(3),
            ..Default::default()
        };
        let options = load_options_with(None, &args, no_env).unwrap();
        assert!(options.use_ssl);
        assert_eq!(options.timeout_seconds, 3);
        assert_eq!(options.endpoint().port, 636);
    }
}
