//! Error types for hieraldap

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error carried as the structured cause of a directory failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    // Driver Errors
    #[error("{0}")]
    DriverUnavailable(String),

    // Key Grammar Errors
    #[error("ldap_lookup_key: invalid scope '{0}'")]
    InvalidScope(String),

    #[error("ldap_lookup_key: invalid bind_method '{0}'")]
    InvalidBindMethod(String),

    // Directory Errors
    #[error("Error '{source}' in ldap_lookup_key({key})")]
    DirectoryOperationFailed {
        key: String,
        #[source]
        source: BoxError,
    },

    // Configuration Errors
    #[error("Unable to parse {path}: {message}")]
    ConfigParseFailed { path: String, message: String },

    #[error("Unable to read {path}: {source}")]
    ConfigReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'ldap_lookup_key': 'path' must be declared in the options when looking up indirect keys")]
    MissingConfigPath,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    // Resolution Errors
    #[error("ldap_lookup_key: cyclic indirection {}", .chain.join(" -> "))]
    CyclicIndirection { chain: Vec<String> },

    #[error("Interpolation failed: {0}")]
    InterpolationFailed(String),
}

impl Error {
    /// Wrap any directory-layer failure for `key`, keeping the cause
    pub fn directory<E>(key: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::DirectoryOperationFailed {
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::DriverUnavailable(_) => "DriverUnavailable",
            Error::InvalidScope(_) => "InvalidScope",
            Error::InvalidBindMethod(_) => "InvalidBindMethod",
            Error::DirectoryOperationFailed { .. } => "DirectoryOperationFailed",
            Error::ConfigParseFailed { .. } => "ConfigParseFailed",
            Error::ConfigReadFailed { .. } => "ConfigReadFailed",
            Error::MissingConfigPath => "MissingConfigPath",
            Error::InvalidOptions(_) => "InvalidOptions",
            Error::CyclicIndirection { .. } => "CyclicIndirection",
            Error::InterpolationFailed(_) => "InterpolationFailed",
        }
    }

    /// Whether the failure comes from the key or options rather than I/O
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidScope(_)
                | Error::InvalidBindMethod(_)
                | Error::MissingConfigPath
                | Error::InvalidOptions(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_directory_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = Error::directory("ldap:///dc=example,dc=com", io);

        assert_eq!(
            err.to_string(),
            "Error 'connection refused' in ldap_lookup_key(ldap:///dc=example,dc=com)"
        );
        let cause = err.source().unwrap();
        assert!(cause.downcast_ref::<std::io::Error>().is_some());
        assert_eq!(err.code(), "DirectoryOperationFailed");
    }

    #[test]
    fn test_messages_carry_tokens() {
        assert!(Error::InvalidScope("wide".into()).to_string().contains("'wide'"));
        assert!(Error::InvalidBindMethod("kerberos".into())
            .to_string()
            .contains("'kerberos'"));

        let err = Error::CyclicIndirection {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "ldap_lookup_key: cyclic indirection a -> b -> a");
    }

    #[test]
    fn test_usage_errors() {
        assert!(Error::MissingConfigPath.is_usage_error());
        assert!(!Error::InterpolationFailed("x".into()).is_usage_error());
    }
}
