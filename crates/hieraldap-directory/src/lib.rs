//! Directory access for hieraldap
//!
//! The lookup engine talks to the directory through two traits:
//! [`DirectoryConnector`] creates the long-lived connection object that a
//! lookup context caches, and [`DirectoryConnection`] runs one bind+search
//! in a scoped session. The ldap3-backed implementation lives in [`ldap`]
//! and is compiled with the `ldap` feature.

mod connection;
mod error;
#[cfg(feature = "ldap")]
pub mod ldap;

pub use connection::{DirectoryConnection, DirectoryConnector};
pub use error::DirectoryError;
#[cfg(feature = "ldap")]
pub use ldap::{LdapConnector, LdapDirectory};

use std::sync::Arc;

/// Connector for the directory driver compiled into this build
#[cfg(feature = "ldap")]
pub fn default_connector() -> hieraldap_core::Result<Arc<dyn DirectoryConnector>> {
    Ok(Arc::new(LdapConnector::new()))
}

/// Connector for the directory driver compiled into this build
#[cfg(not(feature = "ldap"))]
pub fn default_connector() -> hieraldap_core::Result<Arc<dyn DirectoryConnector>> {
    Err(hieraldap_core::Error::DriverUnavailable(
        "Must build hieraldap with the `ldap` feature to use ldap_lookup_key".to_string(),
    ))
}
