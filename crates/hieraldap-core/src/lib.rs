//! hieraldap core library
//!
//! Core types, options and errors shared by the hieraldap lookup backend:
//! the direct-key query grammar, bind credentials, directory entries and
//! the per-level lookup options.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{LoggingConfig, LookupOptions};
pub use error::{BoxError, Error, Result};
pub use serde_json::Value;

/// hieraldap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix that marks a lookup key as a direct directory query
pub const PREFIX: &str = "ldap:///";

/// Filter used when a direct key leaves the filter field empty
pub const DEFAULT_FILTER: &str = "objectClass=*";

/// Default port for plain LDAP connections
pub const DEFAULT_LDAP_PORT: u16 = 389;

/// Default port for LDAPS connections
pub const DEFAULT_LDAPS_PORT: u16 = 636;
