//! LDAP directory driver
//!
//! Provides directory access via ldap3:
//! - LDAP and LDAPS connections, STARTTLS upgrade
//! - Simple, SASL EXTERNAL and anonymous binds
//! - One scoped session per search

mod client;

pub use client::{LdapConnector, LdapDirectory};
