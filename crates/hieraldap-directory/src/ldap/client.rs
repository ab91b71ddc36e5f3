//! LDAP Client implementation
//!
//! Handles LDAP sessions, binds and searches. Supports LDAP, LDAPS (SSL)
//! and STARTTLS connections. ldap3 only speaks protocol version 3.

use crate::{DirectoryConnection, DirectoryConnector, DirectoryError};
use async_trait::async_trait;
use hieraldap_core::types::{BindMethod, Credentials, Endpoint, Entry, QueryExpression, Scope};
use hieraldap_core::utils::wrap_filter;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, SearchEntry};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Creates [`LdapDirectory`] connections
#[derive(Debug, Clone, Default)]
pub struct LdapConnector;

impl LdapConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DirectoryConnector for LdapConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
    ) -> Result<Arc<dyn DirectoryConnection>, DirectoryError> {
        let directory = LdapDirectory::new(endpoint.clone())?;
        info!("Created LDAP connection for {}", directory.url);
        Ok(Arc::new(directory))
    }
}

/// Connection to one LDAP server.
///
/// Holds the server URL and session settings; the network session itself
/// is opened per search and closed when the search finishes.
#[derive(Debug, Clone)]
pub struct LdapDirectory {
    endpoint: Endpoint,
    url: Url,
}

impl LdapDirectory {
    pub fn new(endpoint: Endpoint) -> Result<Self, DirectoryError> {
        let url = Url::parse(&endpoint.url())
            .map_err(|e| DirectoryError::InvalidEndpoint(format!("{}: {}", endpoint.url(), e)))?;

        Ok(Self { endpoint, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn settings(&self) -> LdapConnSettings {
        LdapConnSettings::new()
            .set_conn_timeout(self.endpoint.timeout)
            .set_starttls(self.endpoint.start_tls)
            .set_no_tls_verify(self.endpoint.skip_tls_verify)
    }

    /// Open a session with proper TLS settings
    async fn open(&self) -> Result<Ldap, DirectoryError> {
        debug!("Connecting to LDAP server: {}", self.url);

        let (conn, ldap) = LdapConnAsync::from_url_with_settings(self.settings(), &self.url)
            .await
            .map_err(|e| DirectoryError::Connect {
                url: self.url.to_string(),
                source: Box::new(e),
            })?;

        ldap3::drive!(conn);
        Ok(ldap)
    }

    async fn bind(&self, ldap: &mut Ldap, credentials: &Credentials) -> Result<(), DirectoryError> {
        let bind_error = |e: ldap3::LdapError| DirectoryError::Bind {
            dn: credentials.bind_dn.clone(),
            method: credentials.method,
            source: Box::new(e),
        };

        match credentials.method {
            BindMethod::None => Ok(()),
            BindMethod::Simple => {
                ldap.simple_bind(&credentials.bind_dn, &credentials.bind_password)
                    .await
                    .and_then(|r| r.success())
                    .map_err(bind_error)?;
                Ok(())
            }
            BindMethod::Sasl => {
                ldap.sasl_external_bind()
                    .await
                    .and_then(|r| r.success())
                    .map_err(bind_error)?;
                Ok(())
            }
        }
    }

    async fn bound_search(
        &self,
        ldap: &mut Ldap,
        credentials: &Credentials,
        query: &QueryExpression,
    ) -> Result<Vec<Entry>, DirectoryError> {
        self.bind(ldap, credentials).await?;

        let filter = wrap_filter(&query.filter);
        let attrs: Vec<&str> = query.attributes.iter().map(String::as_str).collect();

        debug!(
            "Searching {} (scope {}) with filter: {}",
            query.base, query.scope, filter
        );

        let search_error = |e: ldap3::LdapError| DirectoryError::Search {
            base: query.base.clone(),
            source: Box::new(e),
        };

        let (rs, _res) = ldap
            .search(&query.base, to_ldap_scope(query.scope), &filter, attrs)
            .await
            .map_err(&search_error)?
            .success()
            .map_err(&search_error)?;

        let entries: Vec<Entry> = rs
            .into_iter()
            .map(|result| {
                let entry = SearchEntry::construct(result);
                Entry::from_unordered(entry.dn, entry.attrs, &query.attributes)
            })
            .collect();

        debug!("Found {} entries under {}", entries.len(), query.base);
        Ok(entries)
    }
}

#[async_trait]
impl DirectoryConnection for LdapDirectory {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn search(
        &self,
        credentials: &Credentials,
        query: &QueryExpression,
    ) -> Result<Vec<Entry>, DirectoryError> {
        let mut ldap = self.open().await?;

        let result = self.bound_search(&mut ldap, credentials, query).await;

        if let Err(e) = ldap.unbind().await {
            debug!("Unbind from {} failed: {}", self.url, e);
        }

        result
    }
}

fn to_ldap_scope(scope: Scope) -> ldap3::Scope {
    match scope {
        Scope::Base => ldap3::Scope::Base,
        Scope::OneLevel => ldap3::Scope::OneLevel,
        Scope::Subtree => ldap3::Scope::Subtree,
    }
}
