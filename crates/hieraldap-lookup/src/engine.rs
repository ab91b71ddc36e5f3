//! Lookup resolution engine
//!
//! `lookup` answers a key from the context cache when it can. Otherwise the
//! key is classified once:
//! - direct (`ldap:///...`): parsed, searched on the context's shared
//!   connection, entries converted to data
//! - indirect: looked up in the raw table, interpolated, and the produced
//!   key resolved in turn
//!
//! Indirection is followed in a loop with a visited chain, so a table that
//! refers back to itself fails with `CyclicIndirection` instead of
//! recursing forever. The final value is cached under the requested key
//! and under every key traversed on the way.

use crate::context::LookupContext;
use crate::interpolate::{Interpolator, ScopeInterpolator};
use crate::loader::{ConfigLoader, RawTable, YamlConfigLoader};
use hieraldap_core::types::{entries_to_value, LookupKey, QueryExpression};
use hieraldap_core::{Error, LookupOptions, Result, Value};
use hieraldap_directory::{DirectoryConnection, DirectoryConnector};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a lookup that produced no value
enum Unresolved {
    NotFound,
    Failed(Error),
}

pub struct LookupEngine {
    connector: Arc<dyn DirectoryConnector>,
    loader: Arc<dyn ConfigLoader>,
    interpolator: Arc<dyn Interpolator>,
}

impl LookupEngine {
    /// Engine using `connector`, the YAML loader and scope interpolation
    pub fn new(connector: Arc<dyn DirectoryConnector>) -> Self {
        Self {
            connector,
            loader: Arc::new(YamlConfigLoader),
            interpolator: Arc::new(ScopeInterpolator::new()),
        }
    }

    /// Engine using the directory driver compiled into this build
    pub fn with_default_connector() -> Result<Self> {
        Ok(Self::new(hieraldap_directory::default_connector()?))
    }

    pub fn with_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Arc<dyn Interpolator>) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Resolve `key`. `Ok(None)` means the key is unknown to this backend.
    pub async fn lookup(
        &self,
        key: &str,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> Result<Option<Value>> {
        let slot = context.slot(key);
        if let Some(value) = slot.get() {
            debug!("Cache hit for {}", key);
            return Ok(Some(value.clone()));
        }

        let outcome = slot
            .get_or_try_init(|| async {
                match self.resolve(key, options, context).await {
                    Ok(Some(value)) => Ok(value),
                    Ok(None) => Err(Unresolved::NotFound),
                    Err(e) => Err(Unresolved::Failed(e)),
                }
            })
            .await;

        match outcome {
            // The slot may have been dropped by a failed attempt while this
            // task waited on it; store the value under the key again.
            Ok(value) => Ok(Some(context.cache(key, value.clone()))),
            Err(unresolved) => {
                context.forget_pending(key, &slot);
                match unresolved {
                    Unresolved::NotFound => {
                        debug!("No value for {}", key);
                        Ok(None)
                    }
                    Unresolved::Failed(e) => Err(e),
                }
            }
        }
    }

    async fn resolve(
        &self,
        key: &str,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> Result<Option<Value>> {
        let mut chain: Vec<String> = Vec::new();
        let mut current = key.to_string();

        let value = loop {
            if let Some(value) = context.cached_value(&current) {
                debug!("Cache hit for {}", current);
                break value;
            }

            match LookupKey::classify(&current)? {
                LookupKey::Direct(query) => {
                    break self.direct_search(&current, &query, options, context).await?;
                }
                LookupKey::Indirect(name) => {
                    let table = self.raw_data(options, context).await?;
                    let Some(raw) = table.get(&name) else {
                        return Ok(None);
                    };

                    let next = match self.interpolator.interpolate(raw, options)? {
                        Value::String(next) => next,
                        other => {
                            debug!("{} does not resolve to a key: {}", name, other);
                            return Ok(None);
                        }
                    };

                    debug!("{} -> {}", name, next);
                    chain.push(current);
                    if chain.contains(&next) {
                        chain.push(next);
                        return Err(Error::CyclicIndirection { chain });
                    }
                    current = next;
                }
            }
        };

        // The requested key is cached by the caller.
        if !chain.is_empty() {
            for traversed in chain.iter().skip(1).chain(std::iter::once(&current)) {
                context.cache(traversed, value.clone());
            }
        }

        Ok(Some(value))
    }

    async fn direct_search(
        &self,
        key: &str,
        query: &QueryExpression,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> Result<Value> {
        let connection = self.connection(key, options, context).await?;
        let credentials = options.credentials()?;

        debug!("Direct search for {} as {:?}", key, credentials);

        let entries = connection
            .search(&credentials, query)
            .await
            .map_err(|e| Error::directory(key, e))?;

        Ok(entries_to_value(entries))
    }

    async fn connection(
        &self,
        key: &str,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> Result<Arc<dyn DirectoryConnection>> {
        context
            .connection_or_try_init(|| self.create_connection(key, options))
            .await
    }

    async fn create_connection(
        &self,
        key: &str,
        options: &LookupOptions,
    ) -> Result<Arc<dyn DirectoryConnection>> {
        options.validate()?;
        let endpoint = options.endpoint();
        info!("Connecting lookup context to {}", endpoint.url());

        self.connector
            .connect(&endpoint)
            .await
            .map_err(|e| Error::directory(key, e))
    }

    async fn raw_data(
        &self,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> Result<Arc<RawTable>> {
        context
            .raw_table_or_try_init(|| self.load_raw_data(options, context))
            .await
    }

    async fn load_raw_data(
        &self,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> Result<Arc<RawTable>> {
        let path = options.path.as_deref().ok_or(Error::MissingConfigPath)?;

        let table = context.cached_file_data(path, |content| {
            match self.loader.load_mapping(path, content)? {
                Some(table) => Ok(table),
                None => {
                    context.warn(format!(
                        "{}: file does not contain a valid yaml hash",
                        path.display()
                    ));
                    Ok(RawTable::new())
                }
            }
        })?;

        info!("Loaded {} keys from {}", table.len(), path.display());
        Ok(table)
    }
}
