//! Lookup context
//!
//! Holds everything a lookup caches for the lifetime of the context:
//! - resolved values, one slot per lookup key
//! - the shared directory connection
//! - the raw indirection table
//!
//! The connection and the table live in their own typed slots, so no lookup
//! key can ever collide with them. Every slot is initialised at most once,
//! even when several tasks look up the same key concurrently.

use crate::file_cache::FileCache;
use crate::loader::RawTable;
use hieraldap_core::{Result, Value};
use hieraldap_directory::DirectoryConnection;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct LookupContext {
    results: Mutex<HashMap<String, Arc<OnceCell<Value>>>>,
    connection: OnceCell<Arc<dyn DirectoryConnection>>,
    raw_table: OnceCell<Arc<RawTable>>,
    files: Arc<FileCache>,
    warnings: Mutex<Vec<String>>,
}

impl Default for LookupContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupContext {
    pub fn new() -> Self {
        Self::with_file_cache(Arc::new(FileCache::new()))
    }

    /// Context sharing parsed files with other contexts
    pub fn with_file_cache(files: Arc<FileCache>) -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
            connection: OnceCell::new(),
            raw_table: OnceCell::new(),
            files,
            warnings: Mutex::new(Vec::new()),
        }
    }

    // =========================================================================
    // Result cache
    // =========================================================================

    pub fn has_key(&self, key: &str) -> bool {
        self.results
            .lock()
            .get(key)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }

    pub fn cached_value(&self, key: &str) -> Option<Value> {
        self.results.lock().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Store `value` under `key` unless a value is already there; returns
    /// the value the key now holds
    pub fn cache(&self, key: &str, value: Value) -> Value {
        let slot = self.slot(key);
        match slot.set(value.clone()) {
            Ok(()) => value,
            Err(_) => slot.get().cloned().unwrap_or(value),
        }
    }

    /// Number of keys holding a resolved value
    pub fn len(&self) -> usize {
        self.results
            .lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn slot(&self, key: &str) -> Arc<OnceCell<Value>> {
        self.results
            .lock()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Drop `slot` for a key that did not resolve, unless the key has since
    /// been given a different slot or a value
    pub(crate) fn forget_pending(&self, key: &str, slot: &Arc<OnceCell<Value>>) {
        let mut results = self.results.lock();
        let stale = results
            .get(key)
            .map(|current| Arc::ptr_eq(current, slot) && !current.initialized())
            .unwrap_or(false);
        if stale {
            results.remove(key);
        }
    }

    // =========================================================================
    // Connection and raw table slots
    // =========================================================================

    pub fn connection(&self) -> Option<Arc<dyn DirectoryConnection>> {
        self.connection.get().cloned()
    }

    pub(crate) async fn connection_or_try_init<F, Fut>(
        &self,
        init: F,
    ) -> Result<Arc<dyn DirectoryConnection>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn DirectoryConnection>>>,
    {
        self.connection.get_or_try_init(init).await.cloned()
    }

    pub fn raw_table(&self) -> Option<Arc<RawTable>> {
        self.raw_table.get().cloned()
    }

    pub(crate) async fn raw_table_or_try_init<F, Fut>(&self, init: F) -> Result<Arc<RawTable>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<RawTable>>>,
    {
        self.raw_table.get_or_try_init(init).await.cloned()
    }

    // =========================================================================
    // Files and warnings
    // =========================================================================

    pub fn cached_file_data<F>(&self, path: &Path, parse: F) -> Result<Arc<RawTable>>
    where
        F: FnOnce(&str) -> Result<RawTable>,
    {
        self.files.cached_file_data(path, parse)
    }

    pub fn file_cache(&self) -> Arc<FileCache> {
        self.files.clone()
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.lock().push(message);
    }

    /// Warnings issued through this context
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_roundtrip() {
        let context = LookupContext::new();
        assert!(!context.has_key("webserver"));
        assert!(context.cached_value("webserver").is_none());

        context.cache("webserver", json!(["web01"]));
        assert!(context.has_key("webserver"));
        assert_eq!(context.cached_value("webserver"), Some(json!(["web01"])));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_first_value_wins() {
        let context = LookupContext::new();
        context.cache("k", json!(1));
        assert_eq!(context.cache("k", json!(2)), json!(1));
        assert_eq!(context.cached_value("k"), Some(json!(1)));
    }

    #[test]
    fn test_forget_pending_keeps_values() {
        let context = LookupContext::new();
        let pending = context.slot("pending");
        context.cache("done", json!("x"));
        let done = context.slot("done");

        context.forget_pending("pending", &pending);
        context.forget_pending("done", &done);

        assert!(context.has_key("done"));
        assert_eq!(context.results.lock().len(), 1);
    }

    #[test]
    fn test_forget_pending_ignores_replaced_slot() {
        let context = LookupContext::new();
        let old = context.slot("webserver");
        context.forget_pending("webserver", &old);

        let current = context.slot("webserver");
        assert!(!Arc::ptr_eq(&old, &current));

        // A late failure on the old slot leaves the new one alone.
        context.forget_pending("webserver", &old);
        assert!(Arc::ptr_eq(&current, &context.slot("webserver")));
    }

    #[tokio::test]
    async fn test_raw_table_initialised_once() {
        let context = LookupContext::new();
        let mut loads = 0;

        for _ in 0..3 {
            let table = context
                .raw_table_or_try_init(|| {
                    loads += 1;
                    async { Ok(Arc::new(RawTable::new())) }
                })
                .await
                .unwrap();
            assert!(table.is_empty());
        }

        assert_eq!(loads, 1);
        assert!(context.raw_table().is_some());
    }

    #[tokio::test]
    async fn test_failed_init_is_retried() {
        let context = LookupContext::new();

        let err = context
            .raw_table_or_try_init(|| async { Err(hieraldap_core::Error::MissingConfigPath) })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MissingConfigPath");
        assert!(context.raw_table().is_none());

        context
            .raw_table_or_try_init(|| async { Ok(Arc::new(RawTable::new())) })
            .await
            .unwrap();
        assert!(context.raw_table().is_some());
    }

    #[test]
    fn test_warnings_recorded() {
        let context = LookupContext::new();
        context.warn("ldap.yaml: file does not contain a valid yaml hash");
        assert_eq!(context.warnings().len(), 1);
    }
}
