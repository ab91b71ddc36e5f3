//! Directory connection traits

use crate::DirectoryError;
use async_trait::async_trait;
use hieraldap_core::types::{Credentials, Endpoint, Entry, QueryExpression};
use std::sync::Arc;

/// Creates directory connections
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Create the connection object for `endpoint`.
    ///
    /// The returned connection is cached by the lookup context and shared
    /// by every later lookup in that context.
    async fn connect(
        &self,
        endpoint: &Endpoint,
    ) -> Result<Arc<dyn DirectoryConnection>, DirectoryError>;
}

/// A connection to one directory server
#[async_trait]
pub trait DirectoryConnection: Send + Sync {
    /// Endpoint this connection targets
    fn endpoint(&self) -> &Endpoint;

    /// Bind with `credentials`, run `query` and return the entries in
    /// search order. The bound session is torn down before returning,
    /// whether the search succeeded or not.
    async fn search(
        &self,
        credentials: &Credentials,
        query: &QueryExpression,
    ) -> Result<Vec<Entry>, DirectoryError>;
}
