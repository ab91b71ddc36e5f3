//! Directory error types

use hieraldap_core::types::BindMethod;
use hieraldap_core::BoxError;
use thiserror::Error;

/// Failures of the directory layer
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("unable to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{method} bind as '{dn}' failed: {source}")]
    Bind {
        dn: String,
        method: BindMethod,
        #[source]
        source: BoxError,
    },

    #[error("search under '{base}' failed: {source}")]
    Search {
        base: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
