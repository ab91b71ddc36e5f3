//! Lookup resolution engine for hieraldap
//!
//! Resolves lookup keys either directly against the directory (keys of the
//! form `ldap:///base?attrs?scope?filter`) or indirectly through a YAML
//! table whose values are interpolated and resolved again.
//!
//! ```no_run
//! # async fn run() -> hieraldap_core::Result<()> {
//! use hieraldap_core::LookupOptions;
//! use hieraldap_lookup::{LookupContext, LookupEngine};
//!
//! let engine = LookupEngine::with_default_connector()?;
//! let context = LookupContext::new();
//! let options = LookupOptions {
//!     host: "ldap.example.com".to_string(),
//!     path: Some("/etc/hieraldap/ldap.yaml".into()),
//!     ..Default::default()
//! };
//!
//! match engine.lookup("webserver", &options, &context).await? {
//!     Some(value) => println!("{value}"),
//!     None => println!("not found"),
//! }
//! # Ok(())
//! # }
//! ```

mod context;
mod engine;
mod file_cache;
mod interpolate;
mod loader;
mod select;

pub use context::LookupContext;
pub use engine::LookupEngine;
pub use file_cache::FileCache;
pub use interpolate::{Interpolator, ScopeInterpolator};
pub use loader::{ConfigLoader, RawTable, YamlConfigLoader};
pub use select::{select, select_value};
