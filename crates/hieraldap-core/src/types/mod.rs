//! Core types for hieraldap

mod bind;
mod entry;
mod query;

pub use bind::*;
pub use entry::*;
pub use query::*;
