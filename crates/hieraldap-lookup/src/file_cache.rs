//! Parsed file contents keyed by path
//!
//! A file is parsed once and re-parsed only when its modification time
//! changes. One cache may be shared by many lookup contexts.

use crate::loader::RawTable;
use hieraldap_core::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

struct CachedFile {
    modified: Option<SystemTime>,
    data: Arc<RawTable>,
}

#[derive(Default)]
pub struct FileCache {
    files: Mutex<HashMap<PathBuf, CachedFile>>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed content of `path`, running `parse` only when the file is new
    /// to the cache or has changed since it was last parsed
    pub fn cached_file_data<F>(&self, path: &Path, parse: F) -> Result<Arc<RawTable>>
    where
        F: FnOnce(&str) -> Result<RawTable>,
    {
        let shown = path.display().to_string();
        let read_error = |e: std::io::Error| Error::ConfigReadFailed {
            path: shown.clone(),
            source: e,
        };

        let modified = std::fs::metadata(path)
            .map_err(&read_error)?
            .modified()
            .ok();

        if let Some(cached) = self.files.lock().get(path) {
            if cached.modified.is_some() && cached.modified == modified {
                debug!("File cache hit for {}", shown);
                return Ok(cached.data.clone());
            }
        }

        let content = std::fs::read_to_string(path).map_err(&read_error)?;
        let data = Arc::new(parse(&content)?);

        debug!("Parsed {} ({} keys)", shown, data.len());
        self.files.lock().insert(
            path.to_path_buf(),
            CachedFile {
                modified,
                data: data.clone(),
            },
        );

        Ok(data)
    }

    /// Drop every cached file
    pub fn clear(&self) {
        self.files.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
