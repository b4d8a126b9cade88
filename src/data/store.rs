use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::loader::{load_file, LoadError};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// DataStore – lazily-loaded, memoized dataset
// ---------------------------------------------------------------------------

/// Owns the source path and the memoized [`Dataset`].
///
/// The source is parsed once, on first access, and shared read-only via
/// `Arc` afterwards, so filter changes never re-parse the file.  The cache
/// is never invalidated automatically; only [`DataStore::reload`]
/// recomputes it.  Reload swaps the cached pointer under the write lock, so
/// readers holding clones from an earlier [`DataStore::get`] keep their
/// snapshot and never observe a half-built dataset.
pub struct DataStore {
    path: PathBuf,
    cached: RwLock<Option<Arc<Dataset>>>,
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> DataStore {
        DataStore {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached dataset, loading the source on first call.
    ///
    /// Two racing first readers may both parse the file; the results are
    /// identical and the second swap wins.
    pub fn get(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(ds) = self
            .cached
            .read()
            .expect("dataset cache lock poisoned")
            .as_ref()
        {
            return Ok(Arc::clone(ds));
        }
        self.reload()
    }

    /// Re-parse the source and replace the cached dataset.
    pub fn reload(&self) -> Result<Arc<Dataset>, LoadError> {
        let dataset = Arc::new(load_file(&self.path)?);
        log::debug!("dataset cache refreshed ({} records)", dataset.len());

        let mut guard = self.cached.write().expect("dataset cache lock poisoned");
        *guard = Some(Arc::clone(&dataset));
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
