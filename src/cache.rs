//! Read-through dataset cache
//!
//! Off by default: every request re-reads the JSON. When enabled, a parsed
//! dataset is reused for as long as its file's modification time is unchanged.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use moka::sync::Cache;

use crate::error::PlaqueError;

struct CachedDataset<T> {
    modified: SystemTime,
    data: Arc<T>,
}

impl<T> Clone for CachedDataset<T> {
    fn clone(&self) -> Self {
        CachedDataset {
            modified: self.modified,
            data: Arc::clone(&self.data),
        }
    }
}

pub struct DatasetCache<T> {
    entries: Cache<PathBuf, CachedDataset<T>>,
}

impl<T: Send + Sync + 'static> DatasetCache<T> {
    pub fn new(max_files: u64) -> Self {
        DatasetCache {
            entries: Cache::builder().max_capacity(max_files).build(),
        }
    }

    /// Return the cached dataset for `path`, loading it when absent or stale.
    ///
    /// A file whose mtime cannot be read is always reloaded and never cached.
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<T>, PlaqueError>
    where
        F: FnOnce(&Path) -> Result<T, PlaqueError>,
    {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();

        if let Some(modified) = modified {
            if let Some(entry) = self.entries.get(path) {
                if entry.modified == modified {
                    tracing::debug!("Dataset cache hit for {}", path.display());
                    return Ok(entry.data);
                }
                tracing::debug!("Dataset {} changed on disk, reloading", path.display());
            }
        }

        let data = Arc::new(load(path)?);
        match modified {
            Some(modified) => {
                self.entries.insert(
                    path.to_path_buf(),
                    CachedDataset {
                        modified,
                        data: Arc::clone(&data),
                    },
                );
            }
            None => self.entries.invalidate(path),
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_second_read_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plaques.json");
        std::fs::write(&path, "[]").unwrap();

        let cache: DatasetCache<usize> = DatasetCache::new(4);
        let loads = Cell::new(0);
        let load = |_: &Path| {
            loads.set(loads.get() + 1);
            Ok(loads.get())
        };

        assert_eq!(*cache.get_or_load(&path, load).unwrap(), 1);
        assert_eq!(*cache.get_or_load(&path, load).unwrap(), 1);
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_modified_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plaques.json");
        std::fs::write(&path, "[]").unwrap();

        let cache: DatasetCache<String> = DatasetCache::new(4);
        let read = |p: &Path| Ok(std::fs::read_to_string(p).unwrap());

        assert_eq!(*cache.get_or_load(&path, read).unwrap(), "[]");

        std::fs::write(&path, "[{}]").unwrap();
        let later = SystemTime::now() + std::time::Duration::from_secs(60);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert_eq!(*cache.get_or_load(&path, read).unwrap(), "[{}]");
    }

    #[test]
    fn test_missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let cache: DatasetCache<()> = DatasetCache::new(4);
        let result = cache.get_or_load(&path, |p| Err(PlaqueError::unavailable(p, "missing")));
        assert!(result.is_err());
        assert!(cache.entries.get(path.as_path()).is_none());
    }
}
