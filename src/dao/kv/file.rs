use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use tracing::debug;

use crate::dao::{
    kv::KeyValueStore,
    storage::{StorageError, StorageResult},
};

/// File-backed store keeping one `<key>.json` document per key under a data
/// directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| {
            StorageError::unavailable(
                format!("cannot create data directory `{}`", self.root.display()),
                source,
            )
        })
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.document_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::unavailable(
                format!("cannot read `{}`", path.display()),
                source,
            )),
        }
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_root()?;
        let path = self.document_path(key);
        fs::write(&path, value).map_err(|source| {
            StorageError::unavailable(format!("cannot write `{}`", path.display()), source)
        })?;
        debug!(path = %path.display(), bytes = value.len(), "flushed document");
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.document_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::unavailable(
                format!("cannot remove `{}`", path.display()),
                source,
            )),
        }
    }
}
