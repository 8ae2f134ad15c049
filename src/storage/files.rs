//! Storage for accepted uploads.
//!
//! Files are stored under a generated name so user-supplied filenames never
//! touch the filesystem. The returned reference is what ends up in the
//! answer store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::{Result, StorageError};

/// Somewhere to put uploaded files once they pass validation.
pub trait FileStore {
    /// Store `bytes` and return an opaque reference for later retrieval.
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String>;

    fn load(&self, reference: &str) -> Result<Vec<u8>>;

    fn remove(&self, reference: &str) -> Result<()>;
}

/// Uploads kept as `<uuid>.<ext>` files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryFileStore {
    root: PathBuf,
}

impl DirectoryFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a reference, refusing anything that isn't a bare file name.
    fn path_for(&self, reference: &str) -> Result<PathBuf> {
        let bare = !reference.is_empty()
            && !reference.contains(['/', '\\'])
            && reference != "."
            && reference != "..";
        if !bare {
            return Err(StorageError::FileNotFound(reference.to_string()));
        }
        Ok(self.root.join(reference))
    }
}

impl FileStore for DirectoryFileStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let reference = match extension(filename) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        fs::write(self.root.join(&reference), bytes)?;
        debug!(%reference, size = bytes.len(), "stored upload");
        Ok(reference)
    }

    fn load(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self.path_for(reference)?;
        if !path.is_file() {
            return Err(StorageError::FileNotFound(reference.to_string()));
        }
        Ok(fs::read(path)?)
    }

    fn remove(&self, reference: &str) -> Result<()> {
        let path = self.path_for(reference)?;
        if !path.is_file() {
            return Err(StorageError::FileNotFound(reference.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Lower-cased extension, restricted to ASCII alphanumerics.
fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
