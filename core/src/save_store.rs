//! Non-volatile blob storage
//!
//! Models a small EEPROM-style medium: named, fixed-size blobs with no
//! directory structure. Reads always return exactly the requested capacity.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default byte budget of the whole medium
pub const DEFAULT_EEPROM_BYTES: usize = 512;

/// Keyed storage for fixed-size blobs.
pub trait BlobStore {
    /// Read the blob stored under `key`, fitted to `capacity` bytes.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] if nothing was ever written.
    fn read(&self, key: &str, capacity: usize) -> io::Result<Vec<u8>>;

    /// Replace the blob stored under `key`.
    fn write(&mut self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

fn fit(mut bytes: Vec<u8>, capacity: usize, key: &str) -> Vec<u8> {
    if bytes.len() > capacity {
        tracing::warn!(
            key,
            len = bytes.len(),
            capacity,
            "stored blob larger than requested capacity, truncating"
        );
    }
    bytes.resize(capacity, 0);
    bytes
}

/// One file per key under a root directory.
///
/// Writes go to a temporary sibling first and are renamed over the target,
/// so a crash mid-write never leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
    budget: usize,
}

impl FileBlobStore {
    pub fn new(root: PathBuf, budget: usize) -> Self {
        Self { root, budget }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// File backing `key`. Keys may carry a leading `/`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str, capacity: usize) -> io::Result<Vec<u8>> {
        let bytes = fs::read(self.path_for(key))?;
        Ok(fit(bytes, capacity, key))
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() > self.budget {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "blob of {} bytes exceeds the {}-byte storage budget",
                    bytes.len(),
                    self.budget
                ),
            ));
        }

        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = match path.file_name() {
            Some(name) => {
                let mut tmp_name = OsString::from(name);
                tmp_name.push(".tmp");
                path.with_file_name(tmp_name)
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "blob key has no file name",
                ));
            }
        };

        {
            let mut f = fs::File::create(&tmp_path)?;
            f.write_all(bytes)?;
            f.sync_all()?;
        }

        #[cfg(windows)]
        {
            if path.exists() {
                // Windows rename fails if destination exists.
                fs::remove_file(&path)?;
            }
        }

        fs::rename(&tmp_path, &path)?;
        tracing::debug!(key, path = %path.display(), len = bytes.len(), "blob written");
        Ok(())
    }
}

/// In-memory store for tests and headless tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(mut self, key: &str, bytes: Vec<u8>) -> Self {
        self.blobs.insert(key.to_string(), bytes);
        self
    }

    /// Make every subsequent write fail, as a full or broken medium would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.blobs.get(key).map(Vec::as_slice)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str, capacity: usize) -> io::Result<Vec<u8>> {
        match self.blobs.get(key) {
            Some(bytes) => Ok(fit(bytes.clone(), capacity, key)),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such blob")),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::other("write failed"));
        }
        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
