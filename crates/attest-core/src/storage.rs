//! Receipt image storage
//!
//! Uploaded receipt images sit behind a small trait keyed by object key.
//! `LocalStorage` keeps them on the filesystem; an object-store
//! implementation with presigned access would slot in behind the same
//! trait without touching the callers.

use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};

/// Pluggable receipt-image store
pub trait ReceiptStorage: Send + Sync {
    fn store(&self, key: &str, bytes: &[u8]) -> Result<()>;
    fn load(&self, key: &str) -> Result<Vec<u8>>;
    fn exists(&self, key: &str) -> bool;
}

/// SHA-256 content hash of an image, hex encoded
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Filesystem-backed storage rooted at one directory
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Keys are flattened to a safe filename so a crafted key cannot
    /// escape the storage root
    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(safe)
    }
}

impl ReceiptStorage for LocalStorage {
    fn store(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, bytes)?;
        debug!(key, size = bytes.len(), "stored receipt image");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(Error::Storage(format!("no stored image for key {}", key)));
        }
        Ok(fs::read(path)?)
    }

    fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}
