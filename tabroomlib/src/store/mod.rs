//! Key-value object storage used as the summary cache.
//!
//! Keys are `/`-separated strings such as `20134/Lincoln/results.txt`.
//! Listing works on plain string prefixes, the way bucket listings do, so
//! `"2013"` matches both `20134/...` and `20135/...`.
//!
//! Two stores are provided:
//!
//! - [`MemoryStore`]: an in-process map
//! - [`DirStore`]: one file per object under a root directory

pub mod dir;

use std::collections::BTreeMap;

use crate::error::TabroomError;
use crate::Result;

pub use dir::DirStore;

/// A flat key → bytes store with prefix listing.
pub trait ObjectStore {
    /// Read an object. Missing keys are [`TabroomError::ObjectNotFound`].
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Create or overwrite an object.
    fn put(&mut self, key: &str, body: &[u8]) -> Result<()>;

    /// Remove an object. Removing a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Read an object as UTF-8 text (invalid sequences are replaced).
    fn get_string(&self, key: &str) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.get(key)?).into_owned())
    }

    /// True if an object is stored under exactly `key`.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.list(key)?.iter().any(|k| k == key))
    }

    /// Number of keys starting with `prefix`.
    fn count_prefix(&self, prefix: &str) -> Result<usize> {
        Ok(self.list(prefix)?.len())
    }
}

/// In-memory object store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| TabroomError::ObjectNotFound(key.to_string()))
    }

    fn put(&mut self, key: &str, body: &[u8]) -> Result<()> {
        self.objects.insert(key.to_string(), body.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.objects.remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.contains_key(key))
    }
}
