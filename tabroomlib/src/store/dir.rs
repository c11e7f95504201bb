//! Directory-backed object store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::ObjectStore;
use crate::error::TabroomError;
use crate::Result;

/// Stores each object as a file under `root`, with `/` in keys mapping to
/// subdirectories.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| TabroomError::StoreIo {
            path: root.clone(),
            source,
        })?;
        Ok(DirStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key onto a path below the root.
    ///
    /// Empty, absolute and `..`-containing keys are rejected.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let invalid = |message: &str| TabroomError::InvalidKey {
            key: key.to_string(),
            message: message.to_string(),
        };
        if key.is_empty() || key.ends_with('/') {
            return Err(invalid("key must name an object"));
        }
        let relative = Path::new(key);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                Component::CurDir => {}
                _ => return Err(invalid("key must be a relative path without '..'")),
            }
        }
        Ok(self.root.join(relative))
    }

    fn io_error(path: &Path, source: std::io::Error) -> TabroomError {
        TabroomError::StoreIo {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ObjectStore for DirStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(TabroomError::ObjectNotFound(key.to_string()))
            }
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn put(&mut self, key: &str, body: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }
        fs::write(&path, body).map_err(|e| Self::io_error(&path, e))?;
        debug!(key, bytes = body.len(), "stored object");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                TabroomError::StoreIo {
                    path,
                    source: e.into(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        store.put("20134/Lincoln/gpt_prompt.txt", b"prompt").unwrap();

        assert_eq!(
            store.get_string("20134/Lincoln/gpt_prompt.txt").unwrap(),
            "prompt"
        );
        assert!(dir.path().join("20134/Lincoln/gpt_prompt.txt").is_file());
        assert!(store.exists("20134/Lincoln/gpt_prompt.txt").unwrap());
    }

    #[test]
    fn test_missing_object() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.get("1/x.txt").unwrap_err(),
            TabroomError::ObjectNotFound(_)
        ));
        assert!(!store.exists("1/x.txt").unwrap());
    }

    #[test]
    fn test_list_by_prefix() {
        let dir = tempdir().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        store.put("20134/placeholder.txt", b"").unwrap();
        store.put("20134/A/results.txt", b"").unwrap();
        store.put("20999/B/results.txt", b"").unwrap();

        assert_eq!(
            store.list("20134").unwrap(),
            vec!["20134/A/results.txt", "20134/placeholder.txt"]
        );
        assert_eq!(store.count_prefix("2").unwrap(), 3);
        assert_eq!(store.count_prefix("3").unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        store.put("t/placeholder.txt", b"x").unwrap();
        store.delete("t/placeholder.txt").unwrap();
        store.delete("t/placeholder.txt").unwrap();
        assert!(!store.exists("t/placeholder.txt").unwrap());
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let dir = tempdir().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        for key in ["../evil.txt", "/etc/passwd", "", "a/"] {
            assert!(
                matches!(
                    store.put(key, b"x").unwrap_err(),
                    TabroomError::InvalidKey { .. }
                ),
                "key {key:?} should be rejected"
            );
        }
    }
}
