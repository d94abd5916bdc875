//! File-backed persistence for users and conversations.
//!
//! Documents are plain JSON on disk. Every write goes through a temp file
//! plus rename so readers never observe a half-written document, and
//! conflicting writers on the same document are serialized in-process.

mod conversations;
mod users;

pub use conversations::ConversationStore;
pub use users::UserStore;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::fs;

use crate::{Error, Result};

/// Per-key async mutexes, used to serialize read-modify-write cycles on a
/// single conversation document. Entries are created on demand and kept for
/// the process lifetime; at expected scale (one entry per conversation ever
/// touched) this is not worth evicting.
#[derive(Default)]
pub struct KeyedLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for a key.
    pub fn get(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().expect("lock map poisoned");
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Atomically replace `path` with `content`: write a temp sibling, then rename.
pub(crate) async fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .await
        .map_err(|e| Error::Storage(format!("Failed to write {}: {}", temp_path.display(), e)))?;
    fs::rename(&temp_path, path)
        .await
        .map_err(|e| Error::Storage(format!("Failed to rename into {}: {}", path.display(), e)))?;
    Ok(())
}

/// Reject identifiers that could escape the store's directory.
pub(crate) fn validate_id(id: &str) -> Result<()> {
    if id.is_empty()
        || id.contains('/')
        || id.contains('\\')
        || id.contains("..")
        || id.starts_with('.')
    {
        return Err(Error::Validation(format!("Invalid identifier: {}", id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("b9c7a9a2-1111-4222-8333-444455556666").is_ok());
        assert!(validate_id("../../etc/passwd").is_err());
        assert!(validate_id("a/b").is_err());
        assert!(validate_id(".hidden").is_err());
        assert!(validate_id("").is_err());
    }

    #[tokio::test]
    async fn test_keyed_locks_same_key_same_lock() {
        let locks = KeyedLocks::new();
        let a = locks.get("k1");
        let b = locks.get("k1");
        let c = locks.get("k2");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        atomic_write(&path, "first").await.unwrap();
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "first");

        atomic_write(&path, "second").await.unwrap();
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "second");

        // No temp residue left behind
        assert!(!path.with_extension("tmp").exists());
    }
}
