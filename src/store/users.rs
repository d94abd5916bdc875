//! Credential store: all user records in one JSON document.
//!
//! Lookups are a linear scan, which is fine at the expected scale of
//! single-digit-to-low-hundreds of users. Mutations take a store-wide
//! async mutex for the whole read-modify-write cycle so two concurrent
//! registrations cannot drop each other's record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::models::User;
use crate::{Error, Result};

use super::atomic_write;

const USERS_FILE_VERSION: u32 = 1;

/// On-disk shape of the credential document. Older documents are a bare
/// JSON array of users; both forms load, and the versioned envelope is
/// written back.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum UsersFile {
    Versioned { version: u32, users: Vec<User> },
    Legacy(Vec<User>),
}

impl UsersFile {
    fn into_users(self) -> Vec<User> {
        match self {
            Self::Versioned { users, .. } => users,
            Self::Legacy(users) => users,
        }
    }
}

pub struct UserStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl UserStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("users.json"),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Create the data directory and seed an empty document if none exists.
    pub async fn ensure_ready(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }
        if !self.path.exists() {
            self.persist_all(&[]).await?;
        }
        Ok(())
    }

    /// Load the full user list. A missing file reads as empty.
    pub async fn load(&self) -> Result<Vec<User>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let file: UsersFile = serde_json::from_str(&raw).map_err(|e| {
            Error::Storage(format!("Corrupt user document {}: {}", self.path.display(), e))
        })?;
        Ok(file.into_users())
    }

    /// Find a user by email. Case-sensitive, as stored.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.load().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Insert a new user, failing with `DuplicateEmail` if the email is
    /// already registered. The whole read-modify-write runs under the
    /// store lock.
    pub async fn insert(&self, user: User) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load().await?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::DuplicateEmail);
        }
        users.push(user);
        self.persist_all(&users).await
    }

    /// Overwrite the backing document with the given user list.
    async fn persist_all(&self, users: &[User]) -> Result<()> {
        let doc = UsersFile::Versioned {
            version: USERS_FILE_VERSION,
            users: users.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&doc)?;
        atomic_write(&self.path, &raw).await
    }
}
