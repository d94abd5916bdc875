//! Conversation store: one JSON document per conversation, one directory
//! per user under the conversations root.
//!
//! Ownership is structural. Every operation takes the authenticated user's
//! id and only ever touches paths under that user's directory, so
//! cross-user access cannot be expressed through this interface.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::models::{
    title_for, ConversationDocument, ConversationFile, ConversationSummary, Turn,
};
use crate::{Error, Result};

use super::{atomic_write, validate_id, KeyedLocks};

pub struct ConversationStore {
    root: PathBuf,
    locks: KeyedLocks,
}

impl ConversationStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join("conversations"),
            locks: KeyedLocks::new(),
        }
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join(user_id)
    }

    fn document_path(&self, user_id: &str, conversation_id: &str) -> PathBuf {
        self.user_dir(user_id).join(format!("{}.json", conversation_id))
    }

    /// Create the conversations root.
    pub async fn ensure_ready(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::Storage(format!("Failed to create conversations root: {}", e)))?;
        Ok(())
    }

    /// Create a user's conversation directory (done at registration).
    pub async fn ensure_user_dir(&self, user_id: &str) -> Result<()> {
        validate_id(user_id)?;
        fs::create_dir_all(self.user_dir(user_id))
            .await
            .map_err(|e| Error::Storage(format!("Failed to create user directory: {}", e)))?;
        Ok(())
    }

    /// Load a conversation, failing with `NotFound` if no document exists.
    pub async fn load(&self, user_id: &str, conversation_id: &str) -> Result<Vec<Turn>> {
        Ok(self
            .load_document(user_id, conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Conversation {}", conversation_id)))?
            .turns)
    }

    /// Load a conversation document if present.
    pub async fn load_document(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Option<ConversationDocument>> {
        validate_id(user_id)?;
        validate_id(conversation_id)?;

        let path = self.document_path(user_id, conversation_id);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let file: ConversationFile = serde_json::from_str(&raw).map_err(|e| {
            Error::Storage(format!("Corrupt conversation {}: {}", path.display(), e))
        })?;
        Ok(Some(file.into_document()))
    }

    /// Append turns to a conversation, creating it if absent. Returns the
    /// full updated turn sequence.
    ///
    /// The read-modify-write cycle is serialized per `(user, conversation)`
    /// key; concurrent appends to the same conversation queue up instead of
    /// overwriting each other.
    pub async fn append(
        &self,
        user_id: &str,
        conversation_id: &str,
        new_turns: Vec<Turn>,
    ) -> Result<Vec<Turn>> {
        validate_id(user_id)?;
        validate_id(conversation_id)?;

        let lock = self.locks.get(&format!("{}/{}", user_id, conversation_id));
        let _guard = lock.lock().await;

        let mut doc = self
            .load_document(user_id, conversation_id)
            .await?
            .unwrap_or_else(|| ConversationDocument {
                version: 1,
                created_at: crate::models::now(),
                turns: Vec::new(),
            });
        doc.turns.extend(new_turns);

        self.ensure_user_dir(user_id).await?;
        let raw = serde_json::to_string_pretty(&ConversationFile::Versioned(doc.clone()))?;
        atomic_write(&self.document_path(user_id, conversation_id), &raw).await?;

        Ok(doc.turns)
    }

    /// List a user's conversations, most recently created first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ConversationSummary>> {
        validate_id(user_id)?;

        let dir = self.user_dir(user_id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut found = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::Storage(format!("Failed to read directory entry: {}", e)))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(id) = name.strip_suffix(".json") else { continue };

            if let Some(doc) = self.load_document(user_id, id).await? {
                found.push((doc.created_at, ConversationSummary {
                    id: id.to_string(),
                    title: title_for(&doc.turns),
                }));
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(found.into_iter().map(|(_, summary)| summary).collect())
    }
}
