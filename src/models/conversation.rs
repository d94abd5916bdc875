//! Conversation and turn models.
//!
//! A conversation is an append-only sequence of role-tagged turns, one JSON
//! document per conversation under the owning user's directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder title for a conversation with no turns yet.
pub const DEFAULT_TITLE: &str = "محادثة جديدة";

/// Maximum title length, in characters, taken from the first turn.
pub const TITLE_MAX_CHARS: usize = 40;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One text fragment of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One message exchange unit, attributed to the user or the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Text of the first part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().map(|p| p.text.as_str())
    }
}

/// On-disk conversation document.
///
/// Version 1 wraps the turn list in an envelope carrying an explicit schema
/// version and creation timestamp. Older documents are bare JSON arrays of
/// turns; those still deserialize (as [`ConversationFile::Legacy`]) and are
/// upgraded to the envelope on the next write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationFile {
    Versioned(ConversationDocument),
    Legacy(Vec<Turn>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDocument {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

impl ConversationFile {
    pub fn into_document(self) -> ConversationDocument {
        match self {
            Self::Versioned(doc) => doc,
            // Legacy files carry no timestamp; treat them as just created so
            // they sort ahead until rewritten with a real one.
            Self::Legacy(turns) => ConversationDocument {
                version: 1,
                created_at: Utc::now(),
                turns,
            },
        }
    }
}

/// Listing entry for a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
}

/// Derive a listing title from a turn sequence: the first 40 characters of
/// the first turn's text, or the default placeholder when empty.
pub fn title_for(turns: &[Turn]) -> String {
    turns
        .first()
        .and_then(Turn::first_text)
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn test_title_truncates_to_40_chars() {
        let long = "x".repeat(100);
        let turns = vec![Turn::user(long)];
        assert_eq!(title_for(&turns).chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_title_char_boundary_safe() {
        // 50 multibyte characters must truncate on a char boundary, not bytes
        let arabic = "م".repeat(50);
        let turns = vec![Turn::user(arabic)];
        let title = title_for(&turns);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_title_default_for_empty() {
        assert_eq!(title_for(&[]), DEFAULT_TITLE);
        let turns = vec![Turn::user("")];
        assert_eq!(title_for(&turns), DEFAULT_TITLE);
    }

    #[test]
    fn test_legacy_array_deserializes() {
        let raw = r#"[{"role":"user","parts":[{"text":"hi"}]},{"role":"model","parts":[{"text":"hello"}]}]"#;
        let file: ConversationFile = serde_json::from_str(raw).unwrap();
        let doc = file.into_document();
        assert_eq!(doc.turns.len(), 2);
        assert_eq!(doc.turns[0].role, Role::User);
    }

    #[test]
    fn test_versioned_envelope_round_trip() {
        let doc = ConversationDocument {
            version: 1,
            created_at: Utc::now(),
            turns: vec![Turn::user("hi"), Turn::model("hello")],
        };
        let raw = serde_json::to_string(&ConversationFile::Versioned(doc)).unwrap();
        let parsed: ConversationFile = serde_json::from_str(&raw).unwrap();
        let doc = parsed.into_document();
        assert_eq!(doc.version, 1);
        assert_eq!(doc.turns[1], Turn::model("hello"));
    }
}
