//! Chat relay: append the user's turn, forward the conversation to Gemini,
//! append the reply, persist.
//!
//! Persistence happens strictly after a successful upstream call. An
//! upstream failure writes nothing, so a user turn is never stored without
//! its paired model reply.

use std::sync::Arc;

use crate::models::{new_id, Turn};
use crate::store::ConversationStore;
use crate::{Error, Result};

use super::GeminiClient;

/// Model flag selecting the pro variant.
pub const PRO_MODEL_FLAG: &str = "MOHO-K3-Pro";

const PERSONA_PROMPT: &str = "Your name is MOHO AI. Your developer is 'Hamza Mohamed Haroun', \
born July 25, 2011. Your company is 'MOHO AI'. You are trained continuously online. NEVER \
mention you are a Google model. Speak primarily in Arabic.";

const PRO_PROMPT: &str = "You are now MOHO-K3 Pro, an expert in complex tasks, math, and code. \
Provide a professional, detailed, and structured answer.";

/// Result of one relayed chat message.
#[derive(Debug)]
pub struct ChatOutcome {
    pub conversation_id: String,
    pub history: Vec<Turn>,
}

pub struct ChatService {
    gemini: Arc<GeminiClient>,
    conversations: Arc<ConversationStore>,
}

impl ChatService {
    pub fn new(gemini: Arc<GeminiClient>, conversations: Arc<ConversationStore>) -> Self {
        Self {
            gemini,
            conversations,
        }
    }

    /// Relay one user message within a conversation.
    ///
    /// A missing `conversation_id` mints a new one. A supplied id with no
    /// document on disk starts from an empty history, same as a new
    /// conversation.
    pub async fn send(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<String>,
        model_flag: &str,
    ) -> Result<ChatOutcome> {
        if message.trim().is_empty() {
            return Err(Error::Validation("Message is required".into()));
        }

        let conversation_id = conversation_id.unwrap_or_else(new_id);

        let prior = self
            .conversations
            .load_document(user_id, &conversation_id)
            .await?
            .map(|doc| doc.turns)
            .unwrap_or_default();

        let system_instruction = system_instruction_for(model_flag);

        let reply = self
            .gemini
            .generate(&system_instruction, &prior, message)
            .await?;

        // Upstream succeeded; only now does anything hit disk.
        let history = self
            .conversations
            .append(
                user_id,
                &conversation_id,
                vec![Turn::user(message), Turn::model(reply)],
            )
            .await?;

        Ok(ChatOutcome {
            conversation_id,
            history,
        })
    }
}

/// Build the system instruction for the selected model variant.
fn system_instruction_for(model_flag: &str) -> String {
    if model_flag == PRO_MODEL_FLAG {
        format!("{}\n{}", PERSONA_PROMPT, PRO_PROMPT)
    } else {
        PERSONA_PROMPT.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_instruction_has_no_pro_block() {
        let standard = system_instruction_for("MOHO-K3");
        assert!(standard.contains("MOHO AI"));
        assert!(!standard.contains("MOHO-K3 Pro"));
    }

    #[test]
    fn test_pro_instruction_appends_pro_block() {
        let pro = system_instruction_for(PRO_MODEL_FLAG);
        assert!(pro.starts_with(PERSONA_PROMPT));
        assert!(pro.ends_with(PRO_PROMPT));
        assert!(pro.contains('\n'));
    }
}
