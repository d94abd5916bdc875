//! Application state shared across all handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::services::{AuthService, ChatService, GeminiClient};
use crate::store::{ConversationStore, UserStore};
use crate::Result;

#[derive(Clone)]
pub struct AppState {
    /// Credential store (users.json).
    pub users: Arc<UserStore>,
    /// Per-user conversation documents.
    pub conversations: Arc<ConversationStore>,
    /// Registration, login, token verification.
    pub auth: Arc<AuthService>,
    /// Message relay to the Gemini API.
    pub chat: Arc<ChatService>,
}

impl AppState {
    /// Create application state, wiring every service from explicit
    /// configuration and preparing the on-disk layout.
    pub async fn new(config: &Config) -> Result<Self> {
        let users = Arc::new(UserStore::new(&config.storage.data_dir));
        let conversations = Arc::new(ConversationStore::new(&config.storage.data_dir));

        users.ensure_ready().await?;
        conversations.ensure_ready().await?;

        let auth = Arc::new(AuthService::new(
            &config.auth,
            users.clone(),
            conversations.clone(),
        ));

        let gemini = Arc::new(GeminiClient::new(&config.gemini));
        let chat = Arc::new(ChatService::new(gemini, conversations.clone()));

        Ok(Self {
            users,
            conversations,
            auth,
            chat,
        })
    }
}
