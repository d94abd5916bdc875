//! Conversation listing and retrieval endpoints.

use axum::extract::{Extension, Path, State};
use axum::Json;
use serde::Serialize;

use crate::middleware::AuthUser;
use crate::models::{ConversationSummary, Turn};
use crate::{AppState, Result};

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Turn>,
}

/// GET /api/conversations
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ListResponse>> {
    let conversations = state.conversations.list_for_user(&auth.user_id).await?;
    Ok(Json(ListResponse { conversations }))
}

/// GET /api/conversations/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessagesResponse>> {
    let messages = state.conversations.load(&auth.user_id, &id).await?;
    Ok(Json(MessagesResponse { messages }))
}
