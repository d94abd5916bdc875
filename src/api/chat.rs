//! Chat endpoint.

use axum::extract::{Extension, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::middleware::AuthUser;
use crate::models::Turn;
use crate::{AppState, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub conversation_id: Option<String>,
    /// Model selection flag; `MOHO-K3-Pro` selects the pro variant.
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub conversation_id: String,
    pub history: Vec<Turn>,
}

/// POST /api/chat
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let outcome = state
        .chat
        .send(
            &auth.user_id,
            &request.message,
            request.conversation_id,
            &request.model,
        )
        .await?;

    Ok(Json(ChatResponse {
        conversation_id: outcome.conversation_id,
        history: outcome.history,
    }))
}
