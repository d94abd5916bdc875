//! Authentication endpoints: register, login, verify.

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::middleware::AuthUser;
use crate::models::PublicUser;
use crate::{AppState, Result};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (token, user) = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (token, user) = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(AuthResponse { token, user }))
}

/// GET /api/verify
pub async fn verify(Extension(auth): Extension<AuthUser>) -> Json<serde_json::Value> {
    Json(json!({
        "user": {
            "id": auth.user_id,
            "name": auth.name,
        }
    }))
}
