//! API routes for the MOHO server.
//!
//! This module combines all API routes into a single router.
//!
//! Route structure (all under /api):
//! - POST /api/register, POST /api/login - public
//! - GET  /api/verify - bearer-protected
//! - POST /api/chat - bearer-protected
//! - GET  /api/conversations, /api/conversations/:id - bearer-protected

mod auth;
mod chat;
mod conversations;

use axum::routing::{get, post};
use axum::Router;

use crate::middleware::require_auth;
use crate::AppState;

/// Build the complete API router.
pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected = Router::new()
        .route("/verify", get(auth::verify))
        .route("/chat", post(chat::send_message))
        .route("/conversations", get(conversations::list))
        .route("/conversations/:id", get(conversations::get_one))
        .layer(axum::middleware::from_fn_with_state(state, require_auth));

    Router::new().nest("/api", public.merge(protected))
}
