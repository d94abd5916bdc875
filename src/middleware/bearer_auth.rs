//! Bearer token authentication middleware.
//!
//! Validates `Authorization: Bearer <jwt>` headers on protected routes and
//! injects the authenticated identity into request extensions. Tokens are
//! self-contained; no store lookup happens here.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{AppState, Error};

/// Identity injected into request extensions after token validation.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub name: String,
}

/// Middleware that requires a valid bearer token.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing, not a Bearer token,
/// or the token fails signature/expiry validation.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(Error::Unauthenticated)?;

    let claims = state.auth.verify(token)?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        name: claims.name,
    });

    Ok(next.run(req).await)
}
