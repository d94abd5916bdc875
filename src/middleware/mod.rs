//! HTTP middleware.

mod bearer_auth;

pub use bearer_auth::{require_auth, AuthUser};
