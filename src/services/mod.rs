//! Business logic services.

mod auth;
mod chat;
mod gemini;

pub use auth::{AuthService, Claims};
pub use chat::{ChatOutcome, ChatService, PRO_MODEL_FLAG};
pub use gemini::GeminiClient;
