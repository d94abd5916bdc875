//! MOHO AI chat backend.
//!
//! A small HTTP server that manages user accounts, persists conversation
//! transcripts to per-user flat files, and relays messages to the Gemini
//! generative-language API.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
