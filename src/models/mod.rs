//! Data models for the MOHO server.
//!
//! Defines the persisted record types (users, conversations) and the
//! DTO shapes exposed over the API.

mod conversation;
mod user;

pub use conversation::*;
pub use user::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
