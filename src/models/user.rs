//! User and credential models.

use serde::{Deserialize, Serialize};

/// A registered user, as persisted in the credential document.
///
/// The password hash never leaves the store layer; API responses use
/// [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Daily usage counter for the pro model (reserved, not yet enforced).
    #[serde(default)]
    pub usage: Usage,
}

/// Per-day usage counter attached to a user record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub count: u32,
    /// Calendar date the counter applies to (YYYY-MM-DD).
    pub date: String,
}

impl Usage {
    pub fn today() -> Self {
        Self {
            count: 0,
            date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Public projection of a user, safe to serialize to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_drops_hash() {
        let user = User {
            id: "u1".into(),
            name: "Test".into(),
            email: "t@example.com".into(),
            password_hash: "$2b$12$secret".into(),
            usage: Usage::today(),
        };

        let public = PublicUser::from(&user);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("t@example.com"));
    }
}
