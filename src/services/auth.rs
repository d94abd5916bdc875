//! Authentication service: registration, login, and bearer token
//! issuance/verification.
//!
//! Tokens are stateless HS256 JWTs with a 7-day validity window. There is
//! no server-side revocation; expiry is the only invalidation mechanism.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::models::{new_id, PublicUser, Usage, User};
use crate::store::{ConversationStore, UserStore};
use crate::{Error, Result};

/// Identity claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

pub struct AuthService {
    users: Arc<UserStore>,
    conversations: Arc<ConversationStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_seconds: i64,
}

impl AuthService {
    pub fn new(
        config: &AuthConfig,
        users: Arc<UserStore>,
        conversations: Arc<ConversationStore>,
    ) -> Self {
        Self {
            users,
            conversations,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_seconds: config.token_ttl_seconds,
        }
    }

    /// Register a new user and log them in.
    ///
    /// # Errors
    ///
    /// `Validation` on any empty field, `DuplicateEmail` if the email is
    /// already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(String, PublicUser)> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(Error::Validation("All fields are required".into()));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            usage: Usage::today(),
        };

        self.users.insert(user.clone()).await?;
        self.conversations.ensure_user_dir(&user.id).await?;

        tracing::info!(user_id = %user.id, "user registered");

        let token = self.issue_token(&user)?;
        Ok((token, PublicUser::from(&user)))
    }

    /// Verify credentials and issue a token.
    ///
    /// Unknown email and wrong password both map to `InvalidCredentials`,
    /// deliberately indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, PublicUser)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        // bcrypt verification is CPU-bound; keep it off the async executor
        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
            .await
            .map_err(|e| Error::Internal(format!("Password verification task failed: {}", e)))??;

        if !matches {
            return Err(Error::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "user logged in");

        let token = self.issue_token(&user)?;
        Ok((token, PublicUser::from(&user)))
    }

    /// Decode and validate a bearer token, returning its identity claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::InvalidToken,
            },
        )?;
        Ok(data.claims)
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            iat: now,
            exp: now + self.token_ttl_seconds,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("Token signing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &std::path::Path) -> AuthService {
        let users = Arc::new(UserStore::new(dir));
        let conversations = Arc::new(ConversationStore::new(dir));
        AuthService::new(
            &AuthConfig {
                jwt_secret: "test-secret".into(),
                token_ttl_seconds: 7 * 24 * 3600,
            },
            users,
            conversations,
        )
    }

    #[tokio::test]
    async fn test_register_login_verify_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let auth = service(dir.path());

        let (token, user) = auth
            .register("Hamza", "hamza@example.com", "hunter22")
            .await
            .unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "Hamza");

        let (token, logged_in) = auth.login("hamza@example.com", "hunter22").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(auth.verify(&token).unwrap().sub, user.id);
    }

    #[tokio::test]
    async fn test_register_validates_fields() {
        let dir = tempfile::tempdir().unwrap();
        let auth = service(dir.path());

        for (name, email, password) in [("", "a@b.c", "pw"), ("A", "", "pw"), ("A", "a@b.c", "")] {
            let err = auth.register(name, email, password).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let dir = tempfile::tempdir().unwrap();
        let auth = service(dir.path());
        auth.register("A", "a@example.com", "right").await.unwrap();

        let wrong_pw = auth.login("a@example.com", "wrong").await.unwrap_err();
        let no_user = auth.login("nobody@example.com", "right").await.unwrap_err();
        assert_eq!(wrong_pw.to_string(), no_user.to_string());
        assert!(matches!(wrong_pw, Error::InvalidCredentials));
        assert!(matches!(no_user, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let auth = service(dir.path());

        // exp beyond the default 60s validation leeway
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "u1".into(),
            name: "A".into(),
            iat: now - 8 * 24 * 3600,
            exp: now - 120,
        };
        let token = auth.sign(&claims).unwrap();

        let err = auth.verify(&token).unwrap_err();
        assert!(matches!(err, Error::TokenExpired));
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let auth = service(dir.path());
        let (token, _) = auth.register("A", "a@example.com", "pw123").await.unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(matches!(
            auth.verify(&tampered).unwrap_err(),
            Error::InvalidToken
        ));
        assert!(matches!(
            auth.verify("not-a-jwt").unwrap_err(),
            Error::InvalidToken
        ));
    }
}
