//! Configuration for the MOHO server.
//!
//! Everything is environment-driven. Secrets have no fallback values:
//! a missing `MOHO_JWT_SECRET` or `GEMINI_API_KEY` is a hard startup failure.

use std::env;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Token validity window in seconds (default 7 days).
    pub token_ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory holding users.json and the conversations tree.
    pub data_dir: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails if a required secret is missing or a numeric value is malformed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = env_or("PORT", "3000")
            .parse()
            .map_err(|_| Error::Internal("Invalid PORT".into()))?;

        let token_ttl_seconds = env_or("TOKEN_TTL_SECONDS", "604800")
            .parse()
            .map_err(|_| Error::Internal("Invalid TOKEN_TTL_SECONDS".into()))?;

        Ok(Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port,
            },
            auth: AuthConfig {
                jwt_secret: required("MOHO_JWT_SECRET")?,
                token_ttl_seconds,
            },
            gemini: GeminiConfig {
                base_url: env_or(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
                model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
                api_key: required("GEMINI_API_KEY")?,
            },
            storage: StorageConfig {
                data_dir: env_or("DATA_DIR", "./db"),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Internal(format!(
            "Missing required environment variable: {}",
            key
        ))),
    }
}
