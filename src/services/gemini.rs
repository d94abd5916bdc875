//! Client for the Gemini generateContent API.
//!
//! Sends the system instruction, prior conversation history, and the new
//! user message in a single request and extracts the first candidate's text.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::GeminiConfig;
use crate::models::Turn;
use crate::{Error, Result};

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Run one completion: system instruction + prior history + new message.
    pub async fn generate(
        &self,
        system_instruction: &str,
        history: &[Turn],
        message: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut contents: Vec<Value> = history
            .iter()
            .map(|turn| serde_json::to_value(turn))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Internal(format!("Failed to serialize history: {}", e)))?;
        contents.push(json!({
            "role": "user",
            "parts": [{"text": message}]
        }));

        let body = json!({
            "system_instruction": {
                "parts": [{"text": system_instruction}]
            },
            "contents": contents,
        });

        tracing::debug!(model = %self.model, turns = history.len(), "calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "Gemini returned {}: {}",
                status, text
            )));
        }

        Self::parse_response(&text)
    }

    fn parse_response(text: &str) -> Result<String> {
        let response: GenerateResponse = serde_json::from_str(text)
            .map_err(|e| Error::Upstream(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = response.error {
            return Err(Error::Upstream(error.message));
        }

        response
            .candidates
            .as_deref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| Error::Upstream("No content in Gemini response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidate_text() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "hello there"}], "role": "model"}}
            ]
        }"#;
        assert_eq!(GeminiClient::parse_response(raw).unwrap(), "hello there");
    }

    #[test]
    fn test_parse_api_error() {
        let raw = r#"{"error": {"message": "API key not valid", "code": 400}}"#;
        let err = GeminiClient::parse_response(raw).unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[test]
    fn test_parse_empty_candidates() {
        let raw = r#"{"candidates": []}"#;
        assert!(GeminiClient::parse_response(raw).is_err());
    }
}
