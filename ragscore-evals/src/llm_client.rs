// Copyright 2025 Ragscore Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! LLM client abstraction for the consistency judge

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Opaque oracle boundary: one prompt in, one text completion out.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Send a prompt and return the raw completion text.
    async fn complete(&self, prompt: String) -> Result<String, LLMError>;

    /// Get model name.
    fn model_name(&self) -> &str;
}

/// Errors from LLM clients.
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("failed to read API key from {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for OpenAI-compatible chat-completions endpoints.
///
/// Judgments are deterministic (temperature 0); the model defaults to
/// `gpt-4o-mini`.
pub struct OpenAIClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from a locally stored credential file; only the first
    /// line is read.
    pub fn from_key_file(
        path: impl AsRef<Path>,
        model: impl Into<String>,
    ) -> Result<Self, LLMError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LLMError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        let api_key = contents.lines().next().unwrap_or_default().trim().to_string();
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(&self, prompt: String) -> Result<String, LLMError> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": 0.0
        });

        debug!("dispatching judge prompt to {}", self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LLMError::RateLimitExceeded);
            }
            return Err(LLMError::ApiError(error_text));
        }

        let response_data: serde_json::Value = response.json().await?;

        let content = response_data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LLMError::InvalidResponse("missing message content".to_string()))?;

        Ok(content.to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"True."}}]}"#)
            .create_async()
            .await;

        let client =
            OpenAIClient::new("test-key".to_string(), "gpt-4o-mini").with_base_url(server.url());
        let content = client.complete("prompt".to_string()).await.unwrap();

        assert_eq!(content, "True.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client =
            OpenAIClient::new("test-key".to_string(), "gpt-4o-mini").with_base_url(server.url());
        let err = client.complete("prompt".to_string()).await.unwrap_err();

        assert!(matches!(err, LLMError::ApiError(ref body) if body.contains("upstream exploded")));
    }

    #[tokio::test]
    async fn test_complete_rejects_missing_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client =
            OpenAIClient::new("test-key".to_string(), "gpt-4o-mini").with_base_url(server.url());
        let err = client.complete("prompt".to_string()).await.unwrap_err();

        assert!(matches!(err, LLMError::InvalidResponse(_)));
    }

    #[test]
    fn test_from_key_file_reads_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sk-test-key  ").unwrap();
        writeln!(file, "ignored second line").unwrap();

        let client = OpenAIClient::from_key_file(file.path(), "gpt-4o-mini").unwrap();
        assert_eq!(client.api_key, "sk-test-key");
        assert_eq!(client.model_name(), "gpt-4o-mini");
    }
}
