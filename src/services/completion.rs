use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the completion provider
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion API token is not configured")]
    MissingCredential,

    #[error("Completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// Whether another attempt could succeed
    ///
    /// Configuration errors are final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CompletionError::MissingCredential)
    }
}

/// A text-generation endpoint
///
/// `generate` makes exactly one attempt; retrying is the caller's concern
/// (see [`crate::core::retry`]).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub return_full_text: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 150,
            temperature: 0.7,
            return_full_text: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Client for a Hugging Face style inference endpoint
pub struct HuggingFaceClient {
    endpoint: String,
    api_token: Option<String>,
    parameters: GenerationParameters,
    client: Client,
}

impl HuggingFaceClient {
    pub fn new(
        endpoint: String,
        api_token: Option<String>,
        parameters: GenerationParameters,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        // Blank tokens from env substitution count as absent
        let api_token = api_token.filter(|t| !t.trim().is_empty());

        Ok(Self {
            endpoint,
            api_token,
            parameters,
            client,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_token.is_some()
    }
}

#[async_trait]
impl CompletionProvider for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let body = GenerationRequest {
            inputs: prompt,
            parameters: self.parameters,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        generated
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| CompletionError::InvalidResponse("Empty generation array".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_client(endpoint: String, token: Option<&str>) -> HuggingFaceClient {
        HuggingFaceClient::new(
            endpoint,
            token.map(str::to_string),
            GenerationParameters::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_retryable_classification() {
        assert!(!CompletionError::MissingCredential.is_retryable());
        assert!(CompletionError::Status { status: 503, body: String::new() }.is_retryable());
        assert!(CompletionError::Transport("reset".to_string()).is_retryable());
        assert!(CompletionError::InvalidResponse("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_blank_token_is_missing() {
        let client = create_client("http://localhost".to_string(), Some("  "));
        assert!(!client.has_credential());
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let client = create_client(server.url(), None);
        let result = client.generate("hello").await;

        assert!(matches!(result, Err(CompletionError::MissingCredential)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_sends_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test")
            .match_header("authorization", "Bearer hf_test")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "inputs": "Which service?",
                "parameters": {
                    "max_new_tokens": 150,
                    "temperature": 0.7,
                    "return_full_text": false
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text": "Birth Certificate"}]"#)
            .create_async()
            .await;

        let client = create_client(format!("{}/models/test", server.url()), Some("hf_test"));
        let text = client.generate("Which service?").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Birth Certificate");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .with_body(r#"{"error": "Model is loading"}"#)
            .create_async()
            .await;

        let client = create_client(server.url(), Some("hf_test"));
        match client.generate("hello").await {
            Err(CompletionError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert!(body.contains("loading"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_generation_array() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = create_client(server.url(), Some("hf_test"));
        assert!(matches!(
            client.generate("hello").await,
            Err(CompletionError::InvalidResponse(_))
        ));
    }
}
