//! Chat-completion client used to turn a prompt into a JSON summary string.
//!
//! The client speaks the OpenAI chat-completions wire format directly over `reqwest`: one
//! system message, one user message, and `response_format: json_object`. Any compatible
//! endpoint can be targeted through `OPENAI_BASE_URL`.

use crate::config::Config;
use crate::prompt::SYSTEM_INSTRUCTION;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced while requesting a summary from the provider.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be reached or the HTTP client could not be built.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Send `prompt` as the user message and return the model's reply, trimmed.
    async fn summarize_text(&self, prompt: &str) -> Result<String, SummarizationClientError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiSummarizationClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSummarizationClient {
    /// Build a client for the provider described by `config`.
    pub fn new(config: &Config) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent(concat!("docsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url: config.openai_base_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl SummarizationClient for OpenAiSummarizationClient {
    async fn summarize_text(&self, prompt: &str) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": prompt },
            ],
            "response_format": { "type": "json_object" },
        });

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting summary");
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach provider at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode chat completion: {error}"
            ))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SummarizationClientError::InvalidResponse("no choices returned".into()))?
            .message
            .content
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse("first choice has no content".into())
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn client_for(server: &MockServer) -> OpenAiSummarizationClient {
        OpenAiSummarizationClient::new(&Config::for_provider(server.base_url(), "test-key"))
            .expect("client")
    }

    #[tokio::test]
    async fn returns_trimmed_first_choice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .json_body_partial(
                        r#"{
                            "model": "gpt-4o-mini",
                            "response_format": { "type": "json_object" }
                        }"#,
                    );
                then.status(200).json_body(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "  {\"short_version\":\"a\"}\n" } },
                        { "message": { "role": "assistant", "content": "ignored" } }
                    ]
                }));
            })
            .await;

        let reply = client_for(&server)
            .summarize_text("Summarize this")
            .await
            .expect("reply");

        mock.assert_async().await;
        assert_eq!(reply, "{\"short_version\":\"a\"}");
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions").json_body_partial(
                    json!({
                        "messages": [
                            { "role": "system", "content": SYSTEM_INSTRUCTION },
                            { "role": "user", "content": "the prompt" }
                        ]
                    })
                    .to_string(),
                );
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "content": "{}" } }]
                }));
            })
            .await;

        client_for(&server)
            .summarize_text("the prompt")
            .await
            .expect("reply");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_generation_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).body("rate limited");
            })
            .await;

        let error = client_for(&server)
            .summarize_text("prompt")
            .await
            .expect_err("error response");

        assert!(
            matches!(&error, SummarizationClientError::GenerationFailed(message) if message.contains("429") && message.contains("rate limited")),
            "unexpected error: {error:?}"
        );
    }

    #[tokio::test]
    async fn empty_choices_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let error = client_for(&server)
            .summarize_text("prompt")
            .await
            .expect_err("no choices");
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn null_content_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200)
                    .json_body(json!({ "choices": [{ "message": { "content": null } }] }));
            })
            .await;

        let error = client_for(&server)
            .summarize_text("prompt")
            .await
            .expect_err("null content");
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_unavailable() {
        let client =
            OpenAiSummarizationClient::new(&Config::for_provider("http://127.0.0.1:9", "key"))
                .expect("client");
        let error = client
            .summarize_text("prompt")
            .await
            .expect_err("connection refused");
        assert!(matches!(
            error,
            SummarizationClientError::ProviderUnavailable(_)
        ));
    }
}
