//! OpenAI API client implementing the [`LlmClient`] port.

use async_trait::async_trait;
use meetsync_core::ports::LlmClient;
use meetsync_domain::{LlmCompletion, UpstreamError};
use tracing::debug;

use crate::http::HttpClient;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorResponse};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 250;
const TEMPERATURE: f32 = 0.7;
const PRESENCE_PENALTY: f32 = 0.3;
const FREQUENCY_PENALTY: f32 = 0.3;

/// OpenAI chat-completions client for summary generation.
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (configuration or tests). The completions
    /// path is appended.
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        self.api_url = format!("{base}/v1/chat/completions");
        self
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<LlmCompletion, UpstreamError> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system_prompt.to_string() },
                ChatMessage { role: "user".to_string(), content: user_prompt.to_string() },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
        };

        let bearer = format!("Bearer {}", self.api_key);
        let response = self
            .http_client
            .post_json(&self.api_url, &[("Authorization", bearer.as_str())], &payload)
            .await
            .map_err(|err| UpstreamError::network(err.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), model = %self.model, "received completion response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed: Option<ErrorResponse> = serde_json::from_str(&body).ok();
            let (message, code) = match parsed {
                Some(envelope) => (
                    envelope.error.message.unwrap_or_else(|| body.clone()),
                    envelope.error.code,
                ),
                None => (if body.is_empty() { format!("status {status}") } else { body }, None),
            };
            let mut err = UpstreamError::http(status.as_u16(), message);
            if let Some(code) = code {
                err = err.with_code(code);
            }
            return Err(err);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| UpstreamError::network(format!("invalid completion response: {err}")))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_else(|| "Unable to generate summary".to_string());
        let tokens_used = completion.usage.map_or(0, |usage| usage.total_tokens);

        Ok(LlmCompletion { text, tokens_used })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: String) -> OpenAiClient {
        let http_client =
            HttpClient::with_policy(Duration::from_secs(5), 1, Duration::from_millis(5))
                .expect("http client");
        OpenAiClient::new("test-api-key".to_string(), http_client).with_base_url(base_url)
    }

    #[tokio::test]
    async fn completion_extracts_text_and_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "A focused standup." } }],
                "usage": { "total_tokens": 57, "prompt_tokens": 40, "completion_tokens": 17 }
            })))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let completion = client.complete("system", "user").await.expect("completion");
        assert_eq!(completion.text, "A focused standup.");
        assert_eq!(completion.tokens_used, 57);
    }

    #[tokio::test]
    async fn quota_errors_surface_status_and_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "message": "You exceeded your current quota",
                    "code": "insufficient_quota"
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client.complete("system", "user").await.expect_err("failure");
        assert_eq!(err.status, Some(429));
        assert_eq!(err.code.as_deref(), Some("insufficient_quota"));
    }

    #[tokio::test]
    async fn empty_choices_fall_back_to_placeholder_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let completion = client.complete("system", "user").await.expect("completion");
        assert_eq!(completion.text, "Unable to generate summary");
        assert_eq!(completion.tokens_used, 0);
    }
}
