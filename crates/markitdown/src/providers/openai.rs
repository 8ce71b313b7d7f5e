//! OpenAI chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{ApiKey, LlmConfig};
use crate::error::{Error, Result};

use super::llm::LlmProvider;

/// Upper bound on the wait between retries
const MAX_BACKOFF_SECS: u64 = 60;

/// Client for `POST {base_url}/v1/chat/completions`
pub struct OpenAiClient {
    client: Client,
    api_key: ApiKey,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client; fails without an API key
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.clone();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}; retrying in {:?}",
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!("HTTP {} - {}", status, body)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse chat response: {}", e)))?;

        extract_content(body)
    }
}

/// 1s, 2s, 4s, ... capped at [`MAX_BACKOFF_SECS`]
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64
        .checked_pow(attempt)
        .map_or(MAX_BACKOFF_SECS, |secs| secs.min(MAX_BACKOFF_SECS));
    Duration::from_secs(secs)
}

fn extract_content(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::llm("missing choices[0].message.content"))
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        tracing::debug!(
            "Sending {} characters to {}",
            prompt.chars().count(),
            self.model
        );
        self.retry_request(|| self.send_once(system, prompt)).await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::serve_once;

    fn config_with_key() -> LlmConfig {
        LlmConfig {
            api_key: Some(ApiKey::new("sk-test")),
            base_url: "http://localhost:9999/".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        let result = OpenAiClient::new(&LlmConfig::default());
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_endpoint_and_model() {
        let client = OpenAiClient::new(&config_with_key()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            max_tokens: 1000,
            temperature: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn test_extract_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Summary."}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), "Summary.");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_content(empty), Err(Error::Llm(_))));

        let null_content: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(extract_content(null_content).is_err());
    }

    fn client_for(base_url: String) -> OpenAiClient {
        OpenAiClient::new(&LlmConfig {
            base_url,
            ..config_with_key()
        })
        .unwrap()
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
        assert_eq!(backoff_delay(6), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(64), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    #[tokio::test]
    async fn test_complete_parses_chat_reply() {
        let (base_url, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Short summary."}}]}"#,
        )
        .await;

        let answer = client_for(base_url).complete("sys", "Summarize this").await.unwrap();
        assert_eq!(answer, "Short summary.");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-test"));
        assert!(request.contains(r#""model":"gpt-3.5-turbo""#));
        assert!(request.contains(r#""content":"Summarize this""#));
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let (base_url, _server) = serve_once(
            "500 Internal Server Error",
            "application/json",
            r#"{"error":{"message":"overloaded"}}"#,
        )
        .await;

        let result = client_for(base_url).complete("sys", "hi").await;

        match result {
            Err(Error::Llm(message)) => {
                assert!(message.contains("500"), "{message}");
                assert!(message.contains("overloaded"), "{message}");
            }
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let mut config = config_with_key();
        config.max_retries = 0;
        let client = OpenAiClient::new(&config).unwrap();

        let calls = std::sync::atomic::AtomicU32::new(0);
        let result: Result<()> = client
            .retry_request(|| async {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err(Error::llm("boom"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
