//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// A chat model that answers one prompt at a time
///
/// Implementations:
/// - `OpenAiClient`: OpenAI-compatible chat-completions endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a system message and a user prompt, return the reply text
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
