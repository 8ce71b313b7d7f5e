//! LLM provider abstraction and the OpenAI-compatible backend

pub mod llm;
pub mod openai;

pub use llm::LlmProvider;
pub use openai::OpenAiClient;
