//! Prompt construction

pub mod prompt;

pub use prompt::{PromptBuilder, COMBINE_INSTRUCTION, SYSTEM_PROMPT};
