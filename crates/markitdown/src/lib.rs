//! markitdown: extract text from documents and web pages, then summarize or
//! query it with an LLM
//!
//! The pipeline is sequential: each input (file or URL) is extracted with a
//! format-specific parser, the results are concatenated, long content is
//! split into chunks, and every chunk is sent to an OpenAI-compatible
//! chat-completions endpoint one request at a time.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod output;
pub mod processing;
pub mod providers;
pub mod types;

#[cfg(test)]
mod test_util;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::{
    document::{CombinedContent, DocumentSummary, ExtractedDocument, FileType},
    source::InputSource,
};
