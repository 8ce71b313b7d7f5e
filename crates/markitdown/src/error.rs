//! Error types for markitdown

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for markitdown operations
pub type Result<T> = std::result::Result<T, Error>;

/// Extraction, LLM and output errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key in the environment or `.env`
    #[error(
        "OpenAI API key not found. Please set the OPENAI_API_KEY environment variable.\n\
         Create a .env file in the working directory with: OPENAI_API_KEY=your_key_here"
    )]
    MissingApiKey,

    /// Input path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Web page could not be fetched
    #[error("Failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Every input failed or was empty
    #[error("No content could be extracted from the provided inputs")]
    NoContent,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
