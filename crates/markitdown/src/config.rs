//! Configuration for markitdown
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! the environment (after `.env` is loaded), then command-line flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ingestion::ChunkStrategy;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the API base URL
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the model
pub const MODEL_VAR: &str = "OPENAI_MODEL";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// LLM API configuration
    pub llm: LlmConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Web page fetching configuration
    pub fetch: FetchConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file and the process environment.
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is
    /// read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!("Using config file {}", path.display());
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML config text; missing sections and fields take defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(format!("invalid config file: {}", e)))
    }

    /// Apply environment overrides through `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_VAR) {
            self.llm.api_key = Some(ApiKey::new(key.trim()));
        }
        if let Some(url) = get(BASE_URL_VAR) {
            self.llm.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = get(MODEL_VAR) {
            self.llm.model = model.trim().to_string();
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::config("chunk_size must be greater than zero"));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::config("max_tokens must be greater than zero"));
        }
        Ok(())
    }
}

/// Per-user config file location (`<config dir>/markitdown/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("markitdown").join("config.toml"))
}

/// API secret that never shows up in `Debug` output
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Chat-completions API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key; only ever taken from the environment
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
    /// API base URL (without the `/v1/...` path)
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Maximum tokens in each response
    pub max_tokens: u32,
    /// Sampling temperature (API default when unset)
    pub temperature: Option<f32>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl LlmConfig {
    /// The API key, or `MissingApiKey`
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        self.api_key.as_ref().ok_or(Error::MissingApiKey)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            temperature: None,
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters (recursive strategy only)
    pub chunk_overlap: usize,
    /// Content longer than this many characters is chunked
    pub chunk_threshold: usize,
    /// How content is split
    pub strategy: ChunkStrategy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            chunk_overlap: 200,
            chunk_threshold: 4000,
            strategy: ChunkStrategy::Recursive,
        }
    }
}

/// Web page fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with page requests
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("markitdown/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
