//! Command-line interface

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::ingestion::{ChunkStrategy, IngestPipeline};
use crate::output::{OutputTarget, OutputWriter};
use crate::processing::Summarizer;
use crate::providers::{LlmProvider, OpenAiClient};
use crate::types::InputSource;

/// Process various document types with an LLM for summarization or custom queries.
///
/// Supported inputs: text and markdown (.txt, .md), web pages (http/https
/// URLs), CSV (.csv), Word (.docx), PDF (.pdf), HTML (.html, .htm) and
/// JSON (.json). Other extensions are read as text.
#[derive(Debug, Parser)]
#[command(
    name = "markitdown",
    version,
    after_help = "Example: markitdown file.txt https://example.com -q \"Extract key points\" -o output.txt"
)]
pub struct Cli {
    /// Input sources (files or URLs)
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    /// Custom query prompt (default: summarize)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output file path (default: print to console)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Model name (overrides OPENAI_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum tokens per response
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between chunks in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Content longer than this many characters is chunked
    #[arg(long)]
    pub chunk_threshold: Option<usize>,

    /// Split into fixed windows instead of on paragraph/line/word boundaries
    #[arg(long)]
    pub fixed_chunks: bool,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(size) = self.chunk_size {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunking.chunk_overlap = overlap;
        }
        if let Some(threshold) = self.chunk_threshold {
            config.chunking.chunk_threshold = threshold;
        }
        if self.fixed_chunks {
            config.chunking.strategy = ChunkStrategy::Fixed;
        }
    }

    pub fn sources(&self) -> Vec<InputSource> {
        self.inputs.iter().map(|raw| InputSource::parse(raw)).collect()
    }

    /// Build the final configuration (call `load_dotenv()` first)
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

/// Run the whole pipeline: extract, summarize, write
pub async fn run(cli: Cli) -> Result<OutputTarget> {
    let config = cli.resolve_config()?;

    // Fail on a missing key before any extraction work
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiClient::new(&config.llm)?);
    tracing::debug!("Using {} model {}", provider.name(), provider.model());

    let pipeline = IngestPipeline::new(&config.fetch)?;
    let combined = pipeline.extract_all(&cli.sources()).await?;
    tracing::debug!(
        "Combined {} documents into {} characters",
        combined.documents.len(),
        combined.char_count()
    );

    let summarizer = Summarizer::new(provider, &config.chunking)?.with_progress(!cli.verbose);
    let outcome = summarizer.run(&combined.text, cli.query.as_deref()).await?;
    tracing::debug!(
        "Finished after {} LLM calls ({} chunks)",
        outcome.llm_calls,
        outcome.chunk_count
    );

    let target = OutputWriter::stdout().emit(&outcome.text, cli.output.as_deref())?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "markitdown",
            "report.docx",
            "https://example.com",
            "-q",
            "Extract the main arguments",
            "-o",
            "analysis.txt",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.inputs, vec!["report.docx", "https://example.com"]);
        assert_eq!(cli.query.as_deref(), Some("Extract the main arguments"));
        assert_eq!(cli.output, Some(PathBuf::from("analysis.txt")));
        assert!(cli.verbose);

        let sources = cli.sources();
        assert!(!sources[0].is_url());
        assert!(sources[1].is_url());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["markitdown", "-v"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "markitdown",
            "a.txt",
            "--model",
            "gpt-4o-mini",
            "--chunk-size",
            "1000",
            "--chunk-overlap",
            "100",
            "--chunk-threshold",
            "1500",
            "--max-tokens",
            "300",
            "--fixed-chunks",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 300);
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert_eq!(config.chunking.chunk_threshold, 1500);
        assert_eq!(config.chunking.strategy, ChunkStrategy::Fixed);
        assert!(config.validate().is_ok());
    }
}
