//! Direct or chunked processing of combined content

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::generation::{PromptBuilder, SYSTEM_PROMPT};
use crate::ingestion::{ChunkStrategy, TextChunker};
use crate::providers::LlmProvider;

/// Result of a summarization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Final answer text
    pub text: String,
    /// Number of chunks sent (0 when content went in one request)
    pub chunk_count: usize,
    /// Number of LLM requests made
    pub llm_calls: usize,
}

/// Sends content to the LLM, chunking it when it is too long
pub struct Summarizer {
    provider: Arc<dyn LlmProvider>,
    chunker: TextChunker,
    strategy: ChunkStrategy,
    chunk_threshold: usize,
    show_progress: bool,
}

impl Summarizer {
    /// Create a summarizer from chunking settings
    pub fn new(provider: Arc<dyn LlmProvider>, config: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            provider,
            chunker: TextChunker::try_new(config.chunk_size, config.chunk_overlap)?,
            strategy: config.strategy,
            chunk_threshold: config.chunk_threshold,
            show_progress: false,
        })
    }

    /// Show a progress bar on stderr while chunks are processed
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Summarize `content`, or answer `query` about it
    pub async fn run(&self, content: &str, query: Option<&str>) -> Result<SummaryOutcome> {
        let len = content.chars().count();

        if len <= self.chunk_threshold {
            let text = self.ask(content, query).await?;
            return Ok(SummaryOutcome {
                text,
                chunk_count: 0,
                llm_calls: 1,
            });
        }

        tracing::debug!(
            "Content size ({} chars) exceeds processing limit. Chunking content...",
            len
        );
        let chunks = self.chunker.split(content, self.strategy);
        tracing::debug!("Split content into {} chunks", chunks.len());
        if chunks.is_empty() {
            return Err(Error::NoContent);
        }

        let progress = self.progress_bar(chunks.len());
        let mut results = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            tracing::debug!("Processing chunk {}/{}", i + 1, chunks.len());
            let result = self.ask(chunk, query).await;
            progress.inc(1);
            results.push(result?);
        }
        progress.finish_and_clear();

        let mut llm_calls = results.len();
        let text = if results.len() > 1 {
            tracing::debug!("Combining results from {} chunks...", results.len());
            llm_calls += 1;
            self.provider
                .complete(SYSTEM_PROMPT, &PromptBuilder::build_combine_prompt(&results))
                .await?
        } else {
            results.pop().unwrap_or_default()
        };

        Ok(SummaryOutcome {
            text,
            chunk_count: chunks.len(),
            llm_calls,
        })
    }

    async fn ask(&self, content: &str, query: Option<&str>) -> Result<String> {
        let prompt = PromptBuilder::build(content, query);
        self.provider.complete(SYSTEM_PROMPT, &prompt).await
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} chunks ({elapsed})")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}
