//! Document ingestion: per-format extraction, web pages and chunking

mod chunker;
mod fetcher;
pub mod html;
mod parser;
mod processor;

pub use chunker::{ChunkStrategy, TextChunker};
pub use fetcher::UrlFetcher;
pub use parser::{decode_text, FileParser, ParsedDocument};
pub use processor::IngestPipeline;
