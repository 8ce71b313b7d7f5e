//! Sequential LLM processing of extracted content

mod summarizer;

pub use summarizer::{SummaryOutcome, Summarizer};
