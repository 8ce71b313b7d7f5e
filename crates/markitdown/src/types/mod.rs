//! Core types for markitdown

pub mod document;
pub mod source;

pub use document::{CombinedContent, DocumentSummary, ExtractedDocument, FileType};
pub use source::InputSource;
