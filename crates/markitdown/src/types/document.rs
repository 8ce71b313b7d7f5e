//! Extracted document types

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placed between documents in the combined text
pub const DOCUMENT_SEPARATOR: &str = concat!(
    "\n\n",
    "------------------------------",
    " DOCUMENT SEPARATOR ",
    "------------------------------",
    "\n\n"
);

/// Supported file types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// CSV file
    Csv,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// HTML document
    Html,
    /// JSON document
    Json,
    /// Anything else; read as text. Holds the lowercased extension.
    Unknown(String),
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "csv" => Self::Csv,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            "json" => Self::Json,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Detect file type from a path's extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    /// Whether a dedicated extractor exists for this type
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Csv => "CSV",
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Html => "HTML",
            Self::Json => "JSON",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Text extracted from one input
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// The input as given on the command line
    pub source: String,
    /// Detected file type; `None` for web pages
    pub file_type: Option<FileType>,
    /// Extracted text
    pub content: String,
}

impl ExtractedDocument {
    pub fn new(source: impl Into<String>, file_type: Option<FileType>, content: String) -> Self {
        Self {
            source: source.into(),
            file_type,
            content,
        }
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Per-document bookkeeping kept after combining
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub source: String,
    pub char_count: usize,
}

/// All extracted documents joined into one text
#[derive(Debug, Clone)]
pub struct CombinedContent {
    /// Documents joined with [`DOCUMENT_SEPARATOR`]
    pub text: String,
    /// Sources in input order
    pub documents: Vec<DocumentSummary>,
}

impl CombinedContent {
    /// Join documents in order, separator between each pair
    pub fn combine(documents: Vec<ExtractedDocument>) -> Self {
        let summaries = documents
            .iter()
            .map(|d| DocumentSummary {
                source: d.source.clone(),
                char_count: d.char_count(),
            })
            .collect();

        let text = documents
            .into_iter()
            .map(|d| d.content)
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR);

        Self {
            text,
            documents: summaries,
        }
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Sum of the per-document lengths, separators excluded
    pub fn extracted_chars(&self) -> usize {
        self.documents.iter().map(|d| d.char_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("htm"), FileType::Html);
        assert_eq!(FileType::from_extension("md"), FileType::Markdown);
        assert_eq!(
            FileType::from_extension("log"),
            FileType::Unknown("log".to_string())
        );
        assert!(!FileType::from_path(Path::new("README")).is_recognized());
        assert_eq!(FileType::from_path(Path::new("a/b.Docx")), FileType::Docx);
    }

    #[test]
    fn test_separator_shape() {
        assert_eq!(
            DOCUMENT_SEPARATOR,
            format!("\n\n{} DOCUMENT SEPARATOR {}\n\n", "-".repeat(30), "-".repeat(30))
        );
    }

    #[test]
    fn test_combine_single_document_has_no_separator() {
        let combined =
            CombinedContent::combine(vec![ExtractedDocument::new("a.txt", None, "alpha".into())]);
        assert_eq!(combined.text, "alpha");
        assert_eq!(combined.extracted_chars(), 5);
    }

    #[test]
    fn test_combine_preserves_order_and_lengths() {
        let docs = vec![
            ExtractedDocument::new("a.txt", Some(FileType::Txt), "alpha".into()),
            ExtractedDocument::new("b.txt", Some(FileType::Txt), "bêta".into()),
        ];
        let combined = CombinedContent::combine(docs);

        assert_eq!(combined.text, format!("alpha{}bêta", DOCUMENT_SEPARATOR));
        assert_eq!(combined.documents[0].source, "a.txt");
        assert_eq!(combined.documents[1].char_count, 4);
        assert_eq!(
            combined.char_count(),
            combined.extracted_chars() + DOCUMENT_SEPARATOR.chars().count()
        );
    }
}
