//! Ingestion pipeline orchestration

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::{CombinedContent, ExtractedDocument, InputSource};

use super::fetcher::UrlFetcher;
use super::parser::FileParser;

/// Extracts every input in order and combines the results
pub struct IngestPipeline {
    fetcher: UrlFetcher,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(fetch: &FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: UrlFetcher::new(fetch)?,
        })
    }

    /// Extract text from a single input
    pub async fn process_input(&self, source: &InputSource) -> Result<ExtractedDocument> {
        match source {
            InputSource::Url(url) => {
                tracing::info!("Processing URL: {}", url);
                let content = self.fetcher.fetch_text(url).await?;
                Ok(ExtractedDocument::new(url.clone(), None, content))
            }
            InputSource::File(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound(path.clone()));
                }

                tracing::info!("Processing file: {}", path.display());
                let data = tokio::fs::read(path).await?;
                let filename = path.to_string_lossy();
                let parsed = FileParser::parse(&filename, &data)?;
                tracing::debug!("{} parsed as {}", filename, parsed.file_type.display_name());

                Ok(ExtractedDocument::new(
                    filename.into_owned(),
                    Some(parsed.file_type),
                    parsed.content,
                ))
            }
        }
    }

    /// Extract all inputs one at a time. Failed or empty inputs are logged
    /// and skipped; it is an error only when nothing is left.
    pub async fn extract_all(&self, sources: &[InputSource]) -> Result<CombinedContent> {
        let mut documents = Vec::with_capacity(sources.len());

        for source in sources {
            match self.process_input(source).await {
                Ok(doc) if doc.content.trim().is_empty() => {
                    tracing::warn!("No text extracted from {}, skipping", source);
                }
                Ok(doc) => {
                    tracing::debug!("Extracted {} characters from {}", doc.char_count(), source);
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::error!("Error extracting text from {}: {}", source, e);
                }
            }
        }

        if documents.is_empty() {
            return Err(Error::NoContent);
        }

        Ok(CombinedContent::combine(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::DOCUMENT_SEPARATOR;
    use crate::types::FileType;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> InputSource {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        InputSource::File(path)
    }

    fn pipeline() -> IngestPipeline {
        IngestPipeline::new(&FetchConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_process_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_file(&dir, "story.txt", b"Once upon a time.\n");

        let doc = pipeline().process_input(&source).await.unwrap();

        assert_eq!(doc.content, "Once upon a time.\n");
        assert_eq!(doc.file_type, Some(FileType::Txt));
        assert_eq!(doc.source, source.to_string());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = InputSource::File(PathBuf::from("/no/such/dir/missing.txt"));
        let result = pipeline().process_input(&source).await;
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_extract_all_skips_failures_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            write_file(&dir, "a.txt", b"alpha"),
            InputSource::File(dir.path().join("missing.pdf")),
            write_file(&dir, "empty.md", b""),
            write_file(&dir, "b.csv", b"x,y\n1,2\n"),
        ];

        let combined = pipeline().extract_all(&sources).await.unwrap();

        assert_eq!(combined.documents.len(), 2);
        assert_eq!(
            combined.text,
            format!("alpha{}x, y\n1, 2", DOCUMENT_SEPARATOR)
        );
        assert_eq!(combined.extracted_chars(), 5 + 9);
    }

    #[tokio::test]
    async fn test_extract_all_nothing_usable() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            write_file(&dir, "blank.txt", b""),
            write_file(&dir, "spaces.md", b"  \n\t\n  "),
            InputSource::File(dir.path().join("gone.txt")),
        ];

        let result = pipeline().extract_all(&sources).await;
        assert!(matches!(result, Err(Error::NoContent)));
    }
}
