//! Text chunking to keep each LLM request under the input limit
//!
//! All sizes are counted in characters, never bytes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separators tried in order by the recursive splitter. The empty
/// separator splits into single characters.
const SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// How long text is split into chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Split on paragraphs, then lines, then words, then characters,
    /// merging pieces back up to the chunk size with overlap
    #[default]
    Recursive,
    /// Consecutive windows of exactly `chunk_size` characters, no overlap
    Fixed,
}

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap carried between recursive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker; `chunk_size` must be positive and larger than
    /// `overlap`
    pub fn try_new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::config("chunk_size must be greater than zero"));
        }
        if overlap >= chunk_size {
            return Err(Error::config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split with the given strategy
    pub fn split(&self, text: &str, strategy: ChunkStrategy) -> Vec<String> {
        match strategy {
            ChunkStrategy::Recursive => self.split_recursive(text),
            ChunkStrategy::Fixed => self.split_fixed(text),
        }
    }

    /// Split into `ceil(len / chunk_size)` consecutive windows. Joining the
    /// windows gives back the input.
    pub fn split_fixed(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut count = 0usize;

        for ch in text.chars() {
            current.push(ch);
            count += 1;
            if count == self.chunk_size {
                chunks.push(std::mem::take(&mut current));
                count = 0;
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Split on the coarsest separator present, recursing into pieces that
    /// are still too long, and merge small pieces back into chunks of at
    /// most `chunk_size` characters
    pub fn split_recursive(&self, text: &str) -> Vec<String> {
        self.split_with_separators(text, SEPARATORS)
    }

    fn split_with_separators(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // First separator that occurs in the text; "" always matches
        let (separator, remaining) = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep))
            .map(|i| (separators[i], &separators[i + 1..]))
            .unwrap_or(("", &[][..]));

        let pieces = split_keeping_separator(text, separator);

        let mut good_pieces: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                good_pieces.push(piece);
                continue;
            }

            if !good_pieces.is_empty() {
                final_chunks.extend(self.merge_pieces(&good_pieces));
                good_pieces.clear();
            }

            if remaining.is_empty() {
                final_chunks.push(piece.to_string());
            } else {
                final_chunks.extend(self.split_with_separators(piece, remaining));
            }
        }

        if !good_pieces.is_empty() {
            final_chunks.extend(self.merge_pieces(&good_pieces));
        }

        final_chunks
    }

    /// Greedily pack pieces into chunks, keeping up to `overlap` characters
    /// of trailing pieces at the start of the next chunk
    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<(&str, usize)> = Vec::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }
                push_trimmed(&mut chunks, &window);

                // Drop from the front until the remainder fits as overlap
                // and leaves room for the incoming piece
                while total > self.overlap || (total + len > self.chunk_size && total > 0) {
                    let (_, first_len) = window.remove(0);
                    total -= first_len;
                }
            }

            window.push((piece, len));
            total += len;
        }

        push_trimmed(&mut chunks, &window);
        chunks
    }
}

/// Split `text` on `separator`, attaching each separator to the start of the
/// piece that follows it. Empty pieces are dropped. An empty separator
/// yields single characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, ch)| &text[i..i + ch.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0usize;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces.retain(|p| !p.is_empty());
    pieces
}

fn push_trimmed(chunks: &mut Vec<String>, window: &[(&str, usize)]) {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
