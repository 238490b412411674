//! Word-based text chunking.
//!
//! Text is split on whitespace into words and grouped into overlapping
//! windows of `chunk_size` words. A chunk whose rough token estimate still
//! exceeds `chunk_size` is shrunk from the end, one word at a time.

use aicraft_core::{CraftError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of words per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// Default number of words shared by consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Rough token estimate: one token per four bytes of text.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

/// Configuration for [`WordChunker`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum number of words per chunk.
    pub chunk_size: usize,

    /// Number of words repeated at the start of the next chunk.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    /// Create a new chunking configuration.
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration.
    ///
    /// The window must be non-empty and must advance by at least one word.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(CraftError::validation("chunk_size must be greater than 0"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(CraftError::validation(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Number of words between the starts of consecutive chunks.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// Splits text into overlapping word windows.
///
/// # Examples
///
/// ```rust
/// use aicraft_indexing::text::WordChunker;
///
/// let chunker = WordChunker::from_defaults(3, 1).unwrap();
/// let chunks = chunker.split_text("a b c d e f g");
/// assert_eq!(chunks, vec!["a b c", "c d e", "e f g"]);
/// ```
#[derive(Debug, Clone)]
pub struct WordChunker {
    config: ChunkingConfig,
}

impl WordChunker {
    /// Create a chunker, validating the configuration.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a chunker from a size and an overlap.
    pub fn from_defaults(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::new(ChunkingConfig::new(chunk_size, chunk_overlap))
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split text into chunks.
    ///
    /// Empty or whitespace-only text yields no chunks. Splitting stops as
    /// soon as a window reaches the last word, so the final chunk may be
    /// shorter than `chunk_size`.
    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let chunk_size = self.config.chunk_size;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < words.len() {
            let end = (start + chunk_size).min(words.len());

            let mut chunk_end = end;
            let mut chunk = words[start..chunk_end].join(" ");
            while estimate_tokens(&chunk) > chunk_size && chunk_end > start + 1 {
                chunk_end -= 1;
                chunk = words[start..chunk_end].join(" ");
            }
            chunks.push(chunk);

            if end == words.len() {
                break;
            }
            start += self.config.stride();
        }

        debug!(
            "Split {} words into {} chunks (size {}, overlap {})",
            words.len(),
            chunks.len(),
            chunk_size,
            self.config.chunk_overlap
        );
        chunks
    }
}

/// Split text into overlapping word chunks.
///
/// Fails with a validation error when `chunk_size` is zero or
/// `chunk_overlap >= chunk_size`.
pub fn split_text_into_chunks(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<String>> {
    let chunker = WordChunker::from_defaults(chunk_size, chunk_overlap)?;
    Ok(chunker.split_text(text))
}

/// Keep at most `max_words` words of the text.
#[must_use]
pub fn truncate_to_token_limit(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
