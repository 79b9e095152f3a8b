//! Word-window chunking with overlap.
//!
//! Splits accepted page text into chunks of at most `chunk_size`
//! words, with `overlap` words shared between consecutive chunks.
//! Pages shorter than one window become a single chunk.

use docchat_core::Chunk;

#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum words per chunk.
    chunk_size: usize,
    /// Words shared between consecutive chunks (always < chunk_size).
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// An `overlap >= chunk_size` would make the window step zero or
    /// negative, so it is clamped to `chunk_size - 1` with a warning.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is 0 (rejected earlier by config
    /// validation).
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        let overlap = if overlap >= chunk_size {
            tracing::warn!(
                "overlap {} >= chunk_size {}, clamping to {}",
                overlap,
                chunk_size,
                chunk_size - 1
            );
            chunk_size - 1
        } else {
            overlap
        };
        Self { chunk_size, overlap }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split one page's text into chunks carrying `page`.
    ///
    /// Text with fewer than `chunk_size` words yields exactly one
    /// chunk containing the whole trimmed text; empty-after-trim
    /// text yields none.
    pub fn chunk_page(&self, text: &str, page: usize) -> Vec<Chunk> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let words: Vec<&str> = trimmed.split_whitespace().collect();
        if words.len() < self.chunk_size {
            return vec![Chunk {
                text: trimmed.to_string(),
                page,
            }];
        }

        // Always advance at least one word so the loop makes progress.
        let step = (self.chunk_size - self.overlap).max(1);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + self.chunk_size).min(words.len());
            let text = words[start..end].join(" ");
            if !text.trim().is_empty() {
                chunks.push(Chunk { text, page });
            }
            start += step;
        }
        chunks
    }
}
