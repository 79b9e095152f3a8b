use serde::{Deserialize, Serialize};

/// A bounded span of a page's text, tagged with its source page.
/// Immutable once created; owned by the `DocumentIndex` that built it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The chunk text (non-empty after trimming).
    pub text: String,
    /// 1-based page number the text came from.
    pub page: usize,
}

/// The retrievable index built from one ingested document.
///
/// Built once per ingestion and replaced wholesale on re-ingestion —
/// there is no partial mutation. Chunks are ordered by ascending page,
/// then ascending offset within the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndex {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages judged substantive enough to index.
    pub content_pages: usize,
    /// Pages visited but rejected (or unreadable).
    pub skipped_pages: usize,
    /// Retrieval units, in stable (page, offset) order.
    pub chunks: Vec<Chunk>,
    /// Total characters of accepted page text.
    pub total_text_length: usize,
}

impl DocumentIndex {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// True when no page survived filtering.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Pages visited, whether accepted or skipped. Equals `total_pages`
    /// unless the content-page cap truncated processing.
    pub fn pages_visited(&self) -> usize {
        self.content_pages + self.skipped_pages
    }
}

/// A chunk paired with its query-time relevance. Ephemeral — recomputed
/// per query, never persisted.
#[derive(Debug, Clone)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    /// Position of the chunk within the index it came from.
    pub index: usize,
    pub relevance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(chunks: Vec<Chunk>) -> DocumentIndex {
        DocumentIndex {
            total_pages: 10,
            content_pages: 2,
            skipped_pages: 8,
            total_text_length: chunks.iter().map(|c| c.text.len()).sum(),
            chunks,
        }
    }

    #[test]
    fn pages_visited_sums_counters() {
        let index = index_with(vec![]);
        assert_eq!(index.pages_visited(), 10);
    }

    #[test]
    fn empty_index_reports_empty() {
        let index = index_with(vec![]);
        assert!(index.is_empty());
        assert_eq!(index.chunk_count(), 0);
    }

    #[test]
    fn chunk_count_matches_chunks() {
        let index = index_with(vec![
            Chunk { text: "alpha".into(), page: 6 },
            Chunk { text: "bravo".into(), page: 7 },
        ]);
        assert_eq!(index.chunk_count(), 2);
        assert!(!index.is_empty());
    }
}
